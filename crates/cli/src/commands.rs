use anyhow::{bail, Context, Result};
use console::style;
use envsync_envfile::{read_env_file, remap_keys_in_env, write_env_file, EnvParam};
use envsync_store::{FrequencyMap, ParamManager, ParameterStore};
use std::path::{Path, PathBuf};

pub(crate) struct RemapOptions {
    pub outfile: PathBuf,
    pub oldprefix: String,
    pub newprefix: String,
}

pub(crate) struct SaveOptions {
    pub outfile: PathBuf,
    pub env: String,
    pub service: String,
}

pub(crate) struct PutOptions {
    pub infile: PathBuf,
    pub env: String,
    pub service: String,
    pub overwrite: bool,
    pub encrypt: bool,
}

pub(crate) struct ExportOptions {
    pub folder: PathBuf,
    pub env: Option<String>,
}

fn say(message: &str) {
    println!("{}", style(message).green());
}

pub(crate) async fn remap_keys(opts: RemapOptions) -> Result<()> {
    say("Remapping keys in env");
    let params = remap_keys_in_env(&opts.oldprefix, &opts.newprefix, None);
    say(&format!(
        "Saving {} parameters to {}",
        params.len(),
        opts.outfile.display()
    ));
    write_env_file(&params, &opts.outfile).await?;
    say(&format!(
        "Saved {} parameters to {}",
        params.len(),
        opts.outfile.display()
    ));
    Ok(())
}

pub(crate) async fn save_params_file<S: ParameterStore + ?Sized + 'static>(
    manager: &ParamManager<S>,
    opts: SaveOptions,
) -> Result<()> {
    let path = manager.path(Some(&opts.env), Some(&opts.service), None);
    say(&format!("Saving '{path}' out to {}", opts.outfile.display()));

    let results = manager
        .get_parameters_by_service(&opts.env, &opts.service, true)
        .await?;
    if results.is_empty() {
        bail!("No parameters found under {path}");
    }

    let params: Vec<EnvParam> = results.values().map(EnvParam::from).collect();
    write_env_file(&params, &opts.outfile).await?;
    say(&format!(
        "Saved {} parameters to {}",
        params.len(),
        opts.outfile.display()
    ));
    Ok(())
}

pub(crate) async fn put_from_file<S: ParameterStore + ?Sized + 'static>(
    manager: &ParamManager<S>,
    opts: PutOptions,
) -> Result<()> {
    say(&format!("Reading params from file: {}", opts.infile.display()));
    let params = read_env_file(&opts.infile).await?;
    let target = manager.path(Some(&opts.env), Some(&opts.service), None);
    say(&format!(
        "Saving {} parameters to the store for \"{target}\"",
        params.len()
    ));

    let writes = params
        .into_iter()
        .map(|param| {
            let encrypted = param.is_encrypted || opts.encrypt;
            param.encrypted(encrypted).into_write(opts.overwrite)
        })
        .collect();
    let results = manager
        .set_parameters_by_service(writes, &opts.env, &opts.service)
        .await;

    let total = results.len();
    let mut failed = 0usize;
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        failed += 1;
        log::error!("{err}");
    }
    say(&format!(
        "Saved {} parameters to the store for \"{target}\"",
        total - failed
    ));
    if failed > 0 {
        bail!("{failed} of {total} parameters could not be saved");
    }
    Ok(())
}

/// Write `<folder>/<env>/<service>.env` for every group; returns the files written.
pub(crate) async fn export_all_params<S: ParameterStore + ?Sized + 'static>(
    manager: &ParamManager<S>,
    opts: ExportOptions,
) -> Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(&opts.folder)
        .await
        .with_context(|| format!("Cannot create export folder {}", opts.folder.display()))?;

    let mut tree = manager.get_all_params(true).await?;
    if let Some(env) = &opts.env {
        log::info!("Keeping params for environment {env}");
        tree = tree.filter_environment(env);
    }

    let mut written = Vec::new();
    for (env, service, params) in tree.groups() {
        let file = export_file(&opts.folder, env, service);
        let vars: Vec<EnvParam> = params.values().map(EnvParam::from).collect();
        say(&format!(
            "Writing {} params for {env}/{service} to {}",
            vars.len(),
            file.display()
        ));
        write_env_file(&vars, &file).await?;
        written.push(file);
    }
    Ok(written)
}

fn export_file(folder: &Path, env: &str, service: &str) -> PathBuf {
    folder.join(env).join(format!("{service}.env"))
}

pub(crate) async fn list_environments<S: ParameterStore + ?Sized + 'static>(
    manager: &ParamManager<S>,
    json: bool,
) -> Result<()> {
    let envs = manager.get_environments().await?;
    print_frequency(&envs, json)
}

pub(crate) async fn list_services<S: ParameterStore + ?Sized + 'static>(
    manager: &ParamManager<S>,
    env: &str,
    json: bool,
) -> Result<()> {
    let services = manager.get_services_for_environment(env).await?;
    print_frequency(&services, json)
}

fn print_frequency(counts: &FrequencyMap, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(counts)?);
        return Ok(());
    }
    for (name, count) in counts {
        println!("{name}\t{count}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use envsync_store::{MemoryStore, RawParameter, StoreConfig, PLAIN_TAG, SECRET_TAG};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn raw(name: &str, value: &str, tag: &str) -> RawParameter {
        RawParameter {
            name: name.to_string(),
            value: value.to_string(),
            version: 1,
            last_modified_ms: 0,
            type_tag: tag.to_string(),
        }
    }

    fn manager() -> ParamManager<MemoryStore> {
        let store = MemoryStore::with_parameters([
            raw("/org/prod/api/DB_HOST", "db1", PLAIN_TAG),
            raw("/org/prod/api/TOKEN", "t0k3n", SECRET_TAG),
            raw("/org/dev/web/URL", "http://localhost", PLAIN_TAG),
        ]);
        ParamManager::new(Arc::new(store), StoreConfig::default().with_base_path("org"))
    }

    #[tokio::test]
    async fn export_writes_one_file_per_service() {
        let temp = TempDir::new().expect("tempdir");
        let folder = temp.path().join("params");
        let written = export_all_params(
            &manager(),
            ExportOptions {
                folder: folder.clone(),
                env: None,
            },
        )
        .await
        .expect("export");

        assert_eq!(written.len(), 2);
        let api = std::fs::read_to_string(folder.join("prod").join("api.env")).expect("api.env");
        assert_eq!(api, "DB_HOST=db1\nTOKEN=t0k3n # encrypted");
        assert!(folder.join("dev").join("web.env").exists());
    }

    #[tokio::test]
    async fn export_can_keep_one_environment() {
        let temp = TempDir::new().expect("tempdir");
        let written = export_all_params(
            &manager(),
            ExportOptions {
                folder: temp.path().to_path_buf(),
                env: Some("dev".to_string()),
            },
        )
        .await
        .expect("export");
        assert_eq!(written, vec![temp.path().join("dev").join("web.env")]);
    }

    #[tokio::test]
    async fn save_fails_on_empty_service() {
        let temp = TempDir::new().expect("tempdir");
        let err = save_params_file(
            &manager(),
            SaveOptions {
                outfile: temp.path().join(".env"),
                env: "qa".to_string(),
                service: "api".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("No parameters found"));
        assert!(!temp.path().join(".env").exists());
    }
}
