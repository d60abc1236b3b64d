use crate::error::{EnvFileError, Result};
use crate::format::{parse_env_str, render_env};
use crate::param::EnvParam;
use crate::remap::load_into_env;
use std::path::Path;

/// Read an env file, dropping lines that do not parse.
pub async fn read_env_file(path: impl AsRef<Path>) -> Result<Vec<EnvParam>> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| EnvFileError::io(path, err))?;
    let params = parse_env_str(&text);
    log::debug!("Read {} params from {}", params.len(), path.display());
    Ok(params)
}

/// Write params to `path`, creating parent directories. Returns the rendered text.
pub async fn write_env_file(params: &[EnvParam], path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| EnvFileError::io(parent, err))?;
    }
    let text = render_env(params);
    tokio::fs::write(path, &text)
        .await
        .map_err(|err| EnvFileError::io(path, err))?;
    log::debug!("Wrote {} params to {}", params.len(), path.display());
    Ok(text)
}

/// Read an env file and export its params into the process environment.
pub async fn load_file_into_env(path: impl AsRef<Path>) -> Result<Vec<EnvParam>> {
    let params = read_env_file(path).await?;
    load_into_env(&params);
    Ok(params)
}
