use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use commands::{ExportOptions, PutOptions, RemapOptions, SaveOptions};
use envsync_store::{FileStore, ParamManager, StoreConfig};
use prompt::Prompter;
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod prompt;

#[derive(Parser)]
#[command(name = "envsync")]
#[command(about = "Sync env files with a hierarchical parameter store", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base path prepended to every parameter path
    #[arg(short = 'b', long, global = true, env = "ENVSYNC_BASEPATH")]
    basepath: Option<String>,

    /// Parameter store snapshot file
    #[arg(
        long,
        global = true,
        env = "ENVSYNC_STORE",
        default_value = ".envsync/store.json"
    )]
    store: PathBuf,

    /// Parameters requested per listing page
    #[arg(long, global = true, env = "ENVSYNC_PAGE_SIZE")]
    page_size: Option<usize>,

    /// Never prompt; missing options take their defaults
    #[arg(long, global = true)]
    no_input: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Remap env var prefixes (DEV_AWS_KEY -> AWS_KEY) and save them to a file
    #[command(name = "remap-keys-in-env")]
    RemapKeysInEnv(RemapArgs),

    /// Save one service's parameters to a file that can be `source`d
    #[command(name = "save-params-file")]
    SaveParamsFile(SaveArgs),

    /// Put the params of an env file into the store
    #[command(name = "put-from-file")]
    PutFromFile(PutArgs),

    /// Export every parameter to <folder>/<env>/<service>.env
    #[command(name = "export-all-params")]
    ExportAllParams(ExportArgs),

    /// Count parameters per environment
    #[command(name = "list-environments")]
    ListEnvironments(ListArgs),

    /// Count parameters per service of one environment
    #[command(name = "list-services")]
    ListServices(ListServicesArgs),
}

#[derive(Args)]
struct RemapArgs {
    /// File to save the new env vars to
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Prefix to be replaced
    #[arg(long)]
    oldprefix: Option<String>,

    /// Prefix to replace with
    #[arg(long)]
    newprefix: Option<String>,
}

#[derive(Args)]
struct SaveArgs {
    /// File to save the parameters to
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Application environment
    #[arg(short, long)]
    env: Option<String>,

    /// Application service
    #[arg(short, long)]
    service: Option<String>,
}

#[derive(Args)]
struct PutArgs {
    /// File to read the env vars from
    #[arg(short, long)]
    infile: Option<PathBuf>,

    /// Application environment
    #[arg(short, long)]
    env: Option<String>,

    /// Application service
    #[arg(short, long)]
    service: Option<String>,

    /// Overwrite existing parameters
    #[arg(long)]
    overwrite: bool,

    /// Store every parameter encrypted
    #[arg(long)]
    encrypt: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Folder to save parameters to
    #[arg(short, long)]
    folder: Option<PathBuf>,

    /// Only export this environment
    #[arg(short, long)]
    env: Option<String>,
}

#[derive(Args)]
struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ListServicesArgs {
    /// Application environment
    #[arg(short, long)]
    env: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

struct StoreArgs {
    basepath: Option<String>,
    store: PathBuf,
    page_size: Option<usize>,
}

fn path_value(
    prompter: &Prompter,
    current: Option<PathBuf>,
    message: &str,
    default: &str,
) -> Result<PathBuf> {
    let current = current.map(|p| p.to_string_lossy().into_owned());
    Ok(PathBuf::from(prompter.value(current, message, default)?))
}

async fn open_manager(args: StoreArgs, prompter: &Prompter) -> Result<ParamManager<FileStore>> {
    let basepath = prompter.value(args.basepath, "Base path (optional)", "")?;
    let store = FileStore::open(&args.store)
        .await
        .with_context(|| format!("Cannot open parameter store {}", args.store.display()))?;
    log::debug!("Using parameter store {}", store.path().display());

    let mut config = StoreConfig::default().with_base_path(&basepath);
    if let Some(page_size) = args.page_size {
        config = config.with_page_size(page_size);
    }
    Ok(ParamManager::new(Arc::new(store), config))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let prompter = Prompter::new(cli.no_input);
    let store_args = StoreArgs {
        basepath: cli.basepath,
        store: cli.store,
        page_size: cli.page_size,
    };

    match cli.command {
        Commands::RemapKeysInEnv(args) => {
            let opts = RemapOptions {
                outfile: path_value(&prompter, args.outfile, "Output file", ".env")?,
                oldprefix: prompter.value(args.oldprefix, "Prefix to replace", "DEV_")?,
                newprefix: prompter.value(args.newprefix, "Replacing prefix (can be blank)", "")?,
            };
            commands::remap_keys(opts).await?;
        }
        Commands::SaveParamsFile(args) => {
            let opts = SaveOptions {
                outfile: path_value(&prompter, args.outfile, "Output file", ".env")?,
                env: prompter.value(args.env, "Environment", "dev")?,
                service: prompter.value(args.service, "Service", "")?,
            };
            let manager = open_manager(store_args, &prompter).await?;
            commands::save_params_file(&manager, opts).await?;
        }
        Commands::PutFromFile(args) => {
            let opts = PutOptions {
                infile: path_value(&prompter, args.infile, "Input file", ".env")?,
                env: prompter.value(args.env, "Environment", "dev")?,
                service: prompter.value(args.service, "Service", "")?,
                overwrite: args.overwrite,
                encrypt: args.encrypt,
            };
            let manager = open_manager(store_args, &prompter).await?;
            commands::put_from_file(&manager, opts).await?;
        }
        Commands::ExportAllParams(args) => {
            let opts = ExportOptions {
                folder: path_value(&prompter, args.folder, "Folder", "./params")?,
                env: args.env.filter(|e| !e.is_empty()),
            };
            let manager = open_manager(store_args, &prompter).await?;
            commands::export_all_params(&manager, opts).await?;
        }
        Commands::ListEnvironments(args) => {
            let manager = open_manager(store_args, &prompter).await?;
            commands::list_environments(&manager, args.json).await?;
        }
        Commands::ListServices(args) => {
            let env = prompter.value(args.env, "Environment", "dev")?;
            let manager = open_manager(store_args, &prompter).await?;
            commands::list_services(&manager, &env, args.json).await?;
        }
    }

    Ok(())
}
