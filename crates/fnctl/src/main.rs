//! fnctl - develop and deploy serverless functions projects

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use serverless_core::commands;
use serverless_core::language::DEFAULT_LANGUAGE;
use serverless_core::options::*;
use serverless_core::project::DiskFs;
use serverless_core::{CommandOptions, NimService, ProductConfig, ServerlessConfig};
use tracing_subscriber::EnvFilter;

/// fnctl product configuration
#[derive(Clone)]
pub struct FnctlConfig;

impl ProductConfig for FnctlConfig {
    fn name(&self) -> &'static str {
        "fnctl"
    }

    fn backend_env(&self) -> &'static str {
        "FNCTL_SERVERLESS_BACKEND"
    }

    fn credentials_env(&self) -> &'static str {
        "FNCTL_SERVERLESS_CREDENTIALS"
    }
}

#[derive(Parser, Debug)]
#[command(name = "fnctl")]
#[command(about = "CLI for developing and deploying serverless functions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase logging verbosity
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Develop, test, and deploy serverless functions
    #[command(subcommand, visible_alias = "sls")]
    Serverless(ServerlessCommand),
}

#[derive(Subcommand, Debug)]
pub enum ServerlessCommand {
    /// Initialize a 'functions project' directory in your local file system
    Init(InitArgs),
    /// Deploy a functions project to your functions namespace
    Deploy(DeployArgs),
    /// Obtain metadata of a functions project
    GetMetadata(GetMetadataArgs),
    /// Watch a functions project directory, deploying incrementally on change
    Watch(WatchArgs),
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to create the project in
    #[arg(value_name = "PATH")]
    pub args: Vec<String>,

    /// Language for the initial sample code
    #[arg(short, long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Clears and reuses an existing directory
    #[arg(long)]
    pub overwrite: bool,
}

/// Flags shared by deploy and watch
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Project directory
    #[arg(value_name = "DIRECTORY")]
    pub args: Vec<String>,

    /// Path to runtime environment file
    #[arg(long)]
    pub env: Option<String>,

    /// Path to build-time environment file
    #[arg(long)]
    pub build_env: Option<String>,

    /// API host to use
    #[arg(long)]
    pub apihost: Option<String>,

    /// OpenWhisk auth token to use
    #[arg(long)]
    pub auth: Option<String>,

    /// Ignore SSL Certificates
    #[arg(long)]
    pub insecure: bool,

    /// Display build details
    #[arg(long)]
    pub verbose_build: bool,

    /// Display start/end of zipping phase for each function
    #[arg(long)]
    pub verbose_zip: bool,

    /// Use yarn instead of npm for node builds
    #[arg(long)]
    pub yarn: bool,

    /// Functions and/or packages to include
    #[arg(long)]
    pub include: Option<String>,

    /// Functions and/or packages to exclude
    #[arg(long)]
    pub exclude: Option<String>,

    /// Run builds remotely
    #[arg(long)]
    pub remote_build: bool,
}

impl From<BuildArgs> for CommandOptions {
    fn from(args: BuildArgs) -> Self {
        CommandOptions::new()
            .with_string(FLAG_ENV, args.env)
            .with_string(FLAG_BUILD_ENV, args.build_env)
            .with_string(FLAG_APIHOST, args.apihost)
            .with_string(FLAG_AUTH, args.auth)
            .with_bool(FLAG_INSECURE, args.insecure)
            .with_bool(FLAG_VERBOSE_BUILD, args.verbose_build)
            .with_bool(FLAG_VERBOSE_ZIP, args.verbose_zip)
            .with_bool(FLAG_YARN, args.yarn)
            .with_string(FLAG_INCLUDE, args.include)
            .with_string(FLAG_EXCLUDE, args.exclude)
            .with_bool(FLAG_REMOTE_BUILD, args.remote_build)
    }
}

#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub build: BuildArgs,

    /// Deploy only changes since last deploy
    #[arg(long)]
    pub incremental: bool,
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    #[command(flatten)]
    pub build: BuildArgs,
}

#[derive(Args, Debug)]
pub struct GetMetadataArgs {
    /// Project directory
    #[arg(value_name = "DIRECTORY")]
    pub args: Vec<String>,

    /// Path to environment file
    #[arg(long)]
    pub env: Option<String>,

    /// Functions or packages to include
    #[arg(long)]
    pub include: Option<String>,

    /// Functions or packages to exclude
    #[arg(long)]
    pub exclude: Option<String>,

    /// Test new project reader service
    #[arg(long, hide = true)]
    pub project_reader: bool,
}

impl From<&GetMetadataArgs> for CommandOptions {
    fn from(args: &GetMetadataArgs) -> Self {
        CommandOptions::new()
            .with_string(FLAG_ENV, args.env.clone())
            .with_string(FLAG_INCLUDE, args.include.clone())
            .with_string(FLAG_EXCLUDE, args.exclude.clone())
            .with_bool(FLAG_PROJECT_READER, args.project_reader)
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: ServerlessCommand) -> serverless_core::Result<()> {
    let config = FnctlConfig;
    let service = NimService::new(ServerlessConfig::from_config(&config));
    let mut out = std::io::stdout();

    match command {
        ServerlessCommand::Init(args) => {
            commands::run_init(
                &service,
                DiskFs,
                &config,
                &args.args,
                &args.language,
                args.overwrite,
                &mut out,
            )
            .await?;
            Ok(())
        }
        ServerlessCommand::Deploy(args) => {
            let positional = args.build.args.clone();
            let mut options =
                CommandOptions::from(args.build).with_bool(FLAG_INCREMENTAL, args.incremental);
            commands::run_deploy(&service, &config, &positional, &mut options, &mut out).await
        }
        ServerlessCommand::GetMetadata(args) => {
            let mut options = CommandOptions::from(&args);
            commands::run_get_metadata(&service, &args.args, &mut options, &mut out).await
        }
        ServerlessCommand::Watch(args) => {
            let positional = args.build.args.clone();
            let mut options = CommandOptions::from(args.build);
            commands::run_watch(&service, &positional, &mut options, &mut out).await
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Watch runs until interrupted
    ctrlc::set_handler(move || {
        std::process::exit(130);
    })
    .ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Command::Serverless(command) = cli.command;
    if let Err(e) = run(command).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_init_defaults() {
        let cli = Cli::parse_from(["fnctl", "serverless", "init", "proj"]);
        let Command::Serverless(ServerlessCommand::Init(args)) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(args.args, vec!["proj"]);
        assert_eq!(args.language, "javascript");
        assert!(!args.overwrite);
    }

    #[test]
    fn test_deploy_flags_map_to_options() {
        let cli = Cli::parse_from([
            "fnctl", "sls", "deploy", "proj", "--build-env", "b.env", "--remote-build",
            "--incremental", "--exclude", "web",
        ]);
        let Command::Serverless(ServerlessCommand::Deploy(args)) = cli.command else {
            panic!("expected deploy");
        };
        assert!(args.incremental);
        let options = CommandOptions::from(args.build);
        assert_eq!(options.get_string(FLAG_BUILD_ENV), Some("b.env"));
        assert_eq!(options.get_string(FLAG_EXCLUDE), Some("web"));
        assert!(options.get_bool(FLAG_REMOTE_BUILD));
        assert!(!options.get_bool(FLAG_INCREMENTAL));
    }

    #[test]
    fn test_watch_rejects_incremental() {
        assert!(Cli::try_parse_from(["fnctl", "serverless", "watch", "proj", "--incremental"]).is_err());
    }

    #[test]
    fn test_get_metadata_hidden_flag() {
        let cli = Cli::parse_from(["fnctl", "serverless", "get-metadata", "proj", "--project-reader"]);
        let Command::Serverless(ServerlessCommand::GetMetadata(args)) = cli.command else {
            panic!("expected get-metadata");
        };
        assert!(CommandOptions::from(&args).get_bool(FLAG_PROJECT_READER));
    }
}
