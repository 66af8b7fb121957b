//! Command-line interface for the FIRE reference-point register.
#![forbid(unsafe_code)]

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use fire_store::FireDb;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

mod error;
mod info;

pub use error::CliError;

pub(crate) const ARG_DB: &str = "db";
pub(crate) const ENV_INIT_DB: &str = "FIRE_CMDS_INIT_DB";
pub(crate) const ENV_INFO_DB: &str = "FIRE_CMDS_INFO_DB";
pub(crate) const ENV_INFO_PUNKT: &str = "FIRE_CMDS_INFO_PUNKT";

/// Run the fire CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Init(args) => run_init(args),
        Command::Info(args) => info::run_info(args),
    }
}

fn run_init(args: InitArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    FireDb::create(&config.db)?;
    Ok(())
}

#[derive(Debug, Parser)]
#[command(
    name = "fire",
    about = "Reference-point register utilities",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty register database.
    Init(InitArgs),
    /// Describe a point in the register.
    Info(info::InfoArgs),
}

/// CLI arguments for the `init` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Create a register database with an initialised schema. The \
                 path can come from a CLI flag, configuration files, or an \
                 environment variable.",
    about = "Create an empty register database"
)]
#[ortho_config(prefix = "FIRE")]
struct InitArgs {
    /// Path of the register database to create.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    db: Option<Utf8PathBuf>,
}

impl InitArgs {
    fn into_config(self) -> Result<InitConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        InitConfig::try_from(merged)
    }
}

/// Resolved `init` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InitConfig {
    db: Utf8PathBuf,
}

impl TryFrom<InitArgs> for InitConfig {
    type Error = CliError;

    fn try_from(args: InitArgs) -> Result<Self, Self::Error> {
        let db = args.db.ok_or(CliError::MissingArgument {
            field: ARG_DB,
            env: ENV_INIT_DB,
        })?;
        Ok(Self { db })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn init_requires_a_database_path() {
        let result = InitConfig::try_from(InitArgs::default());
        assert!(matches!(
            result,
            Err(CliError::MissingArgument { field: "db", .. }),
        ));
    }

    #[rstest]
    fn init_accepts_a_database_path() {
        let args = InitArgs {
            db: Some(Utf8PathBuf::from("register.db")),
        };
        let config = InitConfig::try_from(args).expect("resolve init config");
        assert_eq!(config.db, Utf8PathBuf::from("register.db"));
    }

    #[rstest]
    fn cli_parses_the_init_subcommand() {
        let cli = Cli::try_parse_from(["fire", "init", "--db", "register.db"])
            .expect("parse init invocation");
        assert!(matches!(
            cli.command,
            Command::Init(InitArgs { db: Some(ref path) }) if path.as_str() == "register.db",
        ));
    }
}
