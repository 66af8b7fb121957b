//! Info command implementation for the fire CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use fire_core::Geometry;
use fire_store::FireDb;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_DB, CliError, ENV_INFO_DB, ENV_INFO_PUNKT};

/// CLI arguments for the `info` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Describe a point in the register: its identifier and the \
                 geometry recorded for it, printed as JSON.",
    about = "Describe a point in the register"
)]
#[ortho_config(prefix = "FIRE")]
pub(crate) struct InfoArgs {
    /// Identifier of the point to describe.
    #[arg(value_name = "punkt")]
    #[serde(default)]
    pub(crate) punkt: Option<i64>,
    /// Path of the register database.
    #[arg(long = ARG_DB, value_name = "path")]
    #[serde(default)]
    pub(crate) db: Option<Utf8PathBuf>,
}

impl InfoArgs {
    pub(crate) fn into_config(self) -> Result<InfoConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        InfoConfig::try_from(merged)
    }
}

/// Resolved `info` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InfoConfig {
    pub(crate) punkt: i64,
    pub(crate) db: Utf8PathBuf,
}

impl InfoConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        if self.db.is_file() {
            Ok(())
        } else {
            Err(CliError::MissingDatabase {
                field: ARG_DB,
                path: self.db.clone(),
            })
        }
    }
}

impl TryFrom<InfoArgs> for InfoConfig {
    type Error = CliError;

    fn try_from(args: InfoArgs) -> Result<Self, Self::Error> {
        let punkt = args.punkt.ok_or(CliError::MissingArgument {
            field: "punkt",
            env: ENV_INFO_PUNKT,
        })?;
        let db = args.db.ok_or(CliError::MissingArgument {
            field: ARG_DB,
            env: ENV_INFO_DB,
        })?;
        Ok(Self { punkt, db })
    }
}

/// Description of a point, as printed by `fire info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct PunktInfo {
    /// Identifier of the point.
    pub(crate) punkt: i64,
    /// Geometry recorded for the point, if any.
    pub(crate) geometri: Option<Geometry>,
}

pub(crate) fn run_info(args: InfoArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    let info = describe_punkt(&config.db, config.punkt)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, &info).map_err(CliError::SerializeInfo)?;
    handle.write_all(b"\n").map_err(CliError::WriteOutput)
}

fn describe_punkt(db: &Utf8Path, punkt: i64) -> Result<PunktInfo, CliError> {
    let register = FireDb::open(db)?;
    let geometri = register.fetch_geometri(punkt)?;
    Ok(PunktInfo { punkt, geometri })
}
