use crate::data_processing::DEFAULT_ENDPOINT;
use crate::domain::{DEFAULT_GROUP, GroupUrlname};
use crate::error::ExportResult;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub meetup: MeetupSettings,
    pub export: ExportSettings,
    pub log: LogSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MeetupSettings {
    pub endpoint: String,
    pub default_group: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LogSettings {
    pub filter: String,
    pub format: LogFormat,
}

#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Bunyan,
}

impl Settings {
    /// The group to export when none is given on the command line.
    pub fn default_group(&self) -> ExportResult<GroupUrlname> {
        GroupUrlname::parse(self.meetup.default_group.clone())
    }
}

/// Reads `configuration.{toml,yaml,json,...}` from the working directory if
/// present, then `MEETUP_EXPORT__*` environment variables.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    get_configuration_from("configuration")
}

pub fn get_configuration_from(file_base: &str) -> Result<Settings, config::ConfigError> {
    config::Config::builder()
        .set_default("meetup.endpoint", DEFAULT_ENDPOINT)?
        .set_default("meetup.default_group", DEFAULT_GROUP)?
        .set_default("export.output_dir", ".")?
        .set_default("log.filter", "info")?
        .set_default("log.format", "pretty")?
        .add_source(config::File::with_name(file_base).required(false))
        .add_source(
            config::Environment::with_prefix("MEETUP_EXPORT")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}
