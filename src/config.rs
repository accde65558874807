use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

use crate::store::{Settings, INSECURE_ENABLED};

/// Settings read from an optional TOML file and `SVNFETCH_*` environment
/// variables, the latter taking precedence.
pub struct SvnfetchConfig {
    raw: Config,
    insecure: bool,
    pub client_path: Option<PathBuf>,
}

impl SvnfetchConfig {
    pub fn load(settings_file: Option<&Path>) -> anyhow::Result<Self> {
        Ok(Self::from_sources(None, settings_file)?)
    }

    fn from_sources(
        env: Option<HashMap<String, String>>,
        settings_file: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = settings_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }
        let raw = builder
            .add_source(
                Environment::with_prefix("SVNFETCH")
                    .separator("_")
                    .source(env),
            )
            .build()?;
        let typed: RawConfig = raw.clone().try_deserialize()?;

        Ok(Self {
            raw,
            insecure: typed.svn.insecure.enabled,
            client_path: typed.client.path,
        })
    }
}

impl Settings for SvnfetchConfig {
    fn bool(&self, key: &str) -> anyhow::Result<bool> {
        if key == INSECURE_ENABLED {
            return Ok(self.insecure);
        }
        match self.raw.get_bool(key) {
            Ok(value) => Ok(value),
            Err(ConfigError::NotFound(_)) => Ok(false),
            Err(error) => Err(error.into()),
        }
    }
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct RawConfig {
    #[serde(default)]
    svn: SvnConfig,
    #[serde(default)]
    client: ClientConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct SvnConfig {
    #[serde(default)]
    insecure: InsecureConfig,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct InsecureConfig {
    #[serde(default)]
    enabled: bool,
}

#[derive(Default, Debug, Deserialize, PartialEq, Eq)]
struct ClientConfig {
    path: Option<PathBuf>,
}
