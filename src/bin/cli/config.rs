use paramql::ParserOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Default)]
pub struct CliConfig {
    path: Option<PathBuf>,
    data: RawConfig,
}

impl CliConfig {
    pub fn load(explicit: Option<PathBuf>) -> Result<Self, ConfigError> {
        let explicit_given = explicit.is_some();
        let path = explicit.or_else(default_config_path);
        let data = match path.as_ref() {
            Some(config_path) if config_path.exists() => read_file(config_path)?,
            Some(config_path) if explicit_given => {
                return Err(ConfigError::Missing {
                    path: config_path.clone(),
                })
            }
            _ => RawConfig::default(),
        };
        Ok(Self { path, data })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Schema file from the config, relative paths anchored at the config
    /// file's directory.
    pub fn schema_path(&self) -> Option<PathBuf> {
        let schema = self.data.schema.path.as_ref()?;
        if schema.is_absolute() {
            return Some(schema.clone());
        }
        let base = self.path.as_deref().and_then(Path::parent);
        Some(match base {
            Some(dir) => dir.join(schema),
            None => schema.clone(),
        })
    }

    pub fn default_root(&self) -> Option<&str> {
        self.data.schema.root.as_deref()
    }

    pub fn parser_options(&self) -> ParserOptions {
        self.data.parser.clone()
    }
}

fn read_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    schema: SchemaSection,
    #[serde(default)]
    parser: ParserOptions,
}

#[derive(Debug, Default, Deserialize)]
struct SchemaSection {
    path: Option<PathBuf>,
    root: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read CLI config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse CLI config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("CLI config {path} does not exist")]
    Missing { path: PathBuf },
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("paramql").join("cli.toml"))
}
