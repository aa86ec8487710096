use crate::config::schema::MonitorConfig;
use crate::error::{Error, Result};
use ::config::{Environment, File, FileFormat};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use validator::Validate;

/// Environment variables with this prefix override file values,
/// e.g. `IMPORT_MONITOR_POLL_INTERVAL_MS=500`.
pub const ENV_PREFIX: &str = "IMPORT_MONITOR";

/// The settings one file sets explicitly, before defaults are filled in.
type Layer = Map<String, Value>;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads a config file (following `extends`), applies environment overrides and validates.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<MonitorConfig> {
        Self::resolve(Some(path.as_ref()), None)
    }

    /// Builds the effective configuration: file or defaults, then environment,
    /// then an explicit context URL from the command line.
    pub fn resolve(path: Option<&Path>, context_url: Option<String>) -> Result<MonitorConfig> {
        let base = match path {
            Some(path) => {
                let mut visited = HashSet::new();
                let layer = Self::load_with_inheritance(path, &mut visited)?;
                serde_json::from_value(Value::Object(layer))?
            }
            None => MonitorConfig::default(),
        };

        let mut config = Self::apply_overrides(base, Environment::with_prefix(ENV_PREFIX))?;
        if let Some(url) = context_url {
            config.context_url = url;
        }

        config.validate().map_err(Error::Validation)?;
        Ok(config)
    }

    fn load_with_inheritance(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Layer> {
        let path = fs::canonicalize(path).map_err(|e| {
            Error::Config(format!("{}: {}", path.display(), e))
        })?;

        if visited.contains(&path) {
            return Err(Error::Config(format!(
                "Circular inheritance detected involving {}",
                path.display()
            )));
        }
        visited.insert(path.clone());

        let mut layer = Self::load_file(&path)?;

        let parent_path_str = match layer.remove("extends") {
            None | Some(Value::Null) => return Ok(layer),
            Some(Value::String(parent)) => parent,
            Some(other) => {
                return Err(Error::Config(format!(
                    "{}: `extends` must be a path, got {}",
                    path.display(),
                    other
                )));
            }
        };
        let parent_path = path
            .parent()
            .ok_or_else(|| {
                Error::Config(format!(
                    "Cannot determine parent directory for {}",
                    path.display()
                ))
            })?
            .join(parent_path_str);

        let parent_layer = Self::load_with_inheritance(&parent_path, visited)?;
        Ok(Self::merge_layers(parent_layer, layer))
    }

    /// Reads one file as a flat table of the keys it actually sets.
    fn load_file(path: &Path) -> Result<Layer> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        let value: Value = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => {
                return Err(Error::Config(format!(
                    "Unsupported file extension: {}",
                    path.display()
                )));
            }
        };

        match value {
            Value::Object(layer) => Ok(layer),
            Value::Null => Ok(Layer::new()),
            _ => Err(Error::Config(format!(
                "{}: expected a table of settings",
                path.display()
            ))),
        }
    }

    /// Every key the child sets wins, even when it repeats a default.
    fn merge_layers(mut parent: Layer, child: Layer) -> Layer {
        parent.extend(child);
        parent
    }

    fn apply_overrides(config: MonitorConfig, env: Environment) -> Result<MonitorConfig> {
        let layered = serde_json::to_string(&config)?;
        let settings = ::config::Config::builder()
            .add_source(File::from_str(&layered, FileFormat::Json))
            .add_source(env.try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }
}
