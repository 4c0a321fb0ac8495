use crate::error::{Error, Result};
use directories::{BaseDirs, ProjectDirs};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs::{self, DirBuilder};
use std::io;
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "manygram";
pub const DEFAULT_EXEC_PATH: &str = "telegram-desktop";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub exec_path: String,
    pub exec_args: Vec<String>,
    pub profile_dir: String,
}

// Keys are optional here so "not defined" and "empty" can be told apart.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
struct RawConfig {
    exec_path: Option<String>,
    #[serde(default)]
    exec_args: Vec<String>,
    profile_dir: Option<String>,
}

fn required(key: &str, value: Option<String>) -> Result<String> {
    let value = value.ok_or_else(|| Error::Config(format!("`{key}` parameter is not defined")))?;
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::Config(format!("`{key}` parameter is empty")));
    }
    Ok(value.to_string())
}

impl Config {
    pub fn new(exec_path: &str, profile_dir: &Path) -> Self {
        Self {
            exec_path: exec_path.to_string(),
            exec_args: Vec::new(),
            profile_dir: profile_dir.display().to_string(),
        }
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        Ok(Self {
            exec_path: required("exec-path", raw.exec_path)?,
            exec_args: raw.exec_args,
            profile_dir: required("profile-dir", raw.profile_dir)?,
        })
    }

    pub fn profile_dir(&self) -> &Path {
        Path::new(&self.profile_dir)
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            DirBuilder::new()
                .recursive(true)
                .mode(0o755)
                .create(dir)
                .map_err(|e| Error::fs(dir, e))?;
        }
        let content = toml::to_string(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, content).map_err(|e| Error::fs(path, e))?;
        debug!("Wrote config {:?}", path);
        Ok(())
    }
}

/// A missing file is `NotExist`; anything unparsable is `Config`.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| Error::from_stat(path, e))?;
    let config = Config::parse(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    debug!("Loaded config {:?}: {:?}", path, config);
    Ok(config)
}

pub fn config_exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::fs(path, e)),
    }
}

/// Base directories, resolved once at startup and passed down.
#[derive(Debug, Clone)]
pub struct Dirs {
    pub config_file: PathBuf,
    pub data_dir: PathBuf,
    pub home_dir: PathBuf,
}

impl Dirs {
    pub fn from_env(config_override: Option<PathBuf>) -> Result<Self> {
        let base = BaseDirs::new()
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))?;
        let config_file = match config_override {
            Some(path) => path,
            None => ProjectDirs::from("", "", APP_NAME)
                .map(|dirs| dirs.config_dir().join("config.toml"))
                .ok_or_else(|| Error::Config("cannot determine config directory".to_string()))?,
        };
        Ok(Self {
            config_file,
            data_dir: base.data_dir().to_path_buf(),
            home_dir: base.home_dir().to_path_buf(),
        })
    }

    pub fn applications_dir(&self) -> PathBuf {
        self.data_dir.join("applications")
    }
}

/// `<data_dir>/manygram/profiles`
pub fn default_profile_dir(data_dir: &Path) -> PathBuf {
    data_dir.join(APP_NAME).join("profiles")
}
