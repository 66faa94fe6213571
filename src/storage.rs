use crate::constants::CONFIG_DIR_NAME;
use crate::models::AccountAddress;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.yaml";
const SESSION_FILE: &str = "session.yaml";

/// A wallet the user can connect
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WalletProfile {
    pub name: String,
    /// File holding the hex-encoded Ed25519 private key
    pub private_key_file: PathBuf,
    /// Pins the account address when the key was rotated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountAddress>,
}

/// User settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub wallets: Vec<WalletProfile>,
    /// Reconnect the last used wallet at startup
    #[serde(default)]
    pub auto_connect: bool,
}

/// What survives between runs
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMemory {
    #[serde(default)]
    pub last_wallet: Option<String>,
}

/// Reads and writes the files under the config directory
pub struct Storage {
    config_dir: PathBuf,
}

impl Storage {
    pub fn new() -> Self {
        let config_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);
        Storage { config_dir }
    }

    pub fn with_dir(config_dir: impl Into<PathBuf>) -> Self {
        Storage {
            config_dir: config_dir.into(),
        }
    }

    /// Ensure config directory exists
    fn ensure_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    fn read_yaml<T: Default + for<'de> Deserialize<'de>>(&self, file: &str) -> Result<T> {
        let path = self.config_dir.join(file);
        if !path.exists() {
            return Ok(T::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_yaml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
    }

    fn write_yaml<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let content = serde_yaml::to_string(value)?;
        fs::write(self.config_dir.join(file), content)?;
        Ok(())
    }

    /// Load settings; a missing file yields the defaults
    pub fn load_settings(&self) -> Result<Settings> {
        let mut settings: Settings = self.read_yaml(SETTINGS_FILE)?;
        for profile in &mut settings.wallets {
            profile.private_key_file = expand_home(&profile.private_key_file);
        }
        Ok(settings)
    }

    pub fn load_session(&self) -> Result<SessionMemory> {
        self.read_yaml(SESSION_FILE)
    }

    /// Record the wallet in use, or forget it on disconnect
    pub fn remember_wallet(&self, name: Option<&str>) -> Result<()> {
        let memory = SessionMemory {
            last_wallet: name.map(String::from),
        };
        self.write_yaml(SESSION_FILE, &memory)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}
