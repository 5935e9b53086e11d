use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const ENV_API_KEY: &str = "SUPPORTPAL_API_KEY";
const KEYRING_SERVICE: &str = "supportpal";
const KEYRING_KEY: &str = "ai_api_key";

/// Where the API key was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    Env,
    Keyring,
    File,
    Config,
}

impl KeySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Env => "environment",
            Self::Keyring => "keyring",
            Self::File => "file",
            Self::Config => "config file",
        }
    }
}

/// Lookup order: environment, OS keyring, key file, then the `api_key`
/// field from config.toml.
pub struct ApiKeyStore {
    key_file: PathBuf,
    use_keyring: bool,
}

impl ApiKeyStore {
    pub fn new() -> Self {
        let key_file = crate::config::Config::config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".api_key");

        Self {
            key_file,
            use_keyring: true,
        }
    }

    #[cfg(test)]
    fn with_file(key_file: PathBuf) -> Self {
        Self {
            key_file,
            use_keyring: false,
        }
    }

    fn env_key() -> Option<String> {
        env::var(ENV_API_KEY)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn keyring_get(&self) -> Option<String> {
        if !self.use_keyring {
            return None;
        }
        let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY).ok()?;
        entry.get_password().ok()
    }

    fn keyring_set(&self, key: &str) -> bool {
        if !self.use_keyring {
            return false;
        }
        match keyring::Entry::new(KEYRING_SERVICE, KEYRING_KEY) {
            Ok(entry) => entry.set_password(key).is_ok(),
            Err(_) => false,
        }
    }

    fn file_get(&self) -> Option<String> {
        fs::read_to_string(&self.key_file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Write the key file with owner-only permissions
    fn file_set(&self, key: &str) -> Result<()> {
        if let Some(parent) = self.key_file.parent() {
            fs::create_dir_all(parent)?;
        }

        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.key_file)?;
            file.write_all(key.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.key_file, key)?;
        }

        Ok(())
    }

    /// Resolve the API key, if any source has one
    pub fn get_api_key(&self, config_key: Option<&str>) -> Option<(String, KeySource)> {
        if let Some(key) = Self::env_key() {
            return Some((key, KeySource::Env));
        }
        if let Some(key) = self.keyring_get() {
            return Some((key, KeySource::Keyring));
        }
        if let Some(key) = self.file_get() {
            return Some((key, KeySource::File));
        }
        config_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(|k| (k.to_string(), KeySource::Config))
    }

    pub fn set_api_key(&self, key: &str) -> Result<()> {
        if self.keyring_set(key) && self.keyring_get().is_some() {
            return Ok(());
        }

        eprintln!("Note: Keyring unavailable, using file-based storage.");
        self.file_set(key)
    }
}
