use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the exif-strip library.
///
/// Controls which file extensions are treated as JPEG when walking
/// directories, and how rewrites behave (dry run, backups, batch failure
/// policy).
///
/// # Loading
///
/// ```rust,no_run
/// use exif_strip::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.output.backup_originals = true;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Extensions (lowercase, without the dot) accepted as JPEG files.
    pub extensions: Vec<String>,
    /// Output behavior (dry run, backups, failure policy).
    pub output: OutputConfig,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// If `true`, report what would be removed without modifying any files.
    pub dry_run: bool,
    /// If `true`, keep the original beside the rewrite as a `.bak` file.
    pub backup_originals: bool,
    /// If `true`, stop the batch at the first file that fails instead of
    /// continuing with the rest.
    pub fail_fast: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "jpe".to_string(),
                "jfif".to_string(),
            ],
            output: OutputConfig {
                dry_run: false,
                backup_originals: false,
                fail_fast: false,
            },
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }

    /// True if `path` carries one of the configured JPEG extensions.
    /// Matching is case-insensitive.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_extensions_cover_common_jpeg_names() {
        let config = Config::default();
        for name in ["a.jpg", "b.JPEG", "c.jpe", "d.JfIf"] {
            assert!(config.matches_extension(Path::new(name)), "{name}");
        }
        for name in ["e.png", "f.tiff", "g.jpg.bak", "noext"] {
            assert!(!config.matches_extension(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = Config::default();
        config.output.dry_run = true;
        config.extensions.push("mjpg".to_string());

        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert!(back.output.dry_run);
        assert!(back.matches_extension(Path::new("cam.mjpg")));
    }

    #[test]
    fn load_and_save_use_the_given_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.output.backup_originals = true;
        config.save(Some(&path)).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert!(loaded.output.backup_originals);
        assert!(!loaded.output.dry_run);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(loaded.extensions, Config::default().extensions);
    }
}
