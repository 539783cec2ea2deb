//! Tool configuration.
//!
//! Every setting has a default matching the conventional layout (books go to
//! `_book/`, kindlegen lives in `lib/kindlegen/`), so a `binder.toml` is only
//! needed to change them. The file is plain TOML mirroring these structs.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "binder.toml";

/// Book metadata written into every generated container.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BookConfig {
    /// Language code (BCP 47 format, e.g., "en", "en-GB", "fr").
    pub language: String,
    /// Author credited on every book. Empty string for none.
    pub author: String,
    pub generator: String,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            author: String::new(),
            generator: "novel-binder".to_string(),
        }
    }
}

impl BookConfig {
    /// Returns the author, if configured.
    pub fn author_opt(&self) -> Option<&str> {
        if self.author.is_empty() {
            None
        } else {
            Some(&self.author)
        }
    }
}

/// Cover art configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverConfig {
    /// "bundled" for the compiled-in font, or a path to a TrueType/OpenType file
    pub font: String,
    /// Seed for the background colour. Unset picks a fresh colour every run.
    pub seed: Option<u64>,
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            font: crate::sinks::cover_art::BUNDLED.to_string(),
            seed: None,
        }
    }
}

/// kindlegen (EPUB to MOBI) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KindlegenConfig {
    pub program: PathBuf,
    /// Run the conversion after binding a novel
    pub enabled: bool,
}

impl Default for KindlegenConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("lib/kindlegen/kindlegen"),
            enabled: true,
        }
    }
}

/// kcc-c2e (manga pages to book) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KccConfig {
    pub program: PathBuf,
    /// Device profile passed as `-p`
    pub profile: String,
}

impl Default for KccConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("kcc-c2e"),
            profile: "KPW".to_string(),
        }
    }
}

/// Complete configuration for a binding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Directory under which `<work_id>/` output folders are created
    pub output_root: PathBuf,
    pub book: BookConfig,
    pub cover: CoverConfig,
    pub kindlegen: KindlegenConfig,
    pub kcc: KccConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from("_book"),
            book: BookConfig::default(),
            cover: CoverConfig::default(),
            kindlegen: KindlegenConfig::default(),
            kcc: KccConfig::default(),
        }
    }
}

impl Configuration {
    /// Load configuration from an explicit path, or from `binder.toml` in the
    /// working directory when it exists, or fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Configuration> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    log::debug!("No {CONFIG_FILE} found, using defaults");
                    Ok(Configuration::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Configuration> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to load {} contents", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML in {}", path.display()))
    }

    /// Output directory for one work.
    pub fn work_output_dir(&self, work_id: &str) -> PathBuf {
        self.output_root.join(work_id)
    }
}

/// Write a default configuration file, refusing to clobber an existing one.
pub fn write_default(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(anyhow!(
            "{} already exists, remove it first to regenerate it",
            path.display()
        ));
    }
    let contents = toml::to_string(&Configuration::default())
        .with_context(|| "Failed to serialize default configuration")?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn can_serialize_configuration() {
        let config = Configuration::default();
        toml::to_string(&config).expect("can serialize configuration to TOML");
    }

    #[test]
    fn can_roundtrip_configuration() {
        let config = Configuration::default();
        let toml_str = toml::to_string(&config).expect("can serialize");
        let deserialized: Configuration = toml::from_str(&toml_str).expect("can deserialize");
        assert_eq!(config.output_root, deserialized.output_root);
        assert_eq!(config.kcc.profile, deserialized.kcc.profile);
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config: Configuration = toml::from_str(
            r#"
output_root = "books"

[cover]
seed = 42
"#,
        )
        .expect("can parse partial config");
        assert_eq!(config.output_root, PathBuf::from("books"));
        assert_eq!(config.cover.seed, Some(42));
        assert_eq!(config.cover.font, "bundled");
        assert_eq!(config.book.language, "en");
        assert!(config.kindlegen.enabled);
        assert_eq!(config.work_output_dir("x"), PathBuf::from("books").join("x"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        assert!(Configuration::load(Some(&dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn write_default_refuses_to_overwrite() {
        let dir = tempfile::tempdir().expect("can create temp dir");
        let path = dir.path().join(CONFIG_FILE);
        write_default(&path).expect("can write default config");
        Configuration::from_file(&path).expect("can read written config");
        assert!(write_default(&path).is_err());
    }
}
