use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional TOML settings file. Command-line flags and environment win over it.
///
/// ```toml
/// api_key = "..."
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }
}

/// First non-empty value wins.
pub fn resolve_api_key(flag: Option<String>, file: &FileConfig) -> Option<String> {
    flag.into_iter()
        .chain(file.api_key.clone())
        .find(|key| !key.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = FileConfig::parse("api_key = \"abc\"\nlog_level = \"debug\"\n").unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        assert!(FileConfig::parse("apikey = \"abc\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = FileConfig::load(Path::new("/nonexistent/coincraddle.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_flag_overrides_file() {
        let file = FileConfig {
            api_key: Some("from-file".to_string()),
            log_level: None,
        };
        assert_eq!(
            resolve_api_key(Some("from-flag".to_string()), &file).as_deref(),
            Some("from-flag")
        );
        assert_eq!(resolve_api_key(None, &file).as_deref(), Some("from-file"));
        assert_eq!(
            resolve_api_key(Some("  ".to_string()), &file).as_deref(),
            Some("from-file")
        );
        assert_eq!(resolve_api_key(None, &FileConfig::default()), None);
    }
}
