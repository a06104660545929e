//! INI file configuration adapter.

use crate::domain::error::TrendscopeError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TrendscopeError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|reason| TrendscopeError::ConfigParse {
                file: path.display().to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
        Ok(Self { config })
    }

    /// Configuration with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[data]
path = ./data

[analysis]
timeframe = week
pivot_left = 3

[logging]
level = debug
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(adapter.get_string("data", "path"), Some("./data".to_string()));
        assert_eq!(adapter.get_string("analysis", "timeframe"), Some("week".to_string()));
        assert_eq!(adapter.get_int("analysis", "pivot_left", 2), 3);
        assert_eq!(adapter.get_string("logging", "level"), Some("debug".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nrsi_period = 14\n").unwrap();
        assert_eq!(adapter.get_string("analysis", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_default_for_missing_or_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nrsi_period = abc\n").unwrap();
        assert_eq!(adapter.get_int("analysis", "rsi_period", 14), 14);
        assert_eq!(adapter.get_int("analysis", "missing", 42), 42);
    }

    #[test]
    fn get_list_splits_and_trims() {
        let adapter =
            FileConfigAdapter::from_string("[analysis]\nema_periods = 9, 20 ,50,,200\n").unwrap();
        assert_eq!(
            adapter.get_list("analysis", "ema_periods"),
            Some(vec!["9".to_string(), "20".to_string(), "50".to_string(), "200".to_string()])
        );
        assert_eq!(adapter.get_list("analysis", "missing"), None);
    }

    #[test]
    fn empty_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("data", "path"), None);
        assert_eq!(adapter.get_int("analysis", "rsi_period", 14), 14);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[data]\npath = /srv/bars\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("data", "path"), Some("/srv/bars".to_string()));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(matches!(result, Err(TrendscopeError::ConfigParse { .. })));
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/path/config.ini"));
    }

    #[test]
    fn adapter_is_debug_printable() {
        let adapter = FileConfigAdapter::from_string("[analysis]\nrsi_period = 14\n").unwrap();
        assert!(format!("{adapter:?}").contains("rsi_period"));
    }
}
