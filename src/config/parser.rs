//! Configuration file loading

use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use std::fs;
use std::path::Path;

/// Loads and validates a TOML configuration file
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let file = write_config(
            r#"
            [crawler]
            max-links = 64
            pool-size = 4
            request-delay-ms = 100

            [crawler.headers]
            User-Agent = "burrow/1.0"

            [output]
            database-path = "./burrow.db"
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawler.max_links, 64);
        assert_eq!(config.crawler.pool_size, 4);
        assert_eq!(config.crawler.request_delay_ms, 100);
        assert_eq!(
            config.crawler.headers.get("User-Agent"),
            Some(&"burrow/1.0".to_string())
        );
        assert_eq!(config.output.database_path, "./burrow.db");
    }

    #[test]
    fn test_delay_and_headers_default() {
        let file = write_config(
            r#"
            [crawler]
            max-links = 10
            pool-size = 2

            [output]
            database-path = "./burrow.db"
            "#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.crawler.request_delay_ms, 0);
        assert!(config.crawler.headers.is_empty());
    }

    #[test]
    fn test_load_invalid_toml() {
        let file = write_config("not toml at all [");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_zero_budget() {
        let file = write_config(
            r#"
            [crawler]
            max-links = 0
            pool-size = 2

            [output]
            database-path = "./burrow.db"
            "#,
        );

        assert!(load_config(file.path()).is_err());
    }
}
