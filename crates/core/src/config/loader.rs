//! Configuration file loading and environment overrides

use super::schema::{ConfigSchema, MAX_CACHE_TTL_SECS, MAX_TOKEN_TTL_MINUTES};
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Configuration wrapper
#[derive(Debug, Clone)]
pub struct Config {
    /// Effective settings
    pub schema: ConfigSchema,
    /// File the settings were read from, if any
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path (or standard locations), then apply
    /// environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let mut schema = if let Some(ref p) = config_path {
            load_config_file(p)?
        } else {
            ConfigSchema::default()
        };

        apply_env_overrides(&mut schema, |name| std::env::var(name).ok())?;

        let config = Self {
            schema,
            path: config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults only (no file, no environment)
    #[must_use]
    pub fn defaults() -> Self {
        Self {
            schema: ConfigSchema::default(),
            path: None,
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let fooddata = &self.schema.fooddata;

        for (name, url) in [
            ("fooddata.search_url", &fooddata.search_url),
            ("fooddata.food_detail_url", &fooddata.food_detail_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::new(
                    ErrorCode::ConfigValidationError,
                    format!("{name} must start with http:// or https://"),
                ));
            }
        }

        if fooddata.timeout_secs == 0 {
            return Err(Error::new(
                ErrorCode::ConfigValidationError,
                "fooddata.timeout_secs cannot be zero",
            ));
        }

        // FoodData Central caps pageSize at 200
        if !(1..=200).contains(&fooddata.page_size) {
            return Err(Error::new(
                ErrorCode::ConfigValidationError,
                "fooddata.page_size must be between 1 and 200",
            ));
        }

        if self.schema.auth.token_ttl_minutes > MAX_TOKEN_TTL_MINUTES {
            return Err(Error::new(
                ErrorCode::ConfigValidationError,
                format!("auth.token_ttl_minutes cannot exceed {MAX_TOKEN_TTL_MINUTES}"),
            ));
        }

        if self.schema.cache.ttl_secs > MAX_CACHE_TTL_SECS {
            return Err(Error::new(
                ErrorCode::ConfigValidationError,
                format!("cache.ttl_secs cannot exceed {MAX_CACHE_TTL_SECS}"),
            ));
        }

        Ok(())
    }

    /// The upstream API key, required for any lookup
    pub fn require_api_key(&self) -> Result<&str> {
        self.schema
            .fooddata
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::missing_setting("fooddata.api_key", "USDA_API_KEY"))
    }

    /// The token signing secret, required for issuing or verifying tokens
    pub fn require_jwt_secret(&self) -> Result<&str> {
        self.schema
            .auth
            .jwt_secret
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::missing_setting("auth.jwt_secret", "JWT_SECRET"))
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = [
        "calorie-counter.toml",
        ".calorie-counter.toml",
        ".config/calorie-counter.toml",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("calorie-counter").join("config.toml"));
    }

    candidates.into_iter().find(|p| p.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::from(e).with_context(format!("Failed to read config file {}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::from(e).with_context(format!("Failed to parse config file {}", path.display()))
    })
}

/// Apply the service's environment variables on top of file settings
pub(crate) fn apply_env_overrides<F>(schema: &mut ConfigSchema, lookup: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("USDA_API_KEY") {
        schema.fooddata.api_key = Some(key);
    }
    if let Some(url) = lookup("USDA_SEARCH_URL") {
        schema.fooddata.search_url = url;
    }
    if let Some(url) = lookup("USDA_FOOD_DETAIL") {
        schema.fooddata.food_detail_url = url;
    }
    if let Some(secret) = lookup("JWT_SECRET") {
        schema.auth.jwt_secret = Some(secret);
    }

    if let Some(v) = parse_var(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES")? {
        schema.auth.token_ttl_minutes = v;
    }
    if let Some(v) = parse_var(&lookup, "RATE_LIMIT_PER_MINUTE")? {
        schema.rate_limit.per_minute = v;
    }
    if let Some(v) = parse_var(&lookup, "CALORIE_CACHE_CAPACITY")? {
        schema.cache.capacity = v;
    }
    if let Some(v) = parse_var(&lookup, "CALORIE_CACHE_TTL_SECS")? {
        schema.cache.ttl_secs = v;
    }

    Ok(())
}

fn parse_var<F, T>(lookup: &F, name: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            Error::new(
                ErrorCode::ConfigValidationError,
                format!("{name} must be a non-negative integer, got {raw:?}"),
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert!(config.path.is_none());
        assert_eq!(config.schema.fooddata.page_size, 25);
        assert_eq!(config.schema.fooddata.timeout_secs, 30);
        assert_eq!(config.schema.auth.token_ttl_minutes, 30);
        assert_eq!(config.schema.rate_limit.per_minute, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("calorie-counter.toml");
        std::fs::write(
            &path,
            r#"
[fooddata]
api_key = "file-key"
page_size = 50

[cache]
capacity = 16
ttl_secs = 0
"#,
        )
        .unwrap();

        let schema = load_config_file(&path).unwrap();
        assert_eq!(schema.fooddata.api_key.as_deref(), Some("file-key"));
        assert_eq!(schema.fooddata.page_size, 50);
        assert_eq!(schema.fooddata.search_url, crate::config::DEFAULT_SEARCH_URL);
        assert_eq!(schema.cache.capacity, 16);
        assert_eq!(schema.cache.ttl_secs, 0);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigNotFound);
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[fooddata\napi_key = ").unwrap();

        let err = load_config_file(&path).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigParseError);
    }

    #[test]
    fn test_env_overrides() {
        let mut schema = ConfigSchema::default();
        apply_env_overrides(
            &mut schema,
            env(&[
                ("USDA_API_KEY", "env-key"),
                ("USDA_FOOD_DETAIL", "https://example.test/food/{}"),
                ("JWT_SECRET", "s3cret"),
                ("ACCESS_TOKEN_EXPIRE_MINUTES", "45"),
                ("RATE_LIMIT_PER_MINUTE", " 3 "),
            ]),
        )
        .unwrap();

        assert_eq!(schema.fooddata.api_key.as_deref(), Some("env-key"));
        assert_eq!(schema.fooddata.food_detail_url, "https://example.test/food/{}");
        assert_eq!(schema.auth.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(schema.auth.token_ttl_minutes, 45);
        assert_eq!(schema.rate_limit.per_minute, 3);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let mut schema = ConfigSchema::default();
        let err = apply_env_overrides(&mut schema, env(&[("RATE_LIMIT_PER_MINUTE", "ten")]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigValidationError);
    }

    #[test]
    fn test_validation() {
        let mut config = Config::defaults();
        config.schema.fooddata.search_url = "ftp://nope".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::defaults();
        config.schema.fooddata.page_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_lifetimes() {
        let mut config = Config::defaults();
        config.schema.auth.token_ttl_minutes = 1_000_000_000_000;
        assert_eq!(
            config.validate().unwrap_err().code,
            ErrorCode::ConfigValidationError
        );
        config.schema.auth.token_ttl_minutes = MAX_TOKEN_TTL_MINUTES;
        assert!(config.validate().is_ok());

        let mut config = Config::defaults();
        config.schema.cache.ttl_secs = u64::MAX;
        assert_eq!(
            config.validate().unwrap_err().code,
            ErrorCode::ConfigValidationError
        );
        config.schema.cache.ttl_secs = MAX_CACHE_TTL_SECS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_required_settings() {
        let mut config = Config::defaults();
        assert_eq!(
            config.require_api_key().unwrap_err().code,
            ErrorCode::MissingSetting
        );

        config.schema.fooddata.api_key = Some("k".to_string());
        config.schema.auth.jwt_secret = Some(String::new());
        assert_eq!(config.require_api_key().unwrap(), "k");
        assert!(config.require_jwt_secret().is_err());
    }
}
