use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { session_file: default_session_file() }
    }
}

/// How a multi-file upload reacts to a failed file.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UploadPolicyKind {
    #[default]
    AbortOnFirstFailure,
    BestEffort,
    AllOrNothing,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UploadConfig {
    #[serde(default)]
    pub policy: UploadPolicyKind,
}

/// How a service swap is persisted.
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReorderStrategyKind {
    #[default]
    Paired,
    Batched,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ServicesConfig {
    #[serde(default)]
    pub reorder: ReorderStrategyKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { format: default_log_format() }
    }
}

fn default_base_url() -> String { common::DEFAULT_API_URL.to_string() }
fn default_session_file() -> String { "data/session.json".to_string() }
fn default_log_format() -> String { "compact".to_string() }

pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Like `load_and_validate`, but a missing config file falls back to defaults.
    pub fn load_or_default() -> Result<Self> {
        let path = config_path();
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        // PORTAL_API_URL wins over the file
        self.api.normalize_from_env();
        self.api.normalize();
        self.api.validate()?;
        self.storage.validate()?;
        self.logging.normalize();
        Ok(())
    }
}

impl ApiConfig {
    pub fn normalize_from_env(&mut self) {
        if let Some(url) = common::env::api_url_from_env() {
            self.base_url = url;
        }
    }

    fn normalize(&mut self) {
        let trimmed = self.base_url.trim().trim_end_matches('/').to_string();
        self.base_url = if trimmed.is_empty() { default_base_url() } else { trimmed };
    }

    pub fn validate(&self) -> Result<()> {
        let lower = self.base_url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("api.base_url must start with http:// or https://"));
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.session_file.trim().is_empty() {
            return Err(anyhow!("storage.session_file must not be empty"));
        }
        Ok(())
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        let f = self.format.trim().to_lowercase();
        self.format = if f == "json" { f } else { default_log_format() };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = parse("").unwrap();
        assert_eq!(cfg.api.base_url, "http://localhost:8000");
        assert_eq!(cfg.storage.session_file, "data/session.json");
        assert_eq!(cfg.upload.policy, UploadPolicyKind::AbortOnFirstFailure);
        assert_eq!(cfg.services.reorder, ReorderStrategyKind::Paired);
        assert_eq!(cfg.logging.format, "compact");
    }

    #[test]
    fn sections_parse() {
        let cfg = parse(
            r#"
            [api]
            base_url = "https://api.example.com/"

            [upload]
            policy = "best_effort"

            [services]
            reorder = "batched"

            [logging]
            format = "JSON"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.upload.policy, UploadPolicyKind::BestEffort);
        assert_eq!(cfg.services.reorder, ReorderStrategyKind::Batched);
        assert_eq!(cfg.api.base_url, "https://api.example.com/");
    }

    #[test]
    fn normalize_trims_trailing_slash_and_format() {
        let mut api = ApiConfig { base_url: " https://api.example.com// ".into() };
        api.normalize();
        assert_eq!(api.base_url, "https://api.example.com");

        let mut logging = LoggingConfig { format: "JSON".into() };
        logging.normalize();
        assert_eq!(logging.format, "json");
        let mut logging = LoggingConfig { format: "pretty".into() };
        logging.normalize();
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let api = ApiConfig { base_url: "ftp://files.example.com".into() };
        assert!(api.validate().is_err());
    }

    #[test]
    fn rejects_unknown_policy() {
        assert!(parse("[upload]\npolicy = \"sometimes\"").is_err());
    }
}
