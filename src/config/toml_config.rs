use crate::adapters::mailer::DEFAULT_SENDGRID_BASE_URL;
use crate::config::{
    validate_provider, DEFAULT_BIND_ADDRESS, DEFAULT_RECIPIENT, DEFAULT_SENDER,
    DEFAULT_SIMULATED_DELAY_MS,
};
use crate::core::{ConfigProvider, MailerKind};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub mail: MailConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub provider: MailerKind,
    pub recipient: String,
    pub sender: String,
    pub sendgrid_api_key: Option<String>,
    pub sendgrid_base_url: Option<String>,
    pub simulated_delay_ms: Option<u64>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            provider: MailerKind::Log,
            recipient: DEFAULT_RECIPIENT.to_string(),
            sender: DEFAULT_SENDER.to_string(),
            sendgrid_api_key: None,
            sendgrid_base_url: None,
            simulated_delay_ms: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub verbose: Option<bool>,
    pub json: Option<bool>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl SiteConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SENDGRID_API_KEY})，未設定的保留原文
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn verbose(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for SiteConfig {
    fn bind_address(&self) -> &str {
        &self.server.bind
    }

    fn recipient(&self) -> &str {
        &self.mail.recipient
    }

    fn sender(&self) -> &str {
        &self.mail.sender
    }

    fn mailer_kind(&self) -> MailerKind {
        self.mail.provider
    }

    fn simulated_delay(&self) -> Duration {
        Duration::from_millis(
            self.mail
                .simulated_delay_ms
                .unwrap_or(DEFAULT_SIMULATED_DELAY_MS),
        )
    }

    fn sendgrid_api_key(&self) -> Option<&str> {
        self.mail.sendgrid_api_key.as_deref()
    }

    fn sendgrid_base_url(&self) -> &str {
        self.mail
            .sendgrid_base_url
            .as_deref()
            .unwrap_or(DEFAULT_SENDGRID_BASE_URL)
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
