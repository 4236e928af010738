use crate::adapters::mailer::DEFAULT_SENDGRID_BASE_URL;
use crate::config::{
    validate_provider, DEFAULT_BIND_ADDRESS, DEFAULT_RECIPIENT, DEFAULT_SENDER,
    DEFAULT_SIMULATED_DELAY_MS,
};
use crate::core::{ConfigProvider, MailerKind};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::Validate;
use std::env;
use std::time::Duration;

/// 容器部署時由環境變數提供設定
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub bind_address: String,
    pub recipient: String,
    pub sender: String,
    pub mailer: MailerKind,
    pub sendgrid_api_key: Option<String>,
    pub sendgrid_base_url: String,
    pub simulated_delay_ms: u64,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mailer = match lookup("MAILER").as_deref() {
            None | Some("") | Some("log") => MailerKind::Log,
            Some("sendgrid") => MailerKind::Sendgrid,
            Some(other) => {
                return Err(SiteError::InvalidConfigValueError {
                    field: "MAILER".to_string(),
                    value: other.to_string(),
                    reason: "Supported mailers: log, sendgrid".to_string(),
                })
            }
        };

        let simulated_delay_ms = match lookup("SIMULATED_DELAY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| SiteError::InvalidConfigValueError {
                    field: "SIMULATED_DELAY_MS".to_string(),
                    value: raw.clone(),
                    reason: "Expected a whole number of milliseconds".to_string(),
                })?,
            None => DEFAULT_SIMULATED_DELAY_MS,
        };

        Ok(Self {
            bind_address: lookup("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            recipient: lookup("CONTACT_RECIPIENT").unwrap_or_else(|| DEFAULT_RECIPIENT.to_string()),
            sender: lookup("CONTACT_SENDER").unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            mailer,
            sendgrid_api_key: lookup("SENDGRID_API_KEY"),
            sendgrid_base_url: lookup("SENDGRID_BASE_URL")
                .unwrap_or_else(|| DEFAULT_SENDGRID_BASE_URL.to_string()),
            simulated_delay_ms,
        })
    }
}

impl ConfigProvider for EnvConfig {
    fn bind_address(&self) -> &str {
        &self.bind_address
    }

    fn recipient(&self) -> &str {
        &self.recipient
    }

    fn sender(&self) -> &str {
        &self.sender
    }

    fn mailer_kind(&self) -> MailerKind {
        self.mailer
    }

    fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.simulated_delay_ms)
    }

    fn sendgrid_api_key(&self) -> Option<&str> {
        self.sendgrid_api_key.as_deref()
    }

    fn sendgrid_base_url(&self) -> &str {
        &self.sendgrid_base_url
    }
}

impl Validate for EnvConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        tracing::info!("✅ Environment configuration validation passed");
        Ok(())
    }
}
