pub mod env_config;
pub mod toml_config;

use crate::adapters::mailer::DEFAULT_SENDGRID_BASE_URL;
use crate::core::{ConfigProvider, MailerKind};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{
    validate_email_address, validate_range, validate_socket_addr, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:4321";
pub const DEFAULT_RECIPIENT: &str = "owner@example.com";
pub const DEFAULT_SENDER: &str = "noreply@example.com";
pub const DEFAULT_SIMULATED_DELAY_MS: u64 = 1000;
pub const MAX_SIMULATED_DELAY_MS: u64 = 60_000;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    #[arg(long, default_value = DEFAULT_RECIPIENT)]
    pub recipient: String,

    #[arg(long, default_value = DEFAULT_SENDER)]
    pub sender: String,

    #[arg(long, value_enum, default_value_t = MailerKind::Log)]
    pub mailer: MailerKind,

    #[arg(long, default_value_t = DEFAULT_SIMULATED_DELAY_MS)]
    pub simulated_delay_ms: u64,

    #[arg(long, env = "SENDGRID_API_KEY", hide_env_values = true)]
    pub sendgrid_api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_SENDGRID_BASE_URL)]
    pub sendgrid_base_url: String,

    #[arg(long, help = "Load settings from a TOML file instead of flags")]
    pub config: Option<String>,

    #[arg(long, help = "Load settings from environment variables instead of flags")]
    pub from_env: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn bind_address(&self) -> &str {
        &self.bind
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

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// 所有設定來源共用的檢查
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_socket_addr("bind", config.bind_address())?;
    validate_email_address("recipient", config.recipient())?;
    validate_email_address("sender", config.sender())?;

    let delay_ms = u64::try_from(config.simulated_delay().as_millis()).unwrap_or(u64::MAX);
    validate_range("simulated_delay_ms", delay_ms, 0, MAX_SIMULATED_DELAY_MS)?;

    if config.mailer_kind() == MailerKind::Sendgrid {
        validate_url("sendgrid_base_url", config.sendgrid_base_url())?;

        match config.sendgrid_api_key() {
            None | Some("") => {
                return Err(SiteError::MissingConfigError {
                    field: "sendgrid_api_key".to_string(),
                })
            }
            // 未替換的 ${VAR} 代表環境變數沒有設定
            Some(key) if key.starts_with("${") => {
                return Err(SiteError::ConfigValidationError {
                    field: "sendgrid_api_key".to_string(),
                    message: format!("Environment variable {} is not set", key),
                })
            }
            Some(_) => {}
        }
    }

    Ok(())
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        config: CliConfig,
    }

    fn parse(args: &[&str]) -> CliConfig {
        TestCli::parse_from(std::iter::once("portfolio-backend").chain(args.iter().copied())).config
    }

    #[test]
    fn test_cli_defaults_are_valid() {
        let config = parse(&[]);
        assert_eq!(config.bind_address(), DEFAULT_BIND_ADDRESS);
        assert_eq!(config.mailer_kind(), MailerKind::Log);
        assert_eq!(config.simulated_delay(), Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sendgrid_requires_api_key() {
        let mut config = parse(&["--mailer", "sendgrid"]);
        config.sendgrid_api_key = None;
        assert!(matches!(
            config.validate(),
            Err(SiteError::MissingConfigError { .. })
        ));

        config.sendgrid_api_key = Some("SG.key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_bind_and_recipient() {
        let config = parse(&["--bind", "nowhere"]);
        assert!(config.validate().is_err());

        let config = parse(&["--recipient", "owner"]);
        assert!(config.validate().is_err());
    }
}
