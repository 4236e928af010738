use crate::domain::model::{ContactFormData, EmailMessage};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delivers a contact message to the site owner.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<()>;

    /// Provider name used in logs and errors.
    fn provider(&self) -> &'static str;
}

/// Client side of `POST /api/contact`. Returns the HTTP status code.
#[async_trait]
pub trait ContactTransport: Send + Sync {
    async fn send(&self, data: &ContactFormData) -> Result<u16>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum MailerKind {
    #[default]
    Log,
    Sendgrid,
}

pub trait ConfigProvider: Send + Sync {
    fn bind_address(&self) -> &str;
    fn recipient(&self) -> &str;
    fn sender(&self) -> &str;
    fn mailer_kind(&self) -> MailerKind;
    fn simulated_delay(&self) -> Duration;
    fn sendgrid_api_key(&self) -> Option<&str>;
    fn sendgrid_base_url(&self) -> &str;
}
