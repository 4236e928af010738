use crate::core::{ConfigProvider, EmailMessage, Mailer, MailerKind};
use crate::utils::error::{Result, SiteError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_SENDGRID_BASE_URL: &str = "https://api.sendgrid.com";

/// 開發用：只記錄郵件內容並模擬寄送延遲
#[derive(Debug, Clone)]
pub struct LogMailer {
    delay: Duration,
}

impl LogMailer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for LogMailer {
    fn default() -> Self {
        Self::new(Duration::from_millis(1000))
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        tracing::info!(
            subject = %message.subject,
            recipient = %message.recipient,
            sender = %message.sender,
            "✉️  Simulating email delivery"
        );
        tracing::debug!("Email body:\n{}", message.html_body);

        tokio::time::sleep(self.delay).await;
        Ok(())
    }

    fn provider(&self) -> &'static str {
        "log"
    }
}

#[derive(Debug, Clone)]
pub struct SendGridMailer {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct SendGridRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    r#type: &'a str,
    value: &'a str,
}

impl SendGridMailer {
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v3/mail/send", self.base_url)
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        let payload = SendGridRequest {
            personalizations: [Personalization {
                to: [Address {
                    email: &message.recipient,
                }],
            }],
            from: Address {
                email: &message.sender,
            },
            subject: &message.subject,
            content: [Content {
                r#type: "text/html",
                value: &message.html_body,
            }],
        };

        tracing::debug!("Making SendGrid request to: {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("SendGrid response status: {}", status);

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(SiteError::DeliveryError {
                provider: self.provider().to_string(),
                message: format!("HTTP {}: {}", status.as_u16(), body),
            })
        }
    }

    fn provider(&self) -> &'static str {
        "sendgrid"
    }
}

/// 依設定建立對應的寄信實作
pub fn build_mailer<C: ConfigProvider + ?Sized>(config: &C) -> Result<Arc<dyn Mailer>> {
    match config.mailer_kind() {
        MailerKind::Log => Ok(Arc::new(LogMailer::new(config.simulated_delay()))),
        MailerKind::Sendgrid => {
            let api_key = config
                .sendgrid_api_key()
                .filter(|key| !key.is_empty())
                .ok_or_else(|| SiteError::MissingConfigError {
                    field: "mail.sendgrid_api_key".to_string(),
                })?;
            Ok(Arc::new(SendGridMailer::with_base_url(
                api_key.to_string(),
                config.sendgrid_base_url().to_string(),
            )))
        }
    }
}
