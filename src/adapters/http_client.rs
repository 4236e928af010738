use crate::core::{ContactFormData, ContactTransport};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Posts the contact form as JSON to the site's `/api/contact` endpoint.
#[derive(Debug, Clone)]
pub struct HttpContactTransport {
    client: Client,
    endpoint: String,
}

impl HttpContactTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContactTransport for HttpContactTransport {
    async fn send(&self, data: &ContactFormData) -> Result<u16> {
        tracing::debug!("Making contact request to: {}", self.endpoint);
        let response = self.client.post(&self.endpoint).json(data).send().await?;

        let status = response.status();
        tracing::debug!("Contact response status: {}", status);
        Ok(status.as_u16())
    }
}
