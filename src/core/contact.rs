use crate::core::{ContactFormData, ContactResponse, EmailMessage, Mailer};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::Validate;
use chrono::Utc;
use std::sync::Arc;

pub const MISSING_FIELDS_ERROR: &str = "Missing required fields";
pub const SEND_FAILED_ERROR: &str = "Failed to send message. Please try again.";
pub const SENT_MESSAGE: &str = "Message sent successfully!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReply {
    pub status: u16,
    pub body: ContactResponse,
}

impl ContactReply {
    fn sent() -> Self {
        Self {
            status: 200,
            body: ContactResponse::sent(SENT_MESSAGE),
        }
    }

    fn missing_fields() -> Self {
        Self {
            status: 400,
            body: ContactResponse::failed(MISSING_FIELDS_ERROR),
        }
    }

    fn send_failed() -> Self {
        Self {
            status: 500,
            body: ContactResponse::failed(SEND_FAILED_ERROR),
        }
    }
}

/// Server side of the contact form. Holds no per-request state.
pub struct ContactService {
    mailer: Arc<dyn Mailer>,
    recipient: String,
    sender: String,
}

impl ContactService {
    pub fn new(mailer: Arc<dyn Mailer>, recipient: String, sender: String) -> Self {
        Self {
            mailer,
            recipient,
            sender,
        }
    }

    /// Handles one raw request body and maps every outcome to a reply.
    pub async fn handle(&self, body: &[u8]) -> ContactReply {
        let data: ContactFormData = match serde_json::from_slice(body) {
            Ok(data) => data,
            Err(e) => {
                tracing::error!("❌ Contact form error: {}", SiteError::SerializationError(e));
                return ContactReply::send_failed();
            }
        };

        self.handle_form(data).await
    }

    pub async fn handle_form(&self, data: ContactFormData) -> ContactReply {
        if let Err(e) = data.validate() {
            tracing::warn!("Rejected contact submission: {}", e);
            return ContactReply::missing_fields();
        }

        tracing::info!(
            first_name = %data.first_name,
            last_name = %data.last_name,
            email = %data.email,
            phone = %data.phone,
            message = %data.message,
            timestamp = %Utc::now().to_rfc3339(),
            "📨 Contact form submission"
        );

        match self.dispatch(&data).await {
            Ok(()) => {
                tracing::info!("✅ Contact message delivered via {}", self.mailer.provider());
                ContactReply::sent()
            }
            Err(e) => {
                tracing::error!(
                    "❌ Contact form error: {} (Category: {:?})",
                    e,
                    e.category()
                );
                ContactReply::send_failed()
            }
        }
    }

    async fn dispatch(&self, data: &ContactFormData) -> Result<()> {
        let message = build_email(data, &self.recipient, &self.sender);
        self.mailer.send(&message).await
    }
}

pub fn build_email(data: &ContactFormData, recipient: &str, sender: &str) -> EmailMessage {
    let phone = if data.phone.is_empty() {
        "Not provided".to_string()
    } else {
        escape_html(&data.phone)
    };

    let html_body = format!(
        "<h2>New Contact Form Submission</h2>\n\
         <p><strong>Name:</strong> {} {}</p>\n\
         <p><strong>Email:</strong> {}</p>\n\
         <p><strong>Phone:</strong> {}</p>\n\
         <p><strong>Message:</strong></p>\n\
         <p>{}</p>\n",
        escape_html(&data.first_name),
        escape_html(&data.last_name),
        escape_html(&data.email),
        phone,
        escape_html(&data.message),
    );

    EmailMessage {
        subject: format!("New Contact Form Submission from {}", data.full_name()),
        recipient: recipient.to_string(),
        sender: sender.to_string(),
        html_body,
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, message: &EmailMessage) -> Result<()> {
            if self.fail {
                return Err(SiteError::DeliveryError {
                    provider: "test".to_string(),
                    message: "boom".to_string(),
                });
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }

        fn provider(&self) -> &'static str {
            "test"
        }
    }

    fn service(mailer: Arc<RecordingMailer>) -> ContactService {
        ContactService::new(mailer, "owner@example.com".into(), "noreply@example.com".into())
    }

    #[tokio::test]
    async fn test_valid_submission_is_sent() {
        let mailer = Arc::new(RecordingMailer::default());
        let reply = service(mailer.clone())
            .handle(br#"{"firstName":"A","lastName":"B","email":"a@b.com","message":"hi"}"#)
            .await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, ContactResponse::sent(SENT_MESSAGE));

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New Contact Form Submission from A B");
        assert_eq!(sent[0].recipient, "owner@example.com");
        assert!(sent[0].html_body.contains("Not provided"));
    }

    #[tokio::test]
    async fn test_missing_message_is_rejected_without_sending() {
        let mailer = Arc::new(RecordingMailer::default());
        let reply = service(mailer.clone())
            .handle(br#"{"firstName":"A","lastName":"B","email":"a@b.com"}"#)
            .await;

        assert_eq!(reply.status, 400);
        assert_eq!(reply.body, ContactResponse::failed(MISSING_FIELDS_ERROR));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_string_counts_as_missing() {
        let mailer = Arc::new(RecordingMailer::default());
        let reply = service(mailer)
            .handle(br#"{"firstName":"","lastName":"B","email":"a@b.com","message":"hi"}"#)
            .await;
        assert_eq!(reply.status, 400);
    }

    #[tokio::test]
    async fn test_mailer_failure_is_500() {
        let mailer = Arc::new(RecordingMailer {
            fail: true,
            ..Default::default()
        });
        let reply = service(mailer)
            .handle(br#"{"firstName":"A","lastName":"B","email":"a@b.com","message":"hi"}"#)
            .await;

        assert_eq!(reply.status, 500);
        assert_eq!(reply.body, ContactResponse::failed(SEND_FAILED_ERROR));
    }

    #[tokio::test]
    async fn test_malformed_json_is_500() {
        let mailer = Arc::new(RecordingMailer::default());
        let reply = service(mailer).handle(b"{not json").await;
        assert_eq!(reply.status, 500);
    }

    #[test]
    fn test_build_email_escapes_user_input() {
        let data = ContactFormData {
            first_name: "<b>A</b>".into(),
            last_name: "B".into(),
            email: "a@b.com".into(),
            phone: "555 & 0100".into(),
            message: "x < y".into(),
        };
        let email = build_email(&data, "owner@example.com", "noreply@example.com");
        assert!(email.html_body.contains("&lt;b&gt;A&lt;/b&gt; B"));
        assert!(email.html_body.contains("555 &amp; 0100"));
        assert!(email.html_body.contains("x &lt; y"));
        assert!(!email.html_body.contains("Not provided"));
    }
}
