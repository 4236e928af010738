pub mod contact;
pub mod experience;
pub mod submission;

pub use crate::domain::model::{
    ContactFormData, ContactResponse, EmailMessage, FormField, SubmissionStatus,
};
pub use crate::domain::ports::{ConfigProvider, ContactTransport, Mailer, MailerKind};
pub use crate::utils::error::Result;
