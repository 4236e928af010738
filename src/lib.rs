pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{http_client::HttpContactTransport, mailer::build_mailer};
pub use crate::config::{env_config::EnvConfig, toml_config::SiteConfig};
pub use crate::core::{
    contact::{ContactReply, ContactService},
    experience::{calculate_experience, total_experience, ExperienceSummary},
    submission::{ContactForm, FormState, SubmitOutcome},
};
pub use crate::utils::error::{Result, SiteError};
