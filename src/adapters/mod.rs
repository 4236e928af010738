// Adapters layer: concrete implementations for external systems (http server, http client, mail).

pub mod http_client;
pub mod mailer;
pub mod server;
