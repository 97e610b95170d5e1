use thiserror::Error;

use crate::config::Provider;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Missing `{0}` environment variable")]
    MissingEnvVar(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("[{provider}] request timed out after {timeout_secs}s")]
    Timeout { provider: Provider, timeout_secs: u64 },

    #[error("[{provider}] network error: {message}")]
    Network { provider: Provider, message: String },

    #[error("[{provider}] authentication failed: {message}")]
    Auth { provider: Provider, message: String },

    #[error("[{provider}] rate limited{}", retry_hint(.retry_after_secs))]
    RateLimited {
        provider: Provider,
        retry_after_secs: Option<u64>,
    },

    #[error("[{provider}] API error {status}: {message}")]
    Api {
        provider: Provider,
        status: u16,
        message: String,
    },

    #[error("[{provider}] invalid response: {message}")]
    InvalidResponse { provider: Provider, message: String },
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(" (retry after {secs}s)"),
        None => String::new(),
    }
}
