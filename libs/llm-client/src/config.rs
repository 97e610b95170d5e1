use std::{env, fmt, str::FromStr, time::Duration};

use crate::error::LlmError;

mod defaults {
    pub const PROVIDER: &str = "azure";
    pub const AZURE_API_VERSION: &str = "2024-02-01";
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const OPENAI_MODEL: &str = "gpt-4o-mini";
    pub const TIMEOUT_SECS: &str = "30";
}

/// Hosted chat completion provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Azure,
    OpenAi,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Azure => write!(f, "azure"),
            Provider::OpenAi => write!(f, "openai"),
        }
    }
}

impl FromStr for Provider {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "azure" | "azure-openai" => Ok(Provider::Azure),
            "openai" => Ok(Provider::OpenAi),
            other => Err(LlmError::InvalidConfig(format!(
                "unknown AI_PROVIDER `{other}` (expected `azure` or `openai`)"
            ))),
        }
    }
}

/// Where requests go, per provider
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderSettings {
    Azure {
        endpoint: String,
        deployment: String,
        api_version: String,
    },
    OpenAi {
        base_url: String,
        model: String,
    },
}

/// Client configuration, enumerated from the environment at startup
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub api_key: String,
    pub settings: ProviderSettings,
    pub timeout: Duration,
}

impl LlmConfig {
    /// Load from the process environment (and `.env` if present)
    pub fn from_env() -> Result<Self, LlmError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LlmError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| LlmError::MissingEnvVar(key.into()));

        let provider = get("AI_PROVIDER")
            .unwrap_or_else(|| defaults::PROVIDER.to_string())
            .parse::<Provider>()?;

        let api_key = require("OPENAI_API_KEY")?;

        let settings = match provider {
            Provider::Azure => ProviderSettings::Azure {
                endpoint: require("AZURE_OPENAI_ENDPOINT")?
                    .trim_end_matches('/')
                    .to_string(),
                deployment: require("AZURE_OPENAI_DEPLOYMENT")?,
                api_version: get("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| defaults::AZURE_API_VERSION.to_string()),
            },
            Provider::OpenAi => ProviderSettings::OpenAi {
                base_url: get("OPENAI_BASE_URL")
                    .unwrap_or_else(|| defaults::OPENAI_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: get("OPENAI_MODEL").unwrap_or_else(|| defaults::OPENAI_MODEL.to_string()),
            },
        };

        let timeout_raw =
            get("AI_TIMEOUT_SECS").unwrap_or_else(|| defaults::TIMEOUT_SECS.to_string());
        let timeout_secs = timeout_raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| {
                LlmError::InvalidConfig(format!("AI_TIMEOUT_SECS must be a positive integer, got `{timeout_raw}`"))
            })?;

        Ok(Self {
            api_key,
            settings,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn provider(&self) -> Provider {
        match self.settings {
            ProviderSettings::Azure { .. } => Provider::Azure,
            ProviderSettings::OpenAi { .. } => Provider::OpenAi,
        }
    }

    /// Full chat completions URL
    pub fn chat_url(&self) -> String {
        match &self.settings {
            ProviderSettings::Azure {
                endpoint,
                deployment,
                api_version,
            } => format!(
                "{endpoint}/openai/deployments/{deployment}/chat/completions?api-version={api_version}"
            ),
            ProviderSettings::OpenAi { base_url, .. } => format!("{base_url}/chat/completions"),
        }
    }

    /// Deployment (Azure) or model (OpenAI) name, for logs
    pub fn target(&self) -> &str {
        match &self.settings {
            ProviderSettings::Azure { deployment, .. } => deployment,
            ProviderSettings::OpenAi { model, .. } => model,
        }
    }
}
