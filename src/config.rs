//! Startup configuration from the environment

use crate::llm::AnthropicModel;
use crate::tools::JobSearchConfig;
use thiserror::Error;

const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Model backend settings
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Empty when a gateway handles authentication
    pub api_key: String,
    /// Gateway base URL, e.g. `http://169.254.169.254/gateway/llm`
    pub gateway: Option<String>,
    pub model: AnthropicModel,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmConfig,
    pub search: JobSearchConfig,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let gateway = get("LLM_GATEWAY");
        let api_key = match (get("ANTHROPIC_API_KEY"), &gateway) {
            (Some(key), _) => key,
            (None, Some(_)) => String::new(),
            (None, None) => return Err(ConfigError::Missing("ANTHROPIC_API_KEY")),
        };

        let model_id =
            get("JOB_SCOUT_MODEL").unwrap_or_else(|| AnthropicModel::DEFAULT_ID.to_string());
        let model = AnthropicModel::from_id(&model_id).ok_or_else(|| ConfigError::Invalid {
            name: "JOB_SCOUT_MODEL",
            value: model_id.clone(),
            reason: "unknown model".to_string(),
        })?;

        let search = JobSearchConfig {
            api_key: get("SERPAPI_API_KEY").ok_or(ConfigError::Missing("SERPAPI_API_KEY"))?,
            base_url: get("JOB_SCOUT_SEARCH_URL")
                .unwrap_or_else(|| JobSearchConfig::DEFAULT_BASE_URL.to_string()),
            max_results: parse_or(
                "JOB_SCOUT_MAX_RESULTS",
                get("JOB_SCOUT_MAX_RESULTS"),
                JobSearchConfig::DEFAULT_MAX_RESULTS,
            )?,
        };
        if search.max_results == 0 {
            return Err(ConfigError::Invalid {
                name: "JOB_SCOUT_MAX_RESULTS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let port = parse_or("JOB_SCOUT_PORT", get("JOB_SCOUT_PORT"), DEFAULT_PORT)?;

        Ok(Self {
            llm: LlmConfig {
                api_key,
                gateway,
                model,
            },
            search,
            port,
        })
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value: raw,
        }),
    }
}
