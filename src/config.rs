//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{AppError, Result};

/// Keychain service name used when looking up Slack credentials.
const KEYRING_SERVICE: &str = "helpdesk-bot";

/// Slack credentials for the Events API webhook and Web API calls.
///
/// Tokens are loaded at runtime via OS keychain or environment variables,
/// never from the TOML config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Bot user token used for posting messages and opening modals.
    #[serde(skip)]
    pub bot_token: String,
    /// Signing secret used to verify inbound webhook requests.
    #[serde(skip)]
    pub signing_secret: String,
}

/// Which state store backend holds framework state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StateBackend {
    /// Process-local map; single instance, lost on restart.
    #[default]
    Memory,
    /// Shared Redis instance.
    Redis,
}

impl StateBackend {
    /// Stable lowercase name reported by the health endpoint.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Redis => "redis",
        }
    }
}

/// State store configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct StateConfig {
    /// Selected backend.
    #[serde(default)]
    pub backend: StateBackend,
    /// Redis connection string; required when `backend = "redis"`.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Namespace prepended to every key.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// How long a webhook delivery id is remembered for de-duplication.
    #[serde(default = "default_dedup_ttl_seconds")]
    pub dedup_ttl_seconds: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::Memory,
            redis_url: None,
            key_prefix: default_key_prefix(),
            dedup_ttl_seconds: default_dedup_ttl_seconds(),
        }
    }
}

/// Which inbound message shape shows the category card.
///
/// Exactly one policy is active at a time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TriggerPolicy {
    /// Bot mention whose text contains the keyword (case-insensitive).
    #[default]
    Mention,
    /// Plain channel message whose trimmed text equals the keyword (case-insensitive).
    Message,
    /// Slash command matching the configured command name.
    SlashCommand,
}

/// Trigger detection configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct TriggerConfig {
    /// Active matching policy.
    #[serde(default)]
    pub policy: TriggerPolicy,
    /// Keyword for the mention and message policies.
    #[serde(default = "default_keyword")]
    pub keyword: String,
    /// Slash command name for the slash-command policy.
    #[serde(default = "default_command")]
    pub command: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            policy: TriggerPolicy::Mention,
            keyword: default_keyword(),
            command: default_command(),
        }
    }
}

fn default_http_port() -> u16 {
    3000
}

fn default_bind_address() -> String {
    "0.0.0.0".into()
}

fn default_key_prefix() -> String {
    "helpdesk".into()
}

fn default_dedup_ttl_seconds() -> u64 {
    600
}

fn default_keyword() -> String {
    "help".into()
}

fn default_command() -> String {
    "/helpdesk".into()
}

/// Global configuration parsed from an optional `config.toml` and the
/// process environment.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// HTTP port for the webhook and health endpoints.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Interface the HTTP server binds to.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Slack credentials.
    #[serde(default)]
    pub slack: SlackConfig,
    /// State store selection.
    #[serde(default)]
    pub state: StateConfig,
    /// Trigger detection.
    #[serde(default)]
    pub trigger: TriggerConfig,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            bind_address: default_bind_address(),
            slack: SlackConfig::default(),
            state: StateConfig::default(),
            trigger: TriggerConfig::default(),
        }
    }
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Overlay `REDIS_URL` and `PORT` from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| env::var(key).ok())
    }

    /// Overlay environment settings obtained through `lookup`.
    ///
    /// A non-empty `REDIS_URL` selects the Redis backend; its absence keeps
    /// whatever the file configured (memory by default).
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid port number or
    /// the resulting configuration fails validation.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("REDIS_URL").filter(|v| !v.trim().is_empty()) {
            self.state.backend = StateBackend::Redis;
            self.state.redis_url = Some(url);
        }

        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.http_port = port
                .trim()
                .parse()
                .map_err(|err| AppError::Config(format!("invalid PORT {port:?}: {err}")))?;
        }

        self.validate()
    }

    /// Load Slack credentials from OS keychain with env-var fallback.
    ///
    /// Tries the `helpdesk-bot` keyring service first, then falls back to
    /// `SLACK_BOT_TOKEN` / `SLACK_SIGNING_SECRET`. A credential found in
    /// neither place is left empty and reported as a warning.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the keychain lookup task panics.
    pub async fn load_credentials(&mut self) -> Result<()> {
        self.slack.bot_token = load_credential("slack_bot_token", "SLACK_BOT_TOKEN")
            .await?
            .unwrap_or_default();
        self.slack.signing_secret =
            load_credential("slack_signing_secret", "SLACK_SIGNING_SECRET")
                .await?
                .unwrap_or_default();

        if self.slack.bot_token.is_empty() {
            warn!("SLACK_BOT_TOKEN is not set");
        }
        if self.slack.signing_secret.is_empty() {
            warn!("SLACK_SIGNING_SECRET is not set");
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.state.backend == StateBackend::Redis
            && self
                .state
                .redis_url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            return Err(AppError::Config(
                "state.redis_url is required when state.backend = \"redis\"".into(),
            ));
        }

        if self.trigger.keyword.trim().is_empty() {
            return Err(AppError::Config("trigger.keyword must not be empty".into()));
        }

        if !self.trigger.command.starts_with('/') {
            return Err(AppError::Config(
                "trigger.command must start with '/'".into(),
            ));
        }

        Ok(())
    }
}

/// Load a single credential from OS keychain with env-var fallback.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<Option<String>> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(Some(value)),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(keyring::Error::NoEntry) => {}
        Err(err) => {
            warn!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    Ok(env::var(env_key).ok().filter(|value| !value.is_empty()))
}
