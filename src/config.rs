// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the portfolio API service.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Document store configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Contact submission throttle configuration
    #[serde(default)]
    pub throttle: ThrottleConfig,

    /// Contact gate configuration
    #[serde(default)]
    pub gate: GateConfig,

    /// Outbound mail configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// List endpoint page size when the client does not ask for one
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

/// Document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Storage path, or "memory" for the in-memory engine (default: memory)
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Throttle configuration for accepted contact submissions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    /// Minimum seconds between submissions from one client key (default: 30)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Seconds of inactivity before a client entry is evicted (default: 3600)
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,

    /// Interval between eviction sweeps in seconds (default: 3600)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

/// Contact gate thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Minimum milliseconds between form render and submission (default: 3000)
    #[serde(default = "default_min_fill_ms")]
    pub min_fill_ms: i64,

    /// Maximum name length in characters (default: 100)
    #[serde(default = "default_max_name_chars")]
    pub max_name_chars: usize,

    /// Maximum subject length in characters (default: 200)
    #[serde(default = "default_max_subject_chars")]
    pub max_subject_chars: usize,

    /// Maximum message length in characters (default: 2000)
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Minimum whitespace-separated words in the message (default: 3)
    #[serde(default = "default_min_message_words")]
    pub min_message_words: usize,

    /// Keywords that mark content as spam, matched on word boundaries
    #[serde(default = "default_spam_keywords")]
    pub spam_keywords: Vec<String>,
}

/// Outbound mail configuration. Mail is disabled unless `endpoint` is set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MailConfig {
    /// HTTP mail API endpoint, e.g. https://mail.example.net/v1/send
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token for the mail API
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sender address
    #[serde(default)]
    pub from: String,

    /// Notification recipient address
    #[serde(default)]
    pub to: String,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_database_path() -> String {
    "memory".to_string()
}

fn default_window_secs() -> u64 {
    30
}

fn default_idle_ttl_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    3600
}

fn default_min_fill_ms() -> i64 {
    3000
}

fn default_max_name_chars() -> usize {
    100
}

fn default_max_subject_chars() -> usize {
    200
}

fn default_max_message_chars() -> usize {
    2000
}

fn default_min_message_words() -> usize {
    3
}

fn default_spam_keywords() -> Vec<String> {
    [
        "viagra",
        "casino",
        "lottery",
        "winner",
        "congratulations",
        "claim",
        "prize",
        "free money",
        "earn money",
        "work from home",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_page_size() -> u32 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            database: DatabaseConfig::default(),
            throttle: ThrottleConfig::default(),
            gate: GateConfig::default(),
            mail: MailConfig::default(),
            default_page_size: default_page_size(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            idle_ttl_secs: default_idle_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            min_fill_ms: default_min_fill_ms(),
            max_name_chars: default_max_name_chars(),
            max_subject_chars: default_max_subject_chars(),
            max_message_chars: default_max_message_chars(),
            min_message_words: default_min_message_words(),
            spam_keywords: default_spam_keywords(),
        }
    }
}

impl ThrottleConfig {
    /// Minimum gap between accepted submissions from one client key.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// Idle lifetime after which a client entry is swept.
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    /// Interval between eviction sweeps.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl MailConfig {
    /// Whether an outbound transport is configured.
    pub fn enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.throttle.window(), Duration::from_secs(30));
        assert_eq!(config.throttle.idle_ttl(), Duration::from_secs(3600));
        assert_eq!(config.gate.min_fill_ms, 3000);
        assert_eq!(config.gate.max_message_chars, 2000);
        assert!(!config.mail.enabled());
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"bind_addr": "127.0.0.1:9000"}"#).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.throttle.window_secs, 30);
    }
}
