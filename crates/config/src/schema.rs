//! Config schema types (command routing, queues, store, gateway).

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Prefix character that marks a chat message as a bot command.
pub const DEFAULT_COMMAND_PREFIX: char = '%';

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Character every command starts with (`%help`, `%match 2-cam`).
    pub command_prefix: char,

    /// Channel IDs where commands are accepted.
    pub command_channels: Vec<String>,

    /// Where a queue's capacity comes from when deciding to form a group.
    pub capacity_rule: CapacityRule,

    /// Queues members can join, in the order the help text lists them.
    pub queues: Vec<QueueConfig>,

    pub redis: RedisConfig,
    pub discord: DiscordConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: DEFAULT_COMMAND_PREFIX,
            command_channels: Vec::new(),
            capacity_rule: CapacityRule::default(),
            queues: default_queues(),
            redis: RedisConfig::default(),
            discord: DiscordConfig::default(),
        }
    }
}

/// Source of truth for a queue's group size.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CapacityRule {
    /// Use the `capacity` configured for the queue.
    #[default]
    Configured,
    /// Legacy rule: names starting with `2` hold two members, all others three.
    /// The configured capacity only gates which names exist.
    NamePrefix,
}

/// A joinable queue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueConfig {
    pub name: String,
    pub capacity: usize,
}

impl QueueConfig {
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// The queues the bot shipped with.
pub fn default_queues() -> Vec<QueueConfig> {
    vec![
        QueueConfig::new("2-cam", 2),
        QueueConfig::new("2-screenshare", 2),
        QueueConfig::new("2-cam-or-screenshare", 2),
        QueueConfig::new("3-cam", 3),
        QueueConfig::new("3-screenshare", 3),
        QueueConfig::new("3-cam-or-screenshare", 3),
    ]
}

/// Connection settings for the Redis list store.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<Secret<String>>,
    /// Logical database index (`SELECT n`).
    pub db: i64,
    /// Prepended to every queue name to form the list key. Empty by default,
    /// so keys are the bare queue names.
    pub key_prefix: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 6379,
            password: None,
            db: 0,
            key_prefix: String::new(),
        }
    }
}

impl RedisConfig {
    /// Whether a non-empty password is configured.
    #[must_use]
    pub fn has_password(&self) -> bool {
        self.password
            .as_ref()
            .is_some_and(|p| !p.expose_secret().is_empty())
    }
}

/// Discord bot account settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscordConfig {
    /// Bot token from the Discord developer portal.
    pub token: Secret<String>,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: Secret::new(String::new()),
        }
    }
}

impl DiscordConfig {
    #[must_use]
    pub fn has_token(&self) -> bool {
        !self.token.expose_secret().trim().is_empty()
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = BotConfig::default();
        assert_eq!(cfg.command_prefix, '%');
        assert!(cfg.command_channels.is_empty());
        assert_eq!(cfg.capacity_rule, CapacityRule::Configured);
        assert_eq!(cfg.queues.len(), 6);
        assert_eq!(cfg.queues[0], QueueConfig::new("2-cam", 2));
        assert_eq!(cfg.redis.host, "localhost");
        assert_eq!(cfg.redis.port, 6379);
        assert!(!cfg.redis.has_password());
        assert!(!cfg.discord.has_token());
    }

    #[test]
    fn deserialize_from_toml() {
        let raw = r#"
            command_prefix = "!"
            command_channels = ["111", "222"]
            capacity_rule = "name_prefix"

            [[queues]]
            name = "2-cam"
            capacity = 2

            [redis]
            host = "redis.internal"
            password = "hunter2"
            db = 1

            [discord]
            token = "abc"
        "#;
        let cfg: BotConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.command_prefix, '!');
        assert_eq!(cfg.command_channels, vec!["111", "222"]);
        assert_eq!(cfg.capacity_rule, CapacityRule::NamePrefix);
        assert_eq!(cfg.queues, vec![QueueConfig::new("2-cam", 2)]);
        assert_eq!(cfg.redis.host, "redis.internal");
        // unspecified fields keep their defaults
        assert_eq!(cfg.redis.port, 6379);
        assert_eq!(cfg.redis.db, 1);
        assert!(cfg.redis.has_password());
        assert_eq!(cfg.discord.token.expose_secret(), "abc");
    }

    #[test]
    fn missing_queues_fall_back_to_defaults() {
        let cfg: BotConfig = serde_json::from_str(r#"{"command_channels": ["1"]}"#).unwrap();
        assert_eq!(cfg.queues, default_queues());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut cfg = BotConfig::default();
        cfg.discord.token = Secret::new("super-secret-token".into());
        cfg.redis.password = Some(Secret::new("super-secret-password".into()));
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("super-secret-token"));
        assert!(!dbg.contains("super-secret-password"));
    }
}
