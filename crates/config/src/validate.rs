//! Semantic validation of a loaded [`BotConfig`].
//!
//! Parsing already guarantees the shape; these checks catch configurations
//! that load fine but would make the bot refuse every command, form groups
//! of the wrong size, or fail to connect.

use std::collections::HashSet;

use crate::schema::{BotConfig, CapacityRule};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Category: "routing", "queues", "capacity", "redis", "discord"
    pub category: &'static str,
    /// Dotted path, e.g. "queues[2].capacity"
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity, self.category, self.path, self.message
        )
    }
}

/// Result of validating a configuration.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Returns `true` if any diagnostic is an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Count diagnostics by severity.
    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    fn push(
        &mut self,
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(Diagnostic {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Capacity the legacy name rule assigns: `2` for names starting with `2`,
/// `3` otherwise.
#[must_use]
pub fn capacity_from_name(name: &str) -> usize {
    if name.starts_with('2') {
        2
    } else {
        3
    }
}

/// Validate a loaded config.
#[must_use]
pub fn validate(config: &BotConfig) -> ValidationResult {
    let mut result = ValidationResult::default();
    check_routing(config, &mut result);
    check_queues(config, &mut result);
    check_connections(config, &mut result);
    result
        .diagnostics
        .sort_by(|a, b| a.severity.cmp(&b.severity));
    result
}

fn check_routing(config: &BotConfig, result: &mut ValidationResult) {
    if config.command_prefix.is_whitespace() {
        result.push(
            Severity::Error,
            "routing",
            "command_prefix",
            "prefix must be a visible character",
        );
    }

    if config.command_channels.is_empty() {
        result.push(
            Severity::Warning,
            "routing",
            "command_channels",
            "no command channels configured; every command will be refused",
        );
    }

    for (i, channel) in config.command_channels.iter().enumerate() {
        if channel.is_empty() || !channel.bytes().all(|b| b.is_ascii_digit()) {
            result.push(
                Severity::Warning,
                "routing",
                format!("command_channels[{i}]"),
                format!("\"{channel}\" is not a numeric channel ID"),
            );
        }
    }
}

fn check_queues(config: &BotConfig, result: &mut ValidationResult) {
    if config.queues.is_empty() {
        result.push(
            Severity::Error,
            "queues",
            "queues",
            "at least one queue is required",
        );
        return;
    }

    let mut seen = HashSet::new();
    for (i, queue) in config.queues.iter().enumerate() {
        let path = format!("queues[{i}]");

        if queue.name.is_empty() {
            result.push(
                Severity::Error,
                "queues",
                format!("{path}.name"),
                "queue name is empty",
            );
            continue;
        }
        if queue.name.trim() != queue.name {
            result.push(
                Severity::Warning,
                "queues",
                format!("{path}.name"),
                format!("\"{}\" has surrounding whitespace and cannot be matched", queue.name),
            );
        }
        if !seen.insert(queue.name.as_str()) {
            result.push(
                Severity::Warning,
                "queues",
                format!("{path}.name"),
                format!("duplicate queue \"{}\"; the first entry wins", queue.name),
            );
        }
        if queue.capacity < 2 {
            result.push(
                Severity::Error,
                "capacity",
                format!("{path}.capacity"),
                format!("capacity {} is below the minimum group size of 2", queue.capacity),
            );
            continue;
        }

        let derived = capacity_from_name(&queue.name);
        if derived != queue.capacity {
            let message = match config.capacity_rule {
                CapacityRule::Configured => format!(
                    "\"{}\" forms groups of {}, but the legacy name rule would use {derived}",
                    queue.name, queue.capacity
                ),
                CapacityRule::NamePrefix => format!(
                    "configured capacity {} is ignored; the name rule gives \"{}\" a capacity of \
                     {derived}",
                    queue.capacity, queue.name
                ),
            };
            result.push(Severity::Warning, "capacity", format!("{path}.capacity"), message);
        }
    }
}

fn check_connections(config: &BotConfig, result: &mut ValidationResult) {
    if config.redis.host.trim().is_empty() {
        result.push(Severity::Error, "redis", "redis.host", "host is empty");
    }
    if config.redis.port == 0 {
        result.push(
            Severity::Info,
            "redis",
            "redis.port",
            "port 0 will not reach a Redis server",
        );
    }
    if config.redis.db < 0 {
        result.push(
            Severity::Error,
            "redis",
            "redis.db",
            format!("database index {} is negative", config.redis.db),
        );
    }
    if !config.discord.has_token() {
        result.push(
            Severity::Warning,
            "discord",
            "discord.token",
            "no bot token configured (set DISCORD_TOKEN or pass --token)",
        );
    }
}
