//! Configuration loading, env substitution, env overrides, and validation.
//!
//! Config files: `study-together.{toml,yaml,yml,json,json5,hjson}`, searched
//! in `./` then `~/.config/study-together/`. With a deployment mode the file
//! is `<mode>_config.<ext>` in the working directory instead.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in the raw
//! file before parsing.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        ConfigSource, apply_env_overrides, config_dir, discover, discover_and_load, env_file_path,
        load_config,
    },
    schema::{BotConfig, CapacityRule, DiscordConfig, QueueConfig, RedisConfig},
    validate::{Diagnostic, Severity, ValidationResult, capacity_from_name, validate},
};
