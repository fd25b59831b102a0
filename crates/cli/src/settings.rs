use std::path::{Path, PathBuf};

use {
    anyhow::{Context, Result},
    secrecy::Secret,
    study_together_config::{BotConfig, ConfigSource, discover_and_load, env_file_path},
    tracing::debug,
};

/// Where to find configuration and credentials, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub mode: Option<String>,
    pub config: Option<PathBuf>,
    pub token: Option<String>,
}

impl Settings {
    /// Load credentials from the working directory's env file.
    ///
    /// With a mode only `<mode>.env` is read and it must exist; without one
    /// an optional `.env` is read. Variables already set in the process
    /// environment are never replaced.
    pub fn load_env_file(&self) -> Result<()> {
        self.load_env_file_in(Path::new("."))
    }

    fn load_env_file_in(&self, dir: &Path) -> Result<()> {
        let path = dir.join(env_file_path(self.mode.as_deref()));
        match dotenvy::from_path(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "loaded env file");
                Ok(())
            },
            Err(e) if self.mode.is_none() && e.not_found() => Ok(()),
            Err(e) => Err(e).with_context(|| format!("failed to load env file {}", path.display())),
        }
    }

    /// Discover and load config, then apply env and command-line overrides.
    pub fn load_config(&self) -> Result<(BotConfig, ConfigSource)> {
        let (config, source) = discover_and_load(self.config.as_deref(), self.mode.as_deref())
            .context("failed to load configuration")?;
        Ok((self.apply_token(config), source))
    }

    fn apply_token(&self, mut config: BotConfig) -> BotConfig {
        if let Some(token) = self.token.as_ref().filter(|t| !t.trim().is_empty()) {
            config.discord.token = Secret::new(token.clone());
        }
        config
    }
}
