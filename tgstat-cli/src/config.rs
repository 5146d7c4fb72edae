//! App config: acquisition defaults, pacing, output locations. Loaded from env.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use acquisition::AcquisitionConfig;
use anyhow::{Context, Result};

#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// MIN_REACTIONS
    pub min_reactions: u64,
    /// MEDIA_ONLY
    pub media_only: bool,
    /// MAX_MESSAGES: upper bound on scanned messages per run
    pub max_messages: usize,
    /// BATCH_SIZE: processed messages between pacing pauses
    pub batch_size: usize,
    /// BATCH_DELAY_MS
    pub batch_delay: Duration,
    /// PAGE_SIZE: messages requested per page
    pub page_size: usize,
    /// OUT_OF_RANGE_THRESHOLD
    pub out_of_range_threshold: usize,
    /// TOP_N_DISPLAY
    pub top_n_display: usize,
    /// OUTPUT_DIR
    pub output_dir: PathBuf,
    /// LOG_FILE
    pub log_file: String,
}

impl AppConfig {
    /// Load from environment variables; unset variables take their defaults.
    pub fn load() -> Result<Self> {
        Ok(Self {
            min_reactions: env_or("MIN_REACTIONS", 5)?,
            media_only: env_flag("MEDIA_ONLY", true)?,
            max_messages: env_or("MAX_MESSAGES", 1000)?,
            batch_size: env_or("BATCH_SIZE", acquisition::config::DEFAULT_BATCH_SIZE)?,
            batch_delay: Duration::from_millis(env_or(
                "BATCH_DELAY_MS",
                acquisition::config::DEFAULT_BATCH_DELAY.as_millis() as u64,
            )?),
            page_size: env_or("PAGE_SIZE", acquisition::config::DEFAULT_PAGE_SIZE)?,
            out_of_range_threshold: env_or(
                "OUT_OF_RANGE_THRESHOLD",
                acquisition::config::DEFAULT_OUT_OF_RANGE_THRESHOLD,
            )?,
            top_n_display: env_or("TOP_N_DISPLAY", 20)?,
            output_dir: PathBuf::from(
                env::var("OUTPUT_DIR").unwrap_or_else(|_| "output".to_string()),
            ),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "logs/tgstat.log".to_string()),
        })
    }

    /// Pipeline pacing derived from this config.
    pub fn acquisition_config(&self) -> AcquisitionConfig {
        AcquisitionConfig {
            page_size: self.page_size,
            batch_size: self.batch_size,
            batch_delay: self.batch_delay,
            out_of_range_threshold: self.out_of_range_threshold,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.acquisition_config().validate()?;
        if self.max_messages == 0 {
            anyhow::bail!("MAX_MESSAGES must be greater than 0");
        }
        if self.top_n_display == 0 {
            anyhow::bail!("TOP_N_DISPLAY must be greater than 0");
        }
        Ok(())
    }
}

fn env_or<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} is set but not valid: {:?}", name, value)),
        Err(_) => Ok(default),
    }
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => anyhow::bail!("{} is set but not a boolean: {:?}", name, value),
        },
        Err(_) => Ok(default),
    }
}
