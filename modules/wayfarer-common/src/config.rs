use std::path::PathBuf;

use anyhow::{anyhow, Result};

use crate::types::ConflictPolicy;

/// Application configuration loaded from environment variables.
/// Immutable after load; injected into components at construction so the
/// pipeline never reads the environment itself.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub places_api_key: String,
    pub language: String,
    pub conflict_policy: ConflictPolicy,
    pub artifact_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")?,
            places_api_key: std::env::var("GOOGLE_PLACES_API_KEY")?,
            language: std::env::var("PLACES_LANGUAGE").unwrap_or_else(|_| "ko".to_string()),
            conflict_policy: match std::env::var("CONFLICT_POLICY") {
                Ok(val) => val.parse().map_err(|e: String| anyhow!(e))?,
                Err(_) => ConflictPolicy::default(),
            },
            artifact_dir: std::env::var("ARTIFACT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
        };

        config.log_keys();
        Ok(config)
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  GOOGLE_PLACES_API_KEY: {}", preview(&self.places_api_key));
        tracing::info!("  PLACES_LANGUAGE: {}", self.language);
        tracing::info!("  CONFLICT_POLICY: {:?}", self.conflict_policy);
        tracing::info!("  ARTIFACT_DIR: {}", self.artifact_dir.display());
    }
}

/// Redacted secret preview: first characters plus length, never the value.
fn preview(val: &str) -> String {
    let prefix: String = val.chars().take(5).collect();
    format!("{prefix}...({} chars)", val.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_redacts_beyond_the_prefix() {
        assert_eq!(preview("AIzaSyExample"), "AIzaS...(13 chars)");
    }

    #[test]
    fn preview_respects_char_boundaries() {
        // Multi-byte value: slicing by bytes would split a character.
        assert_eq!(preview("한국어키값더길게"), "한국어키값...(8 chars)");
    }

    #[test]
    fn preview_of_short_value_keeps_it_whole() {
        assert_eq!(preview("abc"), "abc...(3 chars)");
    }
}
