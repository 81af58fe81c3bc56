use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

use classcal_core::TermWindow;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Schedule CSV to import, relative to the working directory
    #[serde(default = "default_csv_filename")]
    pub csv_filename: String,

    /// First day of the academic term (YYYY-MM-DD)
    pub term_start_date: NaiveDate,

    /// Last day of the term, inclusive (YYYY-MM-DD)
    pub term_end_date: NaiveDate,

    /// IANA zone events are created in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Target Google calendar
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// OAuth credentials for Google Calendar
    pub google: GoogleConfig,
}

/// OAuth client credentials from the Google Cloud Console
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: String,
}

fn default_csv_filename() -> String {
    "schedule.csv".to_string()
}

fn default_timezone() -> String {
    "America/Toronto".to_string()
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

impl Config {
    /// Validate the term bounds and zone name once, up front. Everything
    /// downstream shares the resulting window read-only.
    pub fn term_window(&self) -> Result<TermWindow> {
        let term = TermWindow::new(self.term_start_date, self.term_end_date, &self.timezone)
            .context("Invalid term configuration")?;
        Ok(term)
    }
}

/// Get the config directory path (~/.config/classcal)
pub fn config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Could not determine config directory")?
        .join("classcal");
    Ok(config_dir)
}

/// Get the config file path (~/.config/classcal/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the OAuth session file path (~/.config/classcal/session.toml)
pub fn session_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("session.toml"))
}

/// Load config from ~/.config/classcal/config.toml
pub fn load_config() -> Result<Config> {
    let path = config_path()?;

    if !path.exists() {
        anyhow::bail!(
            "Config file not found at {}\n\n\
            Create it with your term dates and Google OAuth credentials:\n\n\
            csv_filename = \"schedule.csv\"\n\
            term_start_date = \"2024-01-08\"\n\
            term_end_date = \"2024-04-05\"\n\
            timezone = \"America/Toronto\"\n\
            calendar_id = \"primary\"\n\n\
            [google]\n\
            client_id = \"your-client-id.apps.googleusercontent.com\"\n\
            client_secret = \"your-client-secret\"\n\n\
            See https://console.cloud.google.com/apis/credentials for OAuth setup.",
            path.display()
        );
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))?;

    let config: Config = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_keys() {
        let config: Config = toml::from_str(
            r#"
            term_start_date = "2024-01-08"
            term_end_date = "2024-04-05"

            [google]
            client_id = "id"
            client_secret = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.csv_filename, "schedule.csv");
        assert_eq!(config.timezone, "America/Toronto");
        assert_eq!(config.calendar_id, "primary");
        assert!(config.term_window().is_ok());
    }

    #[test]
    fn missing_end_date_fails_to_parse() {
        let result: Result<Config, _> = toml::from_str::<Config>(
            r#"
            term_start_date = "2024-01-08"

            [google]
            client_id = "id"
            client_secret = "secret"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn bad_zone_fails_term_window() {
        let config: Config = toml::from_str(
            r#"
            term_start_date = "2024-01-08"
            term_end_date = "2024-04-05"
            timezone = "Not/AZone"

            [google]
            client_id = "id"
            client_secret = "secret"
            "#,
        )
        .unwrap();

        assert!(config.term_window().is_err());
    }
}
