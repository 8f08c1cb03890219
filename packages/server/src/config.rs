use anyhow::{Context, Result};
use chrono::FixedOffset;
use dotenvy::dotenv;
use std::env;

use crate::domains::intake::store::DEFAULT_COOLDOWN_HOURS;
use crate::kernel::IntakeSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub admin_chat_id: i64,
    /// Externally reachable base URL; the webhook is registered when set
    pub public_url: Option<String>,
    pub webhook_path: String,
    pub webhook_secret: Option<String>,
    pub port: u16,
    pub cooldown_hours: u32,
    pub default_language: String,
    pub report_utc_offset_hours: i32,
    pub report_tz_label: String,
    pub telegram_api_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup (the process environment in
    /// production, a map in tests). Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let webhook_path = get("WEBHOOK_PATH").unwrap_or_else(|| "/tg/webhook".to_string());
        if !webhook_path.starts_with('/') {
            anyhow::bail!("WEBHOOK_PATH must start with '/'");
        }

        let report_utc_offset_hours: i32 = get("REPORT_UTC_OFFSET_HOURS")
            .unwrap_or_else(|| "3".to_string())
            .parse()
            .context("REPORT_UTC_OFFSET_HOURS must be a whole number of hours")?;
        if !(-23..=23).contains(&report_utc_offset_hours) {
            anyhow::bail!("REPORT_UTC_OFFSET_HOURS must be between -23 and 23");
        }

        Ok(Self {
            bot_token: get("BOT_TOKEN").context("BOT_TOKEN must be set")?,
            admin_chat_id: get("ADMIN_CHAT_ID")
                .context("ADMIN_CHAT_ID must be set")?
                .parse()
                .context("ADMIN_CHAT_ID must be a valid chat id")?,
            public_url: get("PUBLIC_URL").map(|url| url.trim_end_matches('/').to_string()),
            webhook_path,
            webhook_secret: get("WEBHOOK_SECRET"),
            port: get("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            cooldown_hours: get("COOLDOWN_HOURS")
                .map(|v| v.parse::<u32>())
                .transpose()
                .context("COOLDOWN_HOURS must be a valid number")?
                .unwrap_or(DEFAULT_COOLDOWN_HOURS),
            default_language: get("DEFAULT_LANGUAGE").unwrap_or_else(|| "ru".to_string()),
            report_utc_offset_hours,
            report_tz_label: get("REPORT_TZ_LABEL").unwrap_or_else(|| "MSK".to_string()),
            telegram_api_url: get("TELEGRAM_API_URL")
                .unwrap_or_else(|| telegram::DEFAULT_API_URL.to_string()),
        })
    }

    /// Full webhook URL to register, when a public URL is configured
    pub fn webhook_url(&self) -> Option<String> {
        self.public_url
            .as_ref()
            .map(|base| format!("{}{}", base, self.webhook_path))
    }

    pub fn intake_settings(&self) -> Result<IntakeSettings> {
        let report_offset = FixedOffset::east_opt(self.report_utc_offset_hours * 3600)
            .context("REPORT_UTC_OFFSET_HOURS is out of range")?;

        Ok(IntakeSettings {
            admin_chat_id: self.admin_chat_id,
            cooldown_hours: self.cooldown_hours,
            report_offset,
            report_tz_label: self.report_tz_label.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config(&[("BOT_TOKEN", "123:abc"), ("ADMIN_CHAT_ID", "-100200")]).unwrap();

        assert_eq!(config.admin_chat_id, -100200);
        assert_eq!(config.webhook_path, "/tg/webhook");
        assert_eq!(config.port, 8080);
        assert_eq!(config.cooldown_hours, 12);
        assert_eq!(config.default_language, "ru");
        assert_eq!(config.report_tz_label, "MSK");
        assert_eq!(config.telegram_api_url, "https://api.telegram.org");
        assert_eq!(config.webhook_secret, None);
        assert_eq!(config.webhook_url(), None);

        let settings = config.intake_settings().unwrap();
        assert_eq!(settings.report_offset.local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn missing_required_values_fail() {
        let err = config(&[("ADMIN_CHAT_ID", "1")]).unwrap_err();
        assert!(err.to_string().contains("BOT_TOKEN"));

        let err = config(&[("BOT_TOKEN", "t"), ("ADMIN_CHAT_ID", " ")]).unwrap_err();
        assert!(err.to_string().contains("ADMIN_CHAT_ID"));
    }

    #[test]
    fn invalid_numbers_fail() {
        let base = [("BOT_TOKEN", "t"), ("ADMIN_CHAT_ID", "1")];

        let mut bad_port = base.to_vec();
        bad_port.push(("PORT", "http"));
        assert!(config(&bad_port).is_err());

        let mut bad_offset = base.to_vec();
        bad_offset.push(("REPORT_UTC_OFFSET_HOURS", "30"));
        assert!(config(&bad_offset).is_err());

        let mut bad_cooldown = base.to_vec();
        bad_cooldown.push(("COOLDOWN_HOURS", "-1"));
        assert!(config(&bad_cooldown).is_err());
    }

    #[test]
    fn webhook_url_joins_base_and_path() {
        let config = config(&[
            ("BOT_TOKEN", "t"),
            ("ADMIN_CHAT_ID", "1"),
            ("PUBLIC_URL", "https://bot.example.org/"),
            ("WEBHOOK_PATH", "/hooks/tg"),
            ("WEBHOOK_SECRET", "s3cret"),
        ])
        .unwrap();

        assert_eq!(
            config.webhook_url().as_deref(),
            Some("https://bot.example.org/hooks/tg")
        );
        assert_eq!(config.webhook_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn webhook_path_must_be_absolute() {
        assert!(config(&[
            ("BOT_TOKEN", "t"),
            ("ADMIN_CHAT_ID", "1"),
            ("WEBHOOK_PATH", "tg/webhook"),
        ])
        .is_err());
    }
}
