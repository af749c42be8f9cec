//! Configuration types.
//!
//! Everything is read from environment variables; the binary layers CLI
//! flags on top.

use crate::delivery::capability::Platform;
use crate::error::ConfigError;

/// Default SMTP submission port.
const DEFAULT_SMTP_PORT: u16 = 587;

/// Mailer configuration.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    /// Platform profile driving the fallback order.
    pub platform: Platform,
    /// SMTP settings for the direct channel. `None` disables it.
    pub smtp: Option<SmtpConfig>,
    /// Whether the terminal chooser asks before opening attachments.
    pub chooser_interactive: bool,
}

impl MailerConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let platform = match lookup("MAILER_PLATFORM") {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => Platform::default(),
        };

        let chooser_interactive = match lookup("MAILER_CHOOSER_INTERACTIVE") {
            Some(value) => parse_bool("MAILER_CHOOSER_INTERACTIVE", &value)?,
            None => true,
        };

        Ok(Self {
            platform,
            smtp: SmtpConfig::from_lookup(&lookup)?,
            chooser_interactive,
        })
    }
}

impl Default for MailerConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            smtp: None,
            chooser_interactive: true,
        }
    }
}

/// SMTP settings for the direct email channel.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

impl SmtpConfig {
    /// Returns `Ok(None)` if `MAILER_SMTP_HOST` is not set (channel disabled).
    fn from_lookup<F>(lookup: &F) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(host) = lookup("MAILER_SMTP_HOST").filter(|h| !h.trim().is_empty()) else {
            return Ok(None);
        };

        let port = match lookup("MAILER_SMTP_PORT") {
            Some(raw) => raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                key: "MAILER_SMTP_PORT".into(),
                message: format!("{e}"),
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        let username = lookup("MAILER_SMTP_USERNAME").unwrap_or_default();
        let password = lookup("MAILER_SMTP_PASSWORD").unwrap_or_default();
        let from_address = lookup("MAILER_FROM_ADDRESS").unwrap_or_else(|| username.clone());
        if from_address.is_empty() {
            return Err(ConfigError::MissingEnvVar("MAILER_FROM_ADDRESS".into()));
        }

        Ok(Some(Self {
            host,
            port,
            username,
            password,
            from_address,
        }))
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = MailerConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.platform, Platform::Desktop);
        assert!(config.smtp.is_none());
        assert!(config.chooser_interactive);
    }

    #[test]
    fn platform_is_parsed() {
        let config = MailerConfig::from_lookup(lookup_from(&[("MAILER_PLATFORM", "iOS")])).unwrap();
        assert_eq!(config.platform, Platform::Ios);
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let err = MailerConfig::from_lookup(lookup_from(&[("MAILER_PLATFORM", "symbian")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn smtp_defaults_port_and_from_address() {
        let config = MailerConfig::from_lookup(lookup_from(&[
            ("MAILER_SMTP_HOST", "smtp.example.com"),
            ("MAILER_SMTP_USERNAME", "me@example.com"),
        ]))
        .unwrap();
        let smtp = config.smtp.unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, 587);
        assert_eq!(smtp.from_address, "me@example.com");
    }

    #[test]
    fn smtp_without_sender_is_rejected() {
        let err = MailerConfig::from_lookup(lookup_from(&[("MAILER_SMTP_HOST", "smtp.example.com")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(_)));
    }

    #[test]
    fn smtp_bad_port_is_rejected() {
        let err = MailerConfig::from_lookup(lookup_from(&[
            ("MAILER_SMTP_HOST", "smtp.example.com"),
            ("MAILER_SMTP_PORT", "not-a-port"),
            ("MAILER_FROM_ADDRESS", "me@example.com"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn chooser_flag_parses_booleans() {
        let config =
            MailerConfig::from_lookup(lookup_from(&[("MAILER_CHOOSER_INTERACTIVE", "no")])).unwrap();
        assert!(!config.chooser_interactive);

        let err = MailerConfig::from_lookup(lookup_from(&[("MAILER_CHOOSER_INTERACTIVE", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
