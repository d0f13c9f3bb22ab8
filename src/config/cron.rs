//! Cron endpoint configuration

use secrecy::SecretString;
use serde::Deserialize;

use super::error::ValidationError;

/// Settings for `POST /api/cron/process-retries`
#[derive(Debug, Clone, Deserialize)]
pub struct CronConfig {
    /// Bearer token the scheduler must present
    pub secret: String,

    /// Failed attempts after which a payment is abandoned
    #[serde(default = "default_max_payment_attempts")]
    pub max_payment_attempts: i32,

    /// Processed webhook events older than this are purged
    #[serde(default = "default_webhook_retention_days")]
    pub webhook_retention_days: i64,

    /// Failed payments examined per run
    #[serde(default = "default_retry_batch_size")]
    pub retry_batch_size: i64,
}

impl CronConfig {
    pub fn secret(&self) -> SecretString {
        SecretString::new(self.secret.clone())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.secret.is_empty() {
            return Err(ValidationError::MissingRequired("CRON__SECRET"));
        }
        if self.secret.len() < 16 {
            return Err(ValidationError::CronSecretTooShort);
        }
        check_range("max_payment_attempts", self.max_payment_attempts as i64, 1, 10)?;
        check_range("webhook_retention_days", self.webhook_retention_days, 1, 365)?;
        check_range("retry_batch_size", self.retry_batch_size, 1, 1000)?;
        Ok(())
    }
}

fn check_range(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange { field, min, max })
    }
}

impl Default for CronConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            max_payment_attempts: default_max_payment_attempts(),
            webhook_retention_days: default_webhook_retention_days(),
            retry_batch_size: default_retry_batch_size(),
        }
    }
}

fn default_max_payment_attempts() -> i32 {
    4
}

fn default_webhook_retention_days() -> i64 {
    30
}

fn default_retry_batch_size() -> i64 {
    100
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> CronConfig {
        CronConfig {
            secret: "cron-secret-0123456789".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_cron_config_defaults() {
        let config = CronConfig::default();
        assert_eq!(config.max_payment_attempts, 4);
        assert_eq!(config.webhook_retention_days, 30);
        assert_eq!(config.retry_batch_size, 100);
    }

    #[test]
    fn test_validation_missing_secret() {
        assert!(matches!(
            CronConfig::default().validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn test_validation_short_secret() {
        let config = CronConfig {
            secret: "short".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::CronSecretTooShort)
        ));
    }

    #[test]
    fn test_validation_attempts_out_of_range() {
        let config = CronConfig {
            max_payment_attempts: 0,
            ..valid()
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::OutOfRange {
                field: "max_payment_attempts",
                ..
            })
        ));
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid().validate().is_ok());
    }
}
