use crate::server::{
    error::config::ConfigError,
    referral::{commission::TierFallback, ReferralSettings, DEFAULT_MAX_REFERRAL_DEPTH},
};

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
/// Daily at 03:00
pub const DEFAULT_AUDIT_CRON: &str = "0 0 3 * * *";

pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub audit_cron: String,
    pub referral: ReferralSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_depth = match optional("MAX_REFERRAL_DEPTH") {
            Some(value) => parse_max_depth(&value)?,
            None => DEFAULT_MAX_REFERRAL_DEPTH,
        };

        let tier_fallback = match optional("COMMISSION_TIER_FALLBACK") {
            Some(value) => {
                value
                    .parse::<TierFallback>()
                    .map_err(|reason| ConfigError::InvalidEnvValue {
                        var: "COMMISSION_TIER_FALLBACK".to_string(),
                        reason,
                    })?
            }
            None => TierFallback::default(),
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_address: optional("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            audit_cron: optional("AUDIT_CRON").unwrap_or_else(|| DEFAULT_AUDIT_CRON.to_string()),
            referral: ReferralSettings {
                max_depth,
                tier_fallback,
            },
        })
    }
}

fn required(var: &str) -> Result<String, ConfigError> {
    optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
}

// Unset and empty are both treated as absent
fn optional(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_max_depth(value: &str) -> Result<usize, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvValue {
        var: "MAX_REFERRAL_DEPTH".to_string(),
        reason,
    };

    let depth = value
        .trim()
        .parse::<usize>()
        .map_err(|e| invalid(e.to_string()))?;
    if depth == 0 {
        return Err(invalid("must be at least 1".to_string()));
    }

    Ok(depth)
}
