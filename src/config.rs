use std::env;
use log::warn;

// Simulated latency configuration
pub const DEFAULT_PROFILE_DELAY_MS: u64 = 500;
pub const DEFAULT_HISTORY_DELAY_MS: u64 = 2000;
pub const DEFAULT_HISTORY_FAILURE_DELAY_MS: u64 = 100;

// Fault injection configuration
pub const DEFAULT_FAILURE_PROBABILITY: f64 = 0.5;

// Demo driver configuration
pub const DEFAULT_OBSERVE_WINDOW_MS: u64 = 3000;

pub struct Config {
    pub profile_delay_ms: u64,
    pub history_delay_ms: u64,
    pub history_failure_delay_ms: u64,
    pub failure_probability: f64,
    pub observe_window_ms: u64,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            profile_delay_ms: env_u64("PROFILE_DELAY_MS", DEFAULT_PROFILE_DELAY_MS),
            history_delay_ms: env_u64("HISTORY_DELAY_MS", DEFAULT_HISTORY_DELAY_MS),
            history_failure_delay_ms: env_u64(
                "HISTORY_FAILURE_DELAY_MS",
                DEFAULT_HISTORY_FAILURE_DELAY_MS,
            ),
            failure_probability: env_f64("FAILURE_PROBABILITY", DEFAULT_FAILURE_PROBABILITY),
            observe_window_ms: env_u64("OBSERVE_WINDOW_MS", DEFAULT_OBSERVE_WINDOW_MS),
            log_level: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.failure_probability) {
            return Err(format!(
                "Failure probability must be within [0, 1], got {}",
                self.failure_probability
            ));
        }

        if self.profile_delay_ms == 0 || self.history_delay_ms == 0 {
            return Err("Fetch delays must be greater than 0".to_string());
        }

        Ok(())
    }

    pub fn log_config(&self) {
        println!("Data Sync Configuration:");
        println!("  Profile Fetch Delay: {}ms", self.profile_delay_ms);
        println!("  History Fetch Delay: {}ms", self.history_delay_ms);
        println!("  History Failure Delay: {}ms", self.history_failure_delay_ms);
        println!("  Failure Probability: {}", self.failure_probability);
        println!("  Observe Window: {}ms", self.observe_window_ms);
        println!("  Log Level: {}", self.log_level);
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} value '{}', falling back to {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} value '{}', falling back to {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::from_env();
        assert!(config.profile_delay_ms > 0);
        assert!(config.history_delay_ms > 0);
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::from_env();

        config.failure_probability = 1.5;
        assert!(config.validate().is_err());

        config.failure_probability = 0.5;
        config.profile_delay_ms = 0;
        assert!(config.validate().is_err());

        config.profile_delay_ms = 500;
        assert!(config.validate().is_ok());
    }
}
