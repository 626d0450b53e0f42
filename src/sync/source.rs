use std::time::Duration;
use log::{info, warn};
use rand::Rng;
use tokio::time::sleep;

use crate::config::Config;
use crate::state::{Transaction, UserProfile};
use crate::sync::error::FetchError;

pub const HISTORY_FAILURE_REASON: &str = "Transaction API Failed";
const HISTORY_BATCH_SIZE: u32 = 5;

// Decides whether a history fetch fails. Injectable so tests get
// deterministic outcomes instead of a coin flip.
#[derive(Debug, Clone)]
pub enum FaultMode {
    Never,
    Always,
    Random(f64),
}

impl FaultMode {
    fn should_fail(&self) -> bool {
        match self {
            FaultMode::Never => false,
            FaultMode::Always => true,
            FaultMode::Random(probability) => rand::thread_rng().gen_bool(*probability),
        }
    }
}

// Two independent latency-bearing fetch operations. Neither touches shared
// mutable state, so they are safe to run concurrently without coordination.
pub struct DataSource {
    profile_delay: Duration,
    history_delay: Duration,
    history_failure_delay: Duration,
    fault: FaultMode,
}

impl DataSource {
    pub fn new(
        profile_delay: Duration,
        history_delay: Duration,
        history_failure_delay: Duration,
        fault: FaultMode,
    ) -> Self {
        Self {
            profile_delay,
            history_delay,
            history_failure_delay,
            fault,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Duration::from_millis(config.profile_delay_ms),
            Duration::from_millis(config.history_delay_ms),
            Duration::from_millis(config.history_failure_delay_ms),
            FaultMode::Random(config.failure_probability),
        )
    }

    // Fast upstream call; never fails
    pub async fn fetch_profile(&self) -> UserProfile {
        sleep(self.profile_delay).await;
        let profile = UserProfile {
            user_id: "A001".to_string(),
            name: "Alex Smith".to_string(),
        };
        info!("Fetched profile for user {}", profile.user_id);
        profile
    }

    // Slow upstream call; the failure path resolves faster than the success
    // path
    pub async fn fetch_history(&self) -> Result<Vec<Transaction>, FetchError> {
        if self.fault.should_fail() {
            sleep(self.history_failure_delay).await;
            warn!("History fetch failed: {}", HISTORY_FAILURE_REASON);
            return Err(FetchError::OperationFailed(HISTORY_FAILURE_REASON.to_string()));
        }

        sleep(self.history_delay).await;
        let transactions: Vec<Transaction> = (0..HISTORY_BATCH_SIZE)
            .map(|i| Transaction {
                id: i,
                amount: 100.0 * (i + 1) as f64,
            })
            .collect();
        info!("Fetched {} transactions", transactions.len());
        Ok(transactions)
    }
}
