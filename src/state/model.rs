use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u32,
    pub amount: f64,
}

// Closed set of states a sync pass can be in. A published value is never
// mutated, only superseded by the next publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncState {
    Loading,
    Success {
        profile: UserProfile,
        transactions: Vec<Transaction>,
    },
    Error {
        message: String,
    },
}

impl SyncState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SyncState::Loading)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncState::Loading => "loading",
            SyncState::Success { .. } => "success",
            SyncState::Error { .. } => "error",
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// Timestamped wire/console form of a state value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateEnvelope {
    pub state: SyncState,
    pub timestamp: String,
}

impl StateEnvelope {
    pub fn new(state: SyncState) -> Self {
        Self {
            state,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_is_not_terminal() {
        assert!(!SyncState::Loading.is_terminal());
        assert!(SyncState::Error { message: "boom".to_string() }.is_terminal());
        assert!(SyncState::Success {
            profile: UserProfile { user_id: "A001".to_string(), name: "Alex Smith".to_string() },
            transactions: vec![],
        }
        .is_terminal());
    }

    #[test]
    fn test_state_serializes_with_status_tag() {
        let json = SyncState::Loading.to_json().unwrap();
        assert_eq!(json, r#"{"status":"loading"}"#);

        let json = SyncState::Error { message: "Sync failed".to_string() }.to_json().unwrap();
        assert!(json.contains(r#""status":"error""#));
        assert!(json.contains("Sync failed"));
    }

    #[test]
    fn test_envelope_carries_timestamp() {
        let envelope = StateEnvelope::new(SyncState::Loading);
        assert!(!envelope.timestamp.is_empty());
        let json = envelope.to_json().unwrap();
        assert!(json.contains("timestamp"));
    }
}
