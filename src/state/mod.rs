pub mod broadcaster;
pub mod model;

pub use broadcaster::{StateBroadcaster, StateSubscription};
pub use model::{StateEnvelope, SyncState, Transaction, UserProfile};
