use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A follow-up reminder. `completed_at` is set exactly when `completed`
/// flips to true and cleared when it flips back to false.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followup {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub next_action: String,
    pub due_at: Option<DateTime<Utc>>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFollowupInput {
    pub next_action: String,
    pub due_at: Option<DateTime<Utc>>,
}
