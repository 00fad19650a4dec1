use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An archived AI advice record. The archive is an append-only log; the
/// detail view surfaces only the most recent entry per lead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiAssist {
    pub id: Uuid,
    pub lead_id: Uuid,
    pub extracted_needs: String,
    pub suggested_plan: String,
    pub communication_tips: String,
    pub acknowledged: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAiAssistInput {
    pub extracted_needs: String,
    pub suggested_plan: String,
    pub communication_tips: String,
    #[serde(default)]
    pub acknowledged: bool,
}
