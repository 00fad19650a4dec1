use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub stage: LeadStage,
    pub target_country: Option<String>,
    pub grade: Option<String>,
    pub age: Option<i32>,
    pub school_type: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadStage {
    New,
    Consulting,
    Proposal,
    Signed,
    Lost,
}

impl LeadStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Consulting => "consulting",
            Self::Proposal => "proposal",
            Self::Signed => "signed",
            Self::Lost => "lost",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "consulting" => Some(Self::Consulting),
            "proposal" => Some(Self::Proposal),
            "signed" => Some(Self::Signed),
            "lost" => Some(Self::Lost),
            _ => None,
        }
    }

    /// Display label shown to consultants. Total over all five stages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "新线索",
            Self::Consulting => "咨询中",
            Self::Proposal => "方案中",
            Self::Signed => "已签约",
            Self::Lost => "已流失",
        }
    }
}

impl Default for LeadStage {
    fn default() -> Self {
        Self::New
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLeadInput {
    pub name: String,
    pub target_country: Option<String>,
    pub grade: Option<String>,
    pub age: Option<i32>,
    pub school_type: Option<String>,
    pub stage: Option<LeadStage>,
}
