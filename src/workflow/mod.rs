//! The lead lifecycle: list/create, the detail aggregate, and the mutation
//! handlers that every consultant action goes through.
//!
//! Operations take a [`Database`] handle and, where a creator is recorded, a
//! resolved [`Identity`]. Session resolution happens at the transport
//! boundary; nothing in here reaches for ambient auth state, which keeps the
//! whole module testable against an in-memory store.

mod mutations;

pub use mutations::*;

use leadline_core::models::{
    AiAssist, Contract, Conversation, CreateLeadInput, Followup, Lead,
};
use leadline_core::Database;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A resolved authenticated consultant. Constructed only by the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Precondition(String),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Everything the lead detail page renders, assembled in full before being
/// returned. Partial aggregates are never surfaced: a missing lead is an
/// error, and the four dependent fetches all complete before this exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadDetail {
    pub lead: Lead,
    pub conversations: Vec<Conversation>,
    pub followups: Vec<Followup>,
    pub latest_ai_assist: Option<AiAssist>,
    pub latest_contract: Option<Contract>,
}

/// All leads, newest first. The workbench renders the full set.
pub fn list_leads(db: &Database) -> Result<Vec<Lead>> {
    Ok(db.list_leads()?)
}

/// Create a lead owned by the calling consultant. The name is required;
/// blank optional fields are stored as absent; the stage defaults to `new`.
pub fn create_lead(db: &Database, identity: &Identity, input: CreateLeadInput) -> Result<Lead> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation("lead name must not be empty".into()));
    }
    let input = CreateLeadInput {
        name,
        target_country: non_blank(input.target_country),
        grade: non_blank(input.grade),
        age: input.age,
        school_type: non_blank(input.school_type),
        stage: input.stage,
    };
    Ok(db.create_lead(identity.user_id, input)?)
}

/// Load one lead plus its four dependent collections. The dependent fetches
/// are independent and order-insensitive; conversations and followups come
/// back newest first, AI assist and contract as latest-only projections.
pub fn load_lead_detail(db: &Database, lead_id: Uuid) -> Result<LeadDetail> {
    let lead = db.get_lead(lead_id)?.ok_or(Error::NotFound("lead"))?;
    let conversations = db.list_conversations(lead_id)?;
    let followups = db.list_followups(lead_id)?;
    let latest_ai_assist = db.latest_ai_assist(lead_id)?;
    let latest_contract = db.latest_contract(lead_id)?;
    Ok(LeadDetail {
        lead,
        conversations,
        followups,
        latest_ai_assist,
        latest_contract,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests;
