//! The five write operations of the detail page. Each validates its input,
//! performs exactly one write, and returns a freshly reloaded aggregate so
//! the caller always renders a consistent post-mutation view. No retries; a
//! failed write surfaces its error with form state left to the caller.

use chrono::Utc;
use leadline_core::models::{
    ContractStatus, CreateAiAssistInput, CreateContractInput, CreateConversationInput,
    CreateFollowupInput,
};
use leadline_core::Database;
use uuid::Uuid;

use super::{load_lead_detail, non_blank, Error, Identity, LeadDetail, Result};

/// Log a conversation against a lead, tagged with the calling consultant.
/// The summary is required; the raw transcript is optional.
pub fn add_conversation(
    db: &Database,
    identity: &Identity,
    lead_id: Uuid,
    input: CreateConversationInput,
) -> Result<LeadDetail> {
    let summary = input.summary.trim().to_string();
    if summary.is_empty() {
        return Err(Error::Validation(
            "conversation summary must not be empty".into(),
        ));
    }
    db.get_lead(lead_id)?.ok_or(Error::NotFound("lead"))?;
    db.create_conversation(
        lead_id,
        identity.user_id,
        CreateConversationInput {
            summary,
            raw_text: non_blank(input.raw_text),
        },
    )?;
    load_lead_detail(db, lead_id)
}

/// Record a follow-up reminder. The next action is required; the due time is
/// optional and already an absolute instant by the time it reaches here.
pub fn add_followup(
    db: &Database,
    lead_id: Uuid,
    input: CreateFollowupInput,
) -> Result<LeadDetail> {
    let next_action = input.next_action.trim().to_string();
    if next_action.is_empty() {
        return Err(Error::Validation(
            "followup next action must not be empty".into(),
        ));
    }
    db.get_lead(lead_id)?.ok_or(Error::NotFound("lead"))?;
    db.create_followup(
        lead_id,
        CreateFollowupInput {
            next_action,
            due_at: input.due_at,
        },
    )?;
    load_lead_detail(db, lead_id)
}

/// Flip a followup's completion flag. Completing stamps the instant;
/// un-completing clears it. Self-inverse on the flag.
pub fn toggle_followup(db: &Database, lead_id: Uuid, followup_id: Uuid) -> Result<LeadDetail> {
    let followup = db
        .get_followup(followup_id)?
        .filter(|f| f.lead_id == lead_id)
        .ok_or(Error::NotFound("followup"))?;
    let completed = !followup.completed;
    let completed_at = completed.then(Utc::now);
    db.set_followup_completed(followup_id, completed, completed_at)?
        .ok_or(Error::NotFound("followup"))?;
    load_lead_detail(db, lead_id)
}

/// Archive an AI advice record. Always inserts; the "latest" entry shown on
/// the detail page is a projection, not a mutable singleton.
pub fn save_ai_assist(
    db: &Database,
    lead_id: Uuid,
    input: CreateAiAssistInput,
) -> Result<LeadDetail> {
    db.get_lead(lead_id)?.ok_or(Error::NotFound("lead"))?;
    db.create_ai_assist(
        lead_id,
        CreateAiAssistInput {
            extracted_needs: input.extracted_needs.trim().to_string(),
            suggested_plan: input.suggested_plan.trim().to_string(),
            communication_tips: input.communication_tips.trim().to_string(),
            acknowledged: input.acknowledged,
        },
    )?;
    load_lead_detail(db, lead_id)
}

/// Create a new contract draft. Drafts can pile up; only the newest is
/// surfaced by the aggregate.
pub fn create_contract_draft(
    db: &Database,
    lead_id: Uuid,
    input: CreateContractInput,
) -> Result<LeadDetail> {
    db.get_lead(lead_id)?.ok_or(Error::NotFound("lead"))?;
    db.create_contract(
        lead_id,
        CreateContractInput {
            proposal_summary: input.proposal_summary.trim().to_string(),
        },
    )?;
    load_lead_detail(db, lead_id)
}

/// Submit the lead's current contract for approval. Requires a contract to
/// exist; submitting an already-pending contract is an idempotent no-op.
pub fn submit_contract_for_approval(db: &Database, lead_id: Uuid) -> Result<LeadDetail> {
    db.get_lead(lead_id)?.ok_or(Error::NotFound("lead"))?;
    let contract = db
        .latest_contract(lead_id)?
        .ok_or_else(|| Error::Precondition("请先创建合同草稿".into()))?;
    if contract.status != ContractStatus::Pending {
        db.set_contract_status(contract.id, ContractStatus::Pending)?
            .ok_or(Error::NotFound("contract"))?;
    }
    load_lead_detail(db, lead_id)
}
