use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{parse_ts, parse_uuid, Database};
use crate::models::{AiAssist, CreateAiAssistInput};

fn ai_assist_from_row(row: &Row<'_>) -> rusqlite::Result<AiAssist> {
    Ok(AiAssist {
        id: parse_uuid(row.get("id")?)?,
        lead_id: parse_uuid(row.get("lead_id")?)?,
        extracted_needs: row.get("extracted_needs")?,
        suggested_plan: row.get("suggested_plan")?,
        communication_tips: row.get("communication_tips")?,
        acknowledged: row.get("acknowledged")?,
        created_at: parse_ts(row.get("created_at")?)?,
    })
}

impl Database {
    /// Most recent archive entry for a lead, if any. The archive is
    /// insert-only; "latest" is a projection over it.
    pub fn latest_ai_assist(&self, lead_id: Uuid) -> Result<Option<AiAssist>> {
        let conn = self.lock();
        let assist = conn
            .query_row(
                "SELECT id, lead_id, extracted_needs, suggested_plan, communication_tips, acknowledged, created_at
                 FROM ai_assists WHERE lead_id = ?1
                 ORDER BY created_at DESC, id DESC LIMIT 1",
                params![lead_id.to_string()],
                ai_assist_from_row,
            )
            .optional()?;
        Ok(assist)
    }

    pub fn create_ai_assist(&self, lead_id: Uuid, input: CreateAiAssistInput) -> Result<AiAssist> {
        let assist = AiAssist {
            id: Uuid::new_v4(),
            lead_id,
            extracted_needs: input.extracted_needs,
            suggested_plan: input.suggested_plan,
            communication_tips: input.communication_tips,
            acknowledged: input.acknowledged,
            created_at: Utc::now(),
        };
        let conn = self.lock();
        conn.execute(
            "INSERT INTO ai_assists (id, lead_id, extracted_needs, suggested_plan, communication_tips, acknowledged, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                assist.id.to_string(),
                assist.lead_id.to_string(),
                assist.extracted_needs,
                assist.suggested_plan,
                assist.communication_tips,
                assist.acknowledged,
                assist.created_at.to_rfc3339(),
            ],
        )?;
        Ok(assist)
    }
}
