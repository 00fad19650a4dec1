use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Row};
use uuid::Uuid;

use super::{parse_ts, parse_uuid, Database};
use crate::models::{Conversation, CreateConversationInput};

fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<Conversation> {
    Ok(Conversation {
        id: parse_uuid(row.get("id")?)?,
        lead_id: parse_uuid(row.get("lead_id")?)?,
        summary: row.get("summary")?,
        raw_text: row.get("raw_text")?,
        created_by: parse_uuid(row.get("created_by")?)?,
        created_at: parse_ts(row.get("created_at")?)?,
    })
}

impl Database {
    pub fn list_conversations(&self, lead_id: Uuid) -> Result<Vec<Conversation>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, lead_id, summary, raw_text, created_by, created_at
             FROM conversations WHERE lead_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let convs = stmt
            .query_map(params![lead_id.to_string()], conversation_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(convs)
    }

    pub fn create_conversation(
        &self,
        lead_id: Uuid,
        created_by: Uuid,
        input: CreateConversationInput,
    ) -> Result<Conversation> {
        let conv = Conversation {
            id: Uuid::new_v4(),
            lead_id,
            summary: input.summary,
            raw_text: input.raw_text,
            created_by,
            created_at: Utc::now(),
        };
        let conn = self.lock();
        conn.execute(
            "INSERT INTO conversations (id, lead_id, summary, raw_text, created_by, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                conv.id.to_string(),
                conv.lead_id.to_string(),
                conv.summary,
                conv.raw_text,
                conv.created_by.to_string(),
                conv.created_at.to_rfc3339(),
            ],
        )?;
        Ok(conv)
    }
}
