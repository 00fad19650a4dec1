use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{parse_opt_ts, parse_ts, parse_uuid, Database};
use crate::models::{CreateFollowupInput, Followup};

fn followup_from_row(row: &Row<'_>) -> rusqlite::Result<Followup> {
    Ok(Followup {
        id: parse_uuid(row.get("id")?)?,
        lead_id: parse_uuid(row.get("lead_id")?)?,
        next_action: row.get("next_action")?,
        due_at: parse_opt_ts(row.get("due_at")?)?,
        completed: row.get("completed")?,
        completed_at: parse_opt_ts(row.get("completed_at")?)?,
        created_at: parse_ts(row.get("created_at")?)?,
    })
}

impl Database {
    pub fn list_followups(&self, lead_id: Uuid) -> Result<Vec<Followup>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, lead_id, next_action, due_at, completed, completed_at, created_at
             FROM followups WHERE lead_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let followups = stmt
            .query_map(params![lead_id.to_string()], followup_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(followups)
    }

    pub fn get_followup(&self, id: Uuid) -> Result<Option<Followup>> {
        let conn = self.lock();
        let followup = conn
            .query_row(
                "SELECT id, lead_id, next_action, due_at, completed, completed_at, created_at
                 FROM followups WHERE id = ?1",
                params![id.to_string()],
                followup_from_row,
            )
            .optional()?;
        Ok(followup)
    }

    pub fn create_followup(&self, lead_id: Uuid, input: CreateFollowupInput) -> Result<Followup> {
        let followup = Followup {
            id: Uuid::new_v4(),
            lead_id,
            next_action: input.next_action,
            due_at: input.due_at,
            completed: false,
            completed_at: None,
            created_at: Utc::now(),
        };
        let conn = self.lock();
        conn.execute(
            "INSERT INTO followups (id, lead_id, next_action, due_at, completed, completed_at, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                followup.id.to_string(),
                followup.lead_id.to_string(),
                followup.next_action,
                followup.due_at.map(|t| t.to_rfc3339()),
                followup.completed,
                Option::<String>::None,
                followup.created_at.to_rfc3339(),
            ],
        )?;
        Ok(followup)
    }

    /// Set the completion state of a followup. Returns the updated row, or
    /// None when no such followup exists.
    pub fn set_followup_completed(
        &self,
        id: Uuid,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Option<Followup>> {
        {
            let conn = self.lock();
            let changed = conn.execute(
                "UPDATE followups SET completed = ?2, completed_at = ?3 WHERE id = ?1",
                params![
                    id.to_string(),
                    completed,
                    completed_at.map(|t| t.to_rfc3339()),
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
        }
        self.get_followup(id)
    }
}
