use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{parse_ts, parse_uuid, Database};
use crate::models::{CreateLeadInput, Lead, LeadStage};

fn lead_from_row(row: &Row<'_>) -> rusqlite::Result<Lead> {
    let stage: String = row.get("stage")?;
    Ok(Lead {
        id: parse_uuid(row.get("id")?)?,
        name: row.get("name")?,
        stage: LeadStage::from_str(&stage).unwrap_or_default(),
        target_country: row.get("target_country")?,
        grade: row.get("grade")?,
        age: row.get("age")?,
        school_type: row.get("school_type")?,
        owner_id: parse_uuid(row.get("owner_id")?)?,
        created_at: parse_ts(row.get("created_at")?)?,
    })
}

impl Database {
    /// All leads, newest first. No pagination: the workbench renders the
    /// entire list.
    pub fn list_leads(&self) -> Result<Vec<Lead>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, name, stage, target_country, grade, age, school_type, owner_id, created_at
             FROM leads ORDER BY created_at DESC, id DESC",
        )?;
        let leads = stmt
            .query_map([], lead_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(leads)
    }

    pub fn get_lead(&self, id: Uuid) -> Result<Option<Lead>> {
        let conn = self.lock();
        let lead = conn
            .query_row(
                "SELECT id, name, stage, target_country, grade, age, school_type, owner_id, created_at
                 FROM leads WHERE id = ?1",
                params![id.to_string()],
                lead_from_row,
            )
            .optional()?;
        Ok(lead)
    }

    pub fn create_lead(&self, owner_id: Uuid, input: CreateLeadInput) -> Result<Lead> {
        let lead = Lead {
            id: Uuid::new_v4(),
            name: input.name,
            stage: input.stage.unwrap_or_default(),
            target_country: input.target_country,
            grade: input.grade,
            age: input.age,
            school_type: input.school_type,
            owner_id,
            created_at: Utc::now(),
        };
        let conn = self.lock();
        conn.execute(
            "INSERT INTO leads (id, name, stage, target_country, grade, age, school_type, owner_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                lead.id.to_string(),
                lead.name,
                lead.stage.as_str(),
                lead.target_country,
                lead.grade,
                lead.age,
                lead.school_type,
                lead.owner_id.to_string(),
                lead.created_at.to_rfc3339(),
            ],
        )?;
        Ok(lead)
    }
}
