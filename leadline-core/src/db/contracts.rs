use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{parse_ts, parse_uuid, Database};
use crate::models::{Contract, ContractStatus, CreateContractInput};

fn contract_from_row(row: &Row<'_>) -> rusqlite::Result<Contract> {
    let status: String = row.get("status")?;
    Ok(Contract {
        id: parse_uuid(row.get("id")?)?,
        lead_id: parse_uuid(row.get("lead_id")?)?,
        proposal_summary: row.get("proposal_summary")?,
        status: ContractStatus::from_str(&status).unwrap_or(ContractStatus::Draft),
        created_at: parse_ts(row.get("created_at")?)?,
    })
}

impl Database {
    /// Most recent contract for a lead, if any. Multiple drafts may exist;
    /// only the newest is surfaced.
    pub fn latest_contract(&self, lead_id: Uuid) -> Result<Option<Contract>> {
        let conn = self.lock();
        let contract = conn
            .query_row(
                "SELECT id, lead_id, proposal_summary, status, created_at
                 FROM contracts WHERE lead_id = ?1
                 ORDER BY created_at DESC, id DESC LIMIT 1",
                params![lead_id.to_string()],
                contract_from_row,
            )
            .optional()?;
        Ok(contract)
    }

    pub fn get_contract(&self, id: Uuid) -> Result<Option<Contract>> {
        let conn = self.lock();
        let contract = conn
            .query_row(
                "SELECT id, lead_id, proposal_summary, status, created_at
                 FROM contracts WHERE id = ?1",
                params![id.to_string()],
                contract_from_row,
            )
            .optional()?;
        Ok(contract)
    }

    /// New contracts always start in draft.
    pub fn create_contract(&self, lead_id: Uuid, input: CreateContractInput) -> Result<Contract> {
        let contract = Contract {
            id: Uuid::new_v4(),
            lead_id,
            proposal_summary: input.proposal_summary,
            status: ContractStatus::Draft,
            created_at: Utc::now(),
        };
        let conn = self.lock();
        conn.execute(
            "INSERT INTO contracts (id, lead_id, proposal_summary, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                contract.id.to_string(),
                contract.lead_id.to_string(),
                contract.proposal_summary,
                contract.status.as_str(),
                contract.created_at.to_rfc3339(),
            ],
        )?;
        Ok(contract)
    }

    /// Set a contract's status. Returns the updated row, or None when no
    /// such contract exists.
    pub fn set_contract_status(
        &self,
        id: Uuid,
        status: ContractStatus,
    ) -> Result<Option<Contract>> {
        {
            let conn = self.lock();
            let changed = conn.execute(
                "UPDATE contracts SET status = ?2 WHERE id = ?1",
                params![id.to_string(), status.as_str()],
            )?;
            if changed == 0 {
                return Ok(None);
            }
        }
        self.get_contract(id)
    }
}
