use chrono::{TimeZone, Utc};
use leadline_core::models::*;
use leadline_core::Database;
use uuid::Uuid;

use super::*;

fn setup() -> (Database, Identity) {
    let db = Database::open_in_memory().unwrap();
    db.migrate().unwrap();
    let user = db.create_user("consultant@example.com", "hash").unwrap();
    let identity = Identity {
        user_id: user.id,
        email: user.email,
    };
    (db, identity)
}

fn lead_input(name: &str) -> CreateLeadInput {
    CreateLeadInput {
        name: name.into(),
        target_country: None,
        grade: None,
        age: None,
        school_type: None,
        stage: None,
    }
}

#[test]
fn stage_labels_are_total_and_non_empty() {
    let stages = [
        LeadStage::New,
        LeadStage::Consulting,
        LeadStage::Proposal,
        LeadStage::Signed,
        LeadStage::Lost,
    ];
    for stage in stages {
        assert!(!stage.label().is_empty());
        assert_eq!(LeadStage::from_str(stage.as_str()), Some(stage));
    }
}

#[test]
fn empty_lead_name_is_rejected() {
    let (db, identity) = setup();
    let err = create_lead(&db, &identity, lead_input("   ")).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(list_leads(&db).unwrap().is_empty());
}

#[test]
fn blank_optional_fields_become_absent() {
    let (db, identity) = setup();
    let lead = create_lead(
        &db,
        &identity,
        CreateLeadInput {
            name: "  李四 ".into(),
            target_country: Some("  ".into()),
            grade: Some("G10".into()),
            age: None,
            school_type: Some(String::new()),
            stage: None,
        },
    )
    .unwrap();
    assert_eq!(lead.name, "李四");
    assert_eq!(lead.target_country, None);
    assert_eq!(lead.grade.as_deref(), Some("G10"));
    assert_eq!(lead.school_type, None);
    assert_eq!(lead.owner_id, identity.user_id);
}

#[test]
fn detail_for_unknown_lead_is_not_found() {
    let (db, _) = setup();
    let err = load_lead_detail(&db, Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn conversation_round_trips_through_the_aggregate() {
    let (db, identity) = setup();
    let lead = create_lead(&db, &identity, lead_input("王五")).unwrap();

    let detail = add_conversation(
        &db,
        &identity,
        lead.id,
        CreateConversationInput {
            summary: " S ".into(),
            raw_text: Some("R".into()),
        },
    )
    .unwrap();

    let first = &detail.conversations[0];
    assert_eq!(first.summary, "S");
    assert_eq!(first.raw_text.as_deref(), Some("R"));
    assert_eq!(first.created_by, identity.user_id);
}

#[test]
fn empty_conversation_summary_is_rejected() {
    let (db, identity) = setup();
    let lead = create_lead(&db, &identity, lead_input("王五")).unwrap();
    let err = add_conversation(
        &db,
        &identity,
        lead.id,
        CreateConversationInput {
            summary: "".into(),
            raw_text: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    let detail = load_lead_detail(&db, lead.id).unwrap();
    assert!(detail.conversations.is_empty());
}

#[test]
fn followup_due_time_is_preserved() {
    let (db, identity) = setup();
    let lead = create_lead(&db, &identity, lead_input("赵六")).unwrap();
    let due = Utc.with_ymd_and_hms(2026, 9, 15, 10, 0, 0).unwrap();
    let detail = add_followup(
        &db,
        lead.id,
        CreateFollowupInput {
            next_action: "发方案".into(),
            due_at: Some(due),
        },
    )
    .unwrap();
    assert_eq!(detail.followups[0].due_at, Some(due));
}

#[test]
fn toggle_followup_is_self_inverse_on_the_flag() {
    let (db, identity) = setup();
    let lead = create_lead(&db, &identity, lead_input("张三")).unwrap();
    assert_eq!(lead.stage.label(), "新线索");

    let detail = add_followup(
        &db,
        lead.id,
        CreateFollowupInput {
            next_action: "约咨询".into(),
            due_at: None,
        },
    )
    .unwrap();
    let followup = &detail.followups[0];
    assert!(!followup.completed);
    assert!(followup.completed_at.is_none());
    assert!(followup.due_at.is_none());

    let detail = toggle_followup(&db, lead.id, followup.id).unwrap();
    let completed = &detail.followups[0];
    assert!(completed.completed);
    assert!(completed.completed_at.is_some());

    let detail = toggle_followup(&db, lead.id, followup.id).unwrap();
    let reverted = &detail.followups[0];
    assert!(!reverted.completed);
    assert!(reverted.completed_at.is_none());
}

#[test]
fn toggling_a_followup_of_another_lead_is_not_found() {
    let (db, identity) = setup();
    let lead_a = create_lead(&db, &identity, lead_input("A")).unwrap();
    let lead_b = create_lead(&db, &identity, lead_input("B")).unwrap();
    let detail = add_followup(
        &db,
        lead_a.id,
        CreateFollowupInput {
            next_action: "跟进家长".into(),
            due_at: None,
        },
    )
    .unwrap();
    let err = toggle_followup(&db, lead_b.id, detail.followups[0].id).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn ai_assist_archive_is_append_only_with_latest_projection() {
    let (db, identity) = setup();
    let lead = create_lead(&db, &identity, lead_input("钱七")).unwrap();

    save_ai_assist(
        &db,
        lead.id,
        CreateAiAssistInput {
            extracted_needs: "first".into(),
            suggested_plan: String::new(),
            communication_tips: String::new(),
            acknowledged: false,
        },
    )
    .unwrap();
    // Identical created_at ties break by id, so force distinct instants.
    std::thread::sleep(std::time::Duration::from_millis(5));
    let detail = save_ai_assist(
        &db,
        lead.id,
        CreateAiAssistInput {
            extracted_needs: "second".into(),
            suggested_plan: "plan".into(),
            communication_tips: "tips".into(),
            acknowledged: true,
        },
    )
    .unwrap();

    let latest = detail.latest_ai_assist.unwrap();
    assert_eq!(latest.extracted_needs, "second");
    assert!(latest.acknowledged);
}

#[test]
fn contract_draft_then_submit_goes_pending() {
    let (db, identity) = setup();
    let lead = create_lead(&db, &identity, lead_input("孙八")).unwrap();

    let detail = create_contract_draft(
        &db,
        lead.id,
        CreateContractInput {
            proposal_summary: "match US boarding schools".into(),
        },
    )
    .unwrap();
    let contract = detail.latest_contract.clone().unwrap();
    assert_eq!(contract.status, ContractStatus::Draft);
    assert_eq!(contract.proposal_summary, "match US boarding schools");

    let detail = submit_contract_for_approval(&db, lead.id).unwrap();
    assert_eq!(
        detail.latest_contract.as_ref().unwrap().status,
        ContractStatus::Pending
    );

    // Double-submit is an idempotent no-op.
    let detail = submit_contract_for_approval(&db, lead.id).unwrap();
    let latest = detail.latest_contract.unwrap();
    assert_eq!(latest.id, contract.id);
    assert_eq!(latest.status, ContractStatus::Pending);
}

#[test]
fn submit_without_contract_is_a_precondition_error() {
    let (db, identity) = setup();
    let lead = create_lead(&db, &identity, lead_input("周九")).unwrap();
    let err = submit_contract_for_approval(&db, lead.id).unwrap_err();
    assert!(matches!(err, Error::Precondition(_)));
    assert_eq!(err.to_string(), "请先创建合同草稿");
    let detail = load_lead_detail(&db, lead.id).unwrap();
    assert!(detail.latest_contract.is_none());
}
