//! Tests for entry validation and change application.

use super::*;
use chrono::{Duration, TimeZone};
use rstest::{fixture, rstest};
use serde_json::json;

fn draft(value: serde_json::Value) -> EntryDraft {
    serde_json::from_value(value).expect("draft deserialises")
}

fn codes(errors: &ValidationErrors) -> Vec<(&str, FieldErrorCode)> {
    errors
        .errors()
        .iter()
        .map(|error| (error.field.as_str(), error.code))
        .collect()
}

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn odin(now: DateTime<Utc>) -> Entry {
    let data = validate_new_entry(draft(json!({
        "title": "Odin",
        "category": "deity",
        "description": "The Allfather",
        "relatedTerms": ["Sleipnir", "Huginn"],
        "sources": "Poetic Edda"
    })))
    .expect("valid draft");
    Entry::create(EntryId::random(), data, ActorId::system(), now)
}

#[rstest]
fn draft_distinguishes_absent_from_null() {
    let parsed = draft(json!({"sources": null}));
    assert_eq!(parsed.sources, Some(serde_json::Value::Null));
    assert_eq!(parsed.related_terms, None);
}

#[rstest]
fn valid_draft_is_normalised() {
    let entry = validate_new_entry(draft(json!({
        "title": "  Freya ",
        "category": "DEITY",
        "description": "Goddess of love",
        "relatedTerms": [" Brisingamen ", "Folkvangr"]
    })))
    .expect("valid draft");

    assert_eq!(entry.title, "Freya");
    assert_eq!(entry.category, Category::Deity);
    assert_eq!(
        entry.related_terms,
        Some(vec!["Brisingamen".to_owned(), "Folkvangr".to_owned()])
    );
    assert_eq!(entry.sources, None);
}

#[rstest]
fn create_collects_every_violation() {
    let errors = validate_new_entry(draft(json!({
        "title": "   ",
        "category": "giant",
        "relatedTerms": ["ok", ""]
    })))
    .expect_err("invalid draft");

    assert_eq!(
        codes(&errors),
        vec![
            ("title", FieldErrorCode::Blank),
            ("category", FieldErrorCode::UnknownCategory),
            ("description", FieldErrorCode::Required),
            ("relatedTerms.1", FieldErrorCode::Blank),
        ]
    );
}

#[rstest]
fn wrong_types_are_reported_per_field() {
    let errors = validate_new_entry(draft(json!({
        "title": 5,
        "category": ["deity"],
        "description": "Trickster",
        "relatedTerms": "wisdom",
        "sources": false
    })))
    .expect_err("wrong types");

    assert_eq!(
        codes(&errors),
        vec![
            ("title", FieldErrorCode::InvalidType),
            ("category", FieldErrorCode::InvalidType),
            ("relatedTerms", FieldErrorCode::InvalidType),
            ("sources", FieldErrorCode::InvalidType),
        ]
    );
}

#[rstest]
fn non_string_terms_are_reported_by_index() {
    let errors = validate_entry_changes(draft(json!({
        "relatedTerms": ["Sleipnir", 8, " "]
    })))
    .expect_err("bad terms");

    assert_eq!(
        codes(&errors),
        vec![
            ("relatedTerms.1", FieldErrorCode::InvalidType),
            ("relatedTerms.2", FieldErrorCode::Blank),
        ]
    );
}

#[rstest]
#[case("title", json!({"title": "Od\u{0}in", "category": "deity", "description": "Allfather"}))]
#[case(
    "description",
    json!({"title": "Odin", "category": "deity", "description": "All\u{0}father"})
)]
#[case(
    "relatedTerms.0",
    json!({
        "title": "Odin",
        "category": "deity",
        "description": "Allfather",
        "relatedTerms": ["Hugin\u{0}n"]
    })
)]
#[case(
    "sources",
    json!({
        "title": "Odin",
        "category": "deity",
        "description": "Allfather",
        "sources": "Edda\u{0}"
    })
)]
fn nul_characters_are_rejected(#[case] field: &str, #[case] body: serde_json::Value) {
    let errors = validate_new_entry(draft(body)).expect_err("NUL rejected");
    assert_eq!(codes(&errors), vec![(field, FieldErrorCode::InvalidCharacter)]);
}

#[rstest]
fn description_is_trimmed_and_blank_sources_become_null() {
    let entry = validate_new_entry(draft(json!({
        "title": "Loki",
        "category": "deity",
        "description": "  Trickster of Asgard\n",
        "sources": "   "
    })))
    .expect("valid draft");

    assert_eq!(entry.description, "Trickster of Asgard");
    assert_eq!(entry.sources, None);
}

#[rstest]
fn update_with_blank_sources_clears_them() {
    let changes = validate_entry_changes(draft(json!({ "sources": "" }))).expect("valid update");
    assert_eq!(changes.sources, Some(None));
}

#[rstest]
fn empty_title_is_rejected() {
    let errors = validate_new_entry(draft(json!({
        "title": "",
        "category": "place",
        "description": "Hall of the slain"
    })))
    .expect_err("empty title");

    assert_eq!(codes(&errors), vec![("title", FieldErrorCode::Blank)]);
}

#[rstest]
fn overlong_title_is_rejected() {
    let title = "a".repeat(TITLE_MAX + 1);
    let errors = validate_new_entry(draft(json!({
        "title": title,
        "category": "place",
        "description": "Too long"
    })))
    .expect_err("long title");

    assert_eq!(codes(&errors), vec![("title", FieldErrorCode::TooLong)]);
}

#[rstest]
fn title_limit_counts_characters_not_bytes() {
    let title = "ö".repeat(TITLE_MAX);
    assert!(
        validate_new_entry(draft(json!({
            "title": title,
            "category": "place",
            "description": "Umlauts"
        })))
        .is_ok()
    );
}

#[rstest]
fn update_accepts_empty_payload() {
    let changes = validate_entry_changes(EntryDraft::default()).expect("empty update");
    assert_eq!(changes, EntryChanges::default());
}

#[rstest]
fn update_rejects_null_required_fields() {
    let errors = validate_entry_changes(draft(json!({
        "title": null,
        "description": null
    })))
    .expect_err("nulls rejected");

    assert_eq!(
        codes(&errors),
        vec![
            ("title", FieldErrorCode::Required),
            ("description", FieldErrorCode::Required),
        ]
    );
}

#[rstest]
fn update_allows_clearing_nullable_fields() {
    let changes = validate_entry_changes(draft(json!({
        "relatedTerms": null,
        "sources": null
    })))
    .expect("clearing is allowed");

    assert_eq!(changes.related_terms, Some(None));
    assert_eq!(changes.sources, Some(None));
}

#[rstest]
fn apply_changes_merges_only_present_fields(mut odin: Entry, now: DateTime<Utc>) {
    let later = now + Duration::minutes(5);
    let changes = validate_entry_changes(draft(json!({
        "description": "One-eyed wanderer",
        "sources": null
    })))
    .expect("valid update");

    odin.apply_changes(changes, later);

    assert_eq!(odin.title, "Odin");
    assert_eq!(odin.description, "One-eyed wanderer");
    assert_eq!(odin.terms(), ["Sleipnir", "Huginn"]);
    assert_eq!(odin.sources, None);
    assert_eq!(odin.created_at, now);
    assert_eq!(odin.updated_at, later);
}

#[rstest]
fn updated_at_never_moves_backwards(mut odin: Entry, now: DateTime<Utc>) {
    odin.apply_changes(EntryChanges::default(), now - Duration::hours(1));
    assert_eq!(odin.updated_at, now);
    assert!(odin.updated_at >= odin.created_at);
}

#[rstest]
fn created_entries_share_timestamps(odin: Entry) {
    assert_eq!(odin.created_at, odin.updated_at);
    assert_eq!(odin.created_by, ActorId::system());
}

#[rstest]
fn entry_serialises_with_the_wire_shape(odin: Entry) {
    let value = serde_json::to_value(&odin).expect("serialise entry");

    assert_eq!(value["title"], "Odin");
    assert_eq!(value["category"], "deity");
    assert_eq!(value["relatedTerms"], json!(["Sleipnir", "Huginn"]));
    assert_eq!(value["createdBy"], "system");
    assert_eq!(value["id"], odin.id.to_string());
    assert!(value.get("createdAt").is_some());
    assert!(value.get("updatedAt").is_some());
}

#[rstest]
fn absent_nullable_fields_serialise_as_null(mut odin: Entry) {
    odin.related_terms = None;
    odin.sources = None;
    let value = serde_json::to_value(&odin).expect("serialise entry");

    assert!(value["relatedTerms"].is_null());
    assert!(value["sources"].is_null());
    assert!(odin.terms().is_empty());
}

#[rstest]
#[case("deity", Some(Category::Deity))]
#[case(" Artifact ", Some(Category::Artifact))]
#[case("EVENT", Some(Category::Event))]
#[case("all", None)]
#[case("", None)]
fn category_parse_is_case_insensitive(#[case] raw: &str, #[case] expected: Option<Category>) {
    assert_eq!(Category::parse(raw), expected);
}

#[rstest]
fn actor_id_rejects_blank() {
    assert_eq!(ActorId::new("  "), Err(ActorIdError::Empty));
}

#[rstest]
fn entry_id_parses_uuids_only() {
    let id = EntryId::random();
    assert_eq!(id.to_string().parse::<EntryId>().ok(), Some(id));
    assert!("42".parse::<EntryId>().is_err());
}
