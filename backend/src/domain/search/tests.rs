//! Tests for entry filtering and title ordering.

use std::cmp::Ordering;

use super::*;
use crate::domain::{ActorId, Category, EntryId, NewEntry};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

fn entry(title: &str, category: Category, description: &str, terms: Option<&[&str]>) -> Entry {
    let now = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    Entry::create(
        EntryId::random(),
        NewEntry {
            title: title.to_owned(),
            category,
            description: description.to_owned(),
            related_terms: terms.map(|terms| terms.iter().map(|t| (*t).to_owned()).collect()),
            sources: None,
        },
        ActorId::system(),
        now,
    )
}

fn titles(entries: &[Entry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.title.as_str()).collect()
}

#[fixture]
fn catalogue() -> Vec<Entry> {
    vec![
        entry("Valhalla", Category::Place, "Hall of the slain", Some(&["Einherjar"][..])),
        entry("Odin", Category::Deity, "The Allfather", Some(&["Sleipnir", "Gungnir"][..])),
        entry("Freya", Category::Deity, "Goddess of love", None),
    ]
}

#[rstest]
fn text_query_matches_title_substring(catalogue: Vec<Entry>) {
    let result = EntryFilter::new(Some("fr"), None).apply(catalogue);
    assert_eq!(titles(&result), vec!["Freya"]);
}

#[rstest]
fn category_filter_keeps_order(catalogue: Vec<Entry>) {
    let result = EntryFilter::new(Some(""), Some("deity")).apply(catalogue);
    assert_eq!(titles(&result), vec!["Freya", "Odin"]);
}

#[rstest]
#[case("allfather", vec!["Odin"])]
#[case("GUNGNIR", vec!["Odin"])]
#[case("einherjar", vec!["Valhalla"])]
#[case("o", vec!["Freya", "Odin", "Valhalla"])]
#[case("xyz", vec![])]
fn text_query_searches_description_and_terms(
    catalogue: Vec<Entry>,
    #[case] query: &str,
    #[case] expected: Vec<&str>,
) {
    let result = EntryFilter::new(Some(query), None).apply(catalogue);
    assert_eq!(titles(&result), expected);
}

#[rstest]
#[case(None)]
#[case(Some(""))]
#[case(Some("all"))]
#[case(Some("All"))]
fn wildcard_categories_keep_everything(catalogue: Vec<Entry>, #[case] category: Option<&str>) {
    let result = EntryFilter::new(None, category).apply(catalogue);
    assert_eq!(titles(&result), vec!["Freya", "Odin", "Valhalla"]);
}

#[rstest]
#[case(None, None, true)]
#[case(Some(""), Some("ALL"), true)]
#[case(Some("  "), None, false)]
#[case(Some("odin"), None, false)]
#[case(None, Some("deity"), false)]
fn unrestricted_filters_are_detected(
    #[case] query: Option<&str>,
    #[case] category: Option<&str>,
    #[case] expected: bool,
) {
    assert_eq!(EntryFilter::new(query, category).is_unrestricted(), expected);
}

#[rstest]
fn category_comparison_ignores_case(catalogue: Vec<Entry>) {
    let result = EntryFilter::new(None, Some("PLACE")).apply(catalogue);
    assert_eq!(titles(&result), vec!["Valhalla"]);
}

#[rstest]
fn unknown_category_matches_nothing(catalogue: Vec<Entry>) {
    assert!(EntryFilter::new(None, Some("giant")).apply(catalogue).is_empty());
}

#[rstest]
fn filters_combine(catalogue: Vec<Entry>) {
    let result = EntryFilter::new(Some("hall"), Some("deity")).apply(catalogue);
    assert!(result.is_empty());
}

#[rstest]
fn missing_related_terms_do_not_match(catalogue: Vec<Entry>) {
    let freya = &catalogue[2];
    assert!(!EntryFilter::new(Some("sleipnir"), None).matches(freya));
}

#[rstest]
fn filtering_is_idempotent(catalogue: Vec<Entry>) {
    let filter = EntryFilter::new(Some("a"), None);
    let first = filter.apply(catalogue.clone());
    let second = filter.apply(catalogue);
    assert_eq!(first, second);
}

#[rstest]
#[case("Mjölnir", "Mjolnir", Ordering::Greater)]
#[case("Ragnarök", "Ran", Ordering::Less)]
#[case("Æsir", "Baldr", Ordering::Less)]
#[case("Þórr", "Tyr", Ordering::Less)]
#[case("odin", "Odin", Ordering::Less)]
#[case("Odin", "odin", Ordering::Greater)]
#[case("OdIn", "Odin", Ordering::Greater)]
#[case("Freya", "Freya", Ordering::Equal)]
fn titles_use_folded_collation(
    #[case] left: &str,
    #[case] right: &str,
    #[case] expected: Ordering,
) {
    assert_eq!(compare_titles(left, right), expected);
}

#[rstest]
#[case("odin ")]
#[case(" odin")]
fn surrounding_whitespace_is_part_of_the_query(catalogue: Vec<Entry>, #[case] query: &str) {
    let result = EntryFilter::new(Some(query), None).apply(catalogue);
    assert!(result.is_empty());
}

#[rstest]
fn a_space_matches_only_text_containing_one(catalogue: Vec<Entry>) {
    let result = EntryFilter::new(Some(" "), None).apply(catalogue);
    assert_eq!(titles(&result), vec!["Freya", "Odin", "Valhalla"]);

    let single_words = vec![entry("Sif", Category::Deity, "Thor's wife", None)];
    let with_space = EntryFilter::new(Some(" "), None).apply(single_words);
    assert_eq!(titles(&with_space), vec!["Sif"]);

    let no_space = vec![entry("Sif", Category::Deity, "Goddess", Some(&["Thor"][..]))];
    assert!(EntryFilter::new(Some(" "), None).apply(no_space).is_empty());
}

#[rstest]
fn seeded_titles_sort_alphabetically() {
    let mut entries: Vec<Entry> = ["Yggdrasil", "Ragnarök", "Mjölnir", "Freya", "Valhalla", "Odin"]
        .into_iter()
        .map(|title| entry(title, Category::Concept, "text", None))
        .collect();
    sort_entries(&mut entries);
    assert_eq!(
        titles(&entries),
        vec!["Freya", "Mjölnir", "Odin", "Ragnarök", "Valhalla", "Yggdrasil"]
    );
}

#[rstest]
fn duplicate_titles_order_deterministically() {
    let first = entry("Loki", Category::Deity, "Trickster", None);
    let second = entry("Loki", Category::Creature, "Shape-shifter", None);
    let mut forward = vec![first.clone(), second.clone()];
    let mut backward = vec![second, first];
    sort_entries(&mut forward);
    sort_entries(&mut backward);
    assert_eq!(forward, backward);
}
