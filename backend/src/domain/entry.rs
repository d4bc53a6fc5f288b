//! Knowledge-base entries and their write-payload validation.
//!
//! An [`Entry`] is the canonical stored record. Write requests arrive as an
//! [`EntryDraft`], which keeps every field optional and distinguishes an
//! absent field from an explicit `null`. [`validate_new_entry`] and
//! [`validate_entry_changes`] turn a draft into a [`NewEntry`] or
//! [`EntryChanges`], collecting every field violation rather than stopping at
//! the first one.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Maximum number of characters accepted in an entry title.
pub const TITLE_MAX: usize = 200;

/// Stable entry identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generate a fresh identifier. UUID v4 values are never reused.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Closed classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Gods and goddesses.
    Deity,
    /// Realms, halls and locations.
    Place,
    /// Ideas and cosmological events treated as concepts.
    Concept,
    /// Named objects and weapons.
    Artifact,
    /// Beasts, giants and other beings.
    Creature,
    /// Happenings in the mythological timeline.
    Event,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Category; 6] = [
        Self::Deity,
        Self::Place,
        Self::Concept,
        Self::Artifact,
        Self::Creature,
        Self::Event,
    ];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deity => "deity",
            Self::Place => "place",
            Self::Concept => "concept",
            Self::Artifact => "artifact",
            Self::Creature => "creature",
            Self::Event => "event",
        }
    }

    /// Case-insensitive lookup by wire name.
    ///
    /// # Examples
    /// ```
    /// use mimir::domain::Category;
    ///
    /// assert_eq!(Category::parse("Deity"), Some(Category::Deity));
    /// assert_eq!(Category::parse("giant"), None);
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(raw))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for [`ActorId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActorIdError {
    /// The identifier was empty or whitespace.
    #[error("actor id must not be empty")]
    Empty,
}

/// Identity attributed as the creator of an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    const SYSTEM: &'static str = "system";

    /// Validate and construct an actor identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, ActorIdError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ActorIdError::Empty);
        }
        Ok(Self(id))
    }

    /// Sentinel actor used for seeded entries and unknown creators.
    #[must_use]
    pub fn system() -> Self {
        Self(Self::SYSTEM.to_owned())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ActorId> for String {
    fn from(value: ActorId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ActorId {
    type Error = ActorIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored knowledge-base entry.
///
/// ## Invariants
/// - `updated_at >= created_at`.
/// - `title` and `description` are non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: EntryId,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub related_terms: Option<Vec<String>>,
    pub sources: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: ActorId,
}

impl Entry {
    /// Build a freshly created entry stamped with `now` for both timestamps.
    #[must_use]
    pub fn create(id: EntryId, data: NewEntry, actor: ActorId, now: DateTime<Utc>) -> Self {
        let NewEntry {
            title,
            category,
            description,
            related_terms,
            sources,
        } = data;
        Self {
            id,
            title,
            category,
            description,
            related_terms,
            sources,
            created_at: now,
            updated_at: now,
            created_by: actor,
        }
    }

    /// Merge the supplied fields and refresh `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if `now` is earlier than the
    /// stored value.
    pub fn apply_changes(&mut self, changes: EntryChanges, now: DateTime<Utc>) {
        let EntryChanges {
            title,
            category,
            description,
            related_terms,
            sources,
        } = changes;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(related_terms) = related_terms {
            self.related_terms = related_terms;
        }
        if let Some(sources) = sources {
            self.sources = sources;
        }
        self.updated_at = now.max(self.updated_at);
    }

    /// Related terms, treating an absent list as empty.
    pub fn terms(&self) -> &[String] {
        self.related_terms.as_deref().unwrap_or_default()
    }
}

/// Validated payload for creating an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub title: String,
    pub category: Category,
    pub description: String,
    pub related_terms: Option<Vec<String>>,
    pub sources: Option<String>,
}

/// Validated partial update.
///
/// `None` leaves a field unchanged. For the nullable fields the inner
/// `Option` is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryChanges {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub related_terms: Option<Option<Vec<String>>>,
    pub sources: Option<Option<String>>,
}

/// Raw, unvalidated write payload as received from clients.
///
/// Each field keeps the JSON value exactly as sent so type mismatches are
/// reported per field by validation instead of failing deserialisation.
/// `None` means the field was absent; `Some(Value::Null)` means an explicit
/// `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDraft {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub related_terms: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub sources: Option<Value>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Machine-readable reason attached to a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    /// A required field is missing or `null`.
    Required,
    /// The value has the wrong JSON type.
    InvalidType,
    /// The value is empty once trimmed.
    Blank,
    /// The value exceeds its length limit.
    TooLong,
    /// The value contains a NUL character.
    InvalidCharacter,
    /// The category is not part of the enumeration.
    UnknownCategory,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub code: FieldErrorCode,
    pub message: String,
}

impl FieldError {
    /// Construct a field error.
    pub fn new(field: impl Into<String>, code: FieldErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// Every field violation found in a draft.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid entry data ({} field error(s))", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    /// Borrow the collected errors.
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Consume into the underlying list.
    pub fn into_inner(self) -> Vec<FieldError> {
        self.0
    }
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn push(&mut self, field: impl Into<String>, code: FieldErrorCode, message: impl Into<String>) {
        self.0.push(FieldError::new(field, code, message));
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationErrors(self.0))
        }
    }

    fn fail<T>(self) -> Result<T, ValidationErrors> {
        Err(ValidationErrors(self.0))
    }
}

/// Type check for a string field; `Some(None)` is an explicit `null`.
fn string_value(
    value: Value,
    field: &str,
    label: &str,
    errors: &mut Collector,
) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(text) => Some(Some(text)),
        _ => {
            errors.push(field, FieldErrorCode::InvalidType, format!("{label} must be a string"));
            None
        }
    }
}

/// A present, non-null string, or a recorded error.
fn required_string(
    value: Option<Value>,
    field: &str,
    label: &str,
    errors: &mut Collector,
) -> Option<String> {
    let Some(value) = value else {
        errors.push(field, FieldErrorCode::Required, format!("{label} is required"));
        return None;
    };
    match string_value(value, field, label, errors)? {
        Some(text) => Some(text),
        None => {
            errors.push(field, FieldErrorCode::Required, format!("{label} is required"));
            None
        }
    }
}

/// PostgreSQL text columns cannot hold NUL.
fn check_no_nul(text: &str, field: &str, label: &str, errors: &mut Collector) -> bool {
    if text.contains('\0') {
        errors.push(
            field,
            FieldErrorCode::InvalidCharacter,
            format!("{label} must not contain NUL characters"),
        );
        return false;
    }
    true
}

fn check_title(raw: &str, errors: &mut Collector) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push("title", FieldErrorCode::Blank, "Title is required");
        return None;
    }
    if !check_no_nul(trimmed, "title", "Title", errors) {
        return None;
    }
    if trimmed.chars().count() > TITLE_MAX {
        errors.push(
            "title",
            FieldErrorCode::TooLong,
            format!("Title must be at most {TITLE_MAX} characters"),
        );
        return None;
    }
    Some(trimmed.to_owned())
}

fn check_category(raw: &str, errors: &mut Collector) -> Option<Category> {
    let category = Category::parse(raw);
    if category.is_none() {
        let allowed = Category::ALL.map(Category::as_str).join(", ");
        errors.push(
            "category",
            FieldErrorCode::UnknownCategory,
            format!("Category must be one of: {allowed}"),
        );
    }
    category
}

fn check_description(raw: &str, errors: &mut Collector) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push("description", FieldErrorCode::Blank, "Description is required");
        return None;
    }
    if !check_no_nul(trimmed, "description", "Description", errors) {
        return None;
    }
    Some(trimmed.to_owned())
}

/// Validate `relatedTerms`; `Some(None)` is an explicit `null`.
fn check_related_terms(value: Value, errors: &mut Collector) -> Option<Option<Vec<String>>> {
    let items = match value {
        Value::Null => return Some(None),
        Value::Array(items) => items,
        _ => {
            errors.push(
                "relatedTerms",
                FieldErrorCode::InvalidType,
                "Related terms must be a list of strings",
            );
            return None;
        }
    };

    let before = errors.0.len();
    let mut cleaned = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let field = format!("relatedTerms.{index}");
        let Value::String(term) = item else {
            errors.push(field, FieldErrorCode::InvalidType, "Related terms must be strings");
            continue;
        };
        let trimmed = term.trim();
        if trimmed.is_empty() {
            errors.push(field, FieldErrorCode::Blank, "Related terms must not be empty");
        } else if check_no_nul(trimmed, &field, "Related terms", errors) {
            cleaned.push(trimmed.to_owned());
        }
    }
    (errors.0.len() == before).then_some(Some(cleaned))
}

/// Validate `sources`; blank text is stored as `null`.
fn check_sources(value: Value, errors: &mut Collector) -> Option<Option<String>> {
    let text = string_value(value, "sources", "Sources", errors)?;
    match text {
        Some(text) if text.trim().is_empty() => Some(None),
        Some(text) => check_no_nul(&text, "sources", "Sources", errors).then_some(Some(text)),
        None => Some(None),
    }
}

/// Validate a create payload.
///
/// # Errors
/// Returns every field violation when the draft is not a valid entry.
///
/// # Examples
/// ```
/// use mimir::domain::{validate_new_entry, Category, EntryDraft};
///
/// let draft = EntryDraft {
///     title: Some("Odin".into()),
///     category: Some("Deity".into()),
///     description: Some("The Allfather".into()),
///     ..EntryDraft::default()
/// };
/// let entry = validate_new_entry(draft).expect("valid draft");
/// assert_eq!(entry.category, Category::Deity);
/// ```
pub fn validate_new_entry(draft: EntryDraft) -> Result<NewEntry, ValidationErrors> {
    let EntryDraft {
        title,
        category,
        description,
        related_terms,
        sources,
    } = draft;
    let mut errors = Collector::default();

    let title = required_string(title, "title", "Title", &mut errors)
        .and_then(|raw| check_title(&raw, &mut errors));
    let category = required_string(category, "category", "Category", &mut errors)
        .and_then(|raw| check_category(&raw, &mut errors));
    let description = required_string(description, "description", "Description", &mut errors)
        .and_then(|raw| check_description(&raw, &mut errors));
    let related_terms = match related_terms {
        Some(value) => check_related_terms(value, &mut errors),
        None => Some(None),
    };
    let sources = match sources {
        Some(value) => check_sources(value, &mut errors),
        None => Some(None),
    };

    // A `None` here always has a matching recorded error.
    match (title, category, description, related_terms, sources) {
        (Some(title), Some(category), Some(description), Some(related_terms), Some(sources)) => {
            errors.finish(NewEntry {
                title,
                category,
                description,
                related_terms,
                sources,
            })
        }
        _ => errors.fail(),
    }
}

/// Validate a partial update payload.
///
/// Absent fields are left unchanged. `title`, `category` and `description`
/// may not be `null`; `relatedTerms` and `sources` may be cleared with `null`.
///
/// # Errors
/// Returns every field violation found in the present fields.
pub fn validate_entry_changes(draft: EntryDraft) -> Result<EntryChanges, ValidationErrors> {
    let EntryDraft {
        title,
        category,
        description,
        related_terms,
        sources,
    } = draft;
    let mut errors = Collector::default();

    let title = title.and_then(|value| {
        required_string(Some(value), "title", "Title", &mut errors)
            .and_then(|raw| check_title(&raw, &mut errors))
    });
    let category = category.and_then(|value| {
        required_string(Some(value), "category", "Category", &mut errors)
            .and_then(|raw| check_category(&raw, &mut errors))
    });
    let description = description.and_then(|value| {
        required_string(Some(value), "description", "Description", &mut errors)
            .and_then(|raw| check_description(&raw, &mut errors))
    });
    let related_terms = related_terms.and_then(|value| check_related_terms(value, &mut errors));
    let sources = sources.and_then(|value| check_sources(value, &mut errors));

    errors.finish(EntryChanges {
        title,
        category,
        description,
        related_terms,
        sources,
    })
}

#[cfg(test)]
mod tests;
