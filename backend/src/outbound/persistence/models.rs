//! Diesel row structs. Internal to the persistence adapter.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{entries, users};

/// Row read from `entries`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EntryRow {
    pub id: Uuid,
    pub title: String,
    pub category: String,
    pub description: String,
    pub related_terms: Option<Vec<String>>,
    pub sources: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
}

/// Insertable entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = entries)]
pub(crate) struct NewEntryRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub category: &'a str,
    pub description: &'a str,
    pub related_terms: Option<Vec<String>>,
    pub sources: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: &'a str,
}

/// Partial update of an entry's mutable columns.
///
/// `None` leaves a column untouched; for the nullable columns `Some(None)`
/// writes `NULL`.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = entries)]
pub(crate) struct EntryChangeset<'a> {
    pub title: Option<&'a str>,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
    pub related_terms: Option<Option<Vec<String>>>,
    pub sources: Option<Option<&'a str>>,
}

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable user.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: &'a str,
    pub display_name: &'a str,
    pub avatar_url: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
