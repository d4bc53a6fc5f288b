//! Diesel table definitions.
//!
//! These must match `backend/migrations` exactly; regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Knowledge-base entries.
    entries (id) {
        id -> Uuid,
        title -> Varchar,
        /// Lowercase category name; checked by a constraint.
        category -> Varchar,
        description -> Text,
        related_terms -> Nullable<Array<Text>>,
        sources -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        created_by -> Varchar,
    }
}

diesel::table! {
    /// Users recorded on authentication.
    users (id) {
        /// Identifier issued by the identity provider.
        id -> Varchar,
        display_name -> Varchar,
        avatar_url -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(entries, users);
