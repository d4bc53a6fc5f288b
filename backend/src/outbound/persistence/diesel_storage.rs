//! PostgreSQL-backed implementation of the storage ports.
//!
//! Timestamps come from the injected clock rather than database defaults so
//! this store and [`super::MemoryStorage`] stamp records the same way. They
//! are truncated to microseconds, the resolution of `timestamptz`, so the
//! record returned from a write equals the record read back later.
//!
//! Searches load every row and filter in process with [`EntryFilter`]. This
//! keeps the two variants in exact agreement but does not scale to large
//! tables.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::ports::{
    EntryRepository, EntryRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    ActorId, Category, Entry, EntryChanges, EntryFilter, EntryId, NewEntry, User, UserId,
    UserProfile, sort_entries,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{EntryChangeset, EntryRow, NewEntryRow, NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::{entries, users};

diesel::define_sql_function! {
    /// PostgreSQL `GREATEST` for two timestamps.
    fn greatest(
        left: diesel::sql_types::Timestamptz,
        right: diesel::sql_types::Timestamptz,
    ) -> diesel::sql_types::Timestamptz;
}

/// Diesel implementation of both storage ports.
#[derive(Clone)]
pub struct DieselStorage {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselStorage {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc().trunc_subsecs(6)
    }

    async fn load_entries(&self, operation: &str) -> Result<Vec<Entry>, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<EntryRow> = entries::table
            .select(EntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, operation))?;
        rows.into_iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: EntryRow) -> Result<Entry, EntryRepositoryError> {
    let Some(category) = Category::parse(&row.category) else {
        warn!(entry_id = %row.id, category = %row.category, "unknown category in stored entry");
        return Err(EntryRepositoryError::query(format!(
            "entry {} has unknown category '{}'",
            row.id, row.category
        )));
    };
    let created_by = ActorId::new(row.created_by).map_err(|err| {
        warn!(entry_id = %row.id, error = %err, "invalid creator in stored entry");
        EntryRepositoryError::query(format!("entry {} has invalid creator: {err}", row.id))
    })?;

    Ok(Entry {
        id: EntryId::from_uuid(row.id),
        title: row.title,
        category,
        description: row.description,
        related_terms: row.related_terms,
        sources: row.sources,
        created_at: row.created_at,
        updated_at: row.updated_at,
        created_by,
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    let id = UserId::new(row.id).map_err(|err| {
        warn!(error = %err, "invalid stored user id");
        UserRepositoryError::query(format!("invalid stored user id: {err}"))
    })?;
    Ok(User {
        id,
        display_name: row.display_name,
        avatar_url: row.avatar_url,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl EntryRepository for DieselStorage {
    async fn get_entry(&self, id: &EntryId) -> Result<Option<Entry>, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = entries::table
            .find(*id.as_uuid())
            .select(EntryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "get entry"))?;
        row.map(row_to_entry).transpose()
    }

    async fn get_all_entries(&self) -> Result<Vec<Entry>, EntryRepositoryError> {
        let mut entries = self.load_entries("list entries").await?;
        sort_entries(&mut entries);
        Ok(entries)
    }

    async fn search_entries(
        &self,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, EntryRepositoryError> {
        let candidates = self.load_entries("search entries").await?;
        Ok(filter.apply(candidates))
    }

    async fn create_entry(
        &self,
        data: NewEntry,
        actor: &ActorId,
    ) -> Result<Entry, EntryRepositoryError> {
        let entry = Entry::create(EntryId::random(), data, actor.clone(), self.now());
        let row = NewEntryRow {
            id: *entry.id.as_uuid(),
            title: &entry.title,
            category: entry.category.as_str(),
            description: &entry.description,
            related_terms: entry.related_terms.clone(),
            sources: entry.sources.as_deref(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            created_by: entry.created_by.as_str(),
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored = diesel::insert_into(entries::table)
            .values(&row)
            .returning(EntryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "create entry"))?;
        row_to_entry(stored)
    }

    async fn update_entry(
        &self,
        id: &EntryId,
        changes: EntryChanges,
        actor: &ActorId,
    ) -> Result<Option<Entry>, EntryRepositoryError> {
        let changeset = EntryChangeset {
            title: changes.title.as_deref(),
            category: changes.category.map(Category::as_str),
            description: changes.description.as_deref(),
            related_terms: changes.related_terms.clone(),
            sources: changes.sources.as_ref().map(|sources| sources.as_deref()),
        };
        let now = self.now();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(entries::table.find(*id.as_uuid()))
            .set((
                changeset,
                entries::updated_at.eq(greatest(entries::updated_at, now)),
            ))
            .returning(EntryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "update entry"))?;

        if row.is_some() {
            debug!(entry_id = %id, %actor, "entry updated");
        }
        row.map(row_to_entry).transpose()
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(entries::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "delete entry"))?;
        Ok(deleted > 0)
    }

    async fn count_entries(&self) -> Result<u64, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = entries::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "count entries"))?;
        Ok(u64::try_from(count).unwrap_or_default())
    }
}

#[async_trait]
impl UserRepository for DieselStorage {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .find(id.as_str())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, "get user"))?;
        row.map(row_to_user).transpose()
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<User, UserRepositoryError> {
        let now = self.now();
        let row = NewUserRow {
            id: profile.id().as_str(),
            display_name: profile.display_name(),
            avatar_url: profile.avatar_url(),
            created_at: now,
            updated_at: now,
        };

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored = diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::id)
            .do_update()
            .set((
                users::display_name.eq(excluded(users::display_name)),
                users::avatar_url.eq(excluded(users::avatar_url)),
                users::updated_at.eq(greatest(users::updated_at, excluded(users::updated_at))),
            ))
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, "upsert user"))?;
        row_to_user(stored)
    }
}
