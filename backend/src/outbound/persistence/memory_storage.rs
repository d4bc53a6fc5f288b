//! Process-local storage backed by hash maps.
//!
//! Contents are lost on restart. Each operation holds the relevant lock for
//! the whole read-modify-write, so single-record operations are atomic.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use tracing::debug;

use crate::domain::ports::{
    EntryRepository, EntryRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    ActorId, Entry, EntryChanges, EntryFilter, EntryId, NewEntry, User, UserId, UserProfile,
    sort_entries,
};

/// In-memory implementation of both storage ports.
pub struct MemoryStorage {
    entries: RwLock<HashMap<EntryId, Entry>>,
    users: RwLock<HashMap<UserId, User>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStorage {
    /// Empty store stamping timestamps from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            users: RwLock::new(HashMap::new()),
            clock,
        }
    }

    // A panic while holding a lock cannot leave a half-applied record: every
    // mutation builds the new value before touching the map.
    fn read_entries(&self) -> RwLockReadGuard<'_, HashMap<EntryId, Entry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, HashMap<EntryId, Entry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_users(&self) -> RwLockReadGuard<'_, HashMap<UserId, User>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_users(&self) -> RwLockWriteGuard<'_, HashMap<UserId, User>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

#[async_trait]
impl EntryRepository for MemoryStorage {
    async fn get_entry(&self, id: &EntryId) -> Result<Option<Entry>, EntryRepositoryError> {
        Ok(self.read_entries().get(id).cloned())
    }

    async fn get_all_entries(&self) -> Result<Vec<Entry>, EntryRepositoryError> {
        let mut entries: Vec<Entry> = self.read_entries().values().cloned().collect();
        sort_entries(&mut entries);
        Ok(entries)
    }

    async fn search_entries(
        &self,
        filter: &EntryFilter,
    ) -> Result<Vec<Entry>, EntryRepositoryError> {
        let candidates: Vec<Entry> = self.read_entries().values().cloned().collect();
        Ok(filter.apply(candidates))
    }

    async fn create_entry(
        &self,
        data: NewEntry,
        actor: &ActorId,
    ) -> Result<Entry, EntryRepositoryError> {
        let mut entries = self.write_entries();
        let mut id = EntryId::random();
        while entries.contains_key(&id) {
            id = EntryId::random();
        }
        let entry = Entry::create(id, data, actor.clone(), self.clock.utc());
        entries.insert(id, entry.clone());
        Ok(entry)
    }

    async fn update_entry(
        &self,
        id: &EntryId,
        changes: EntryChanges,
        actor: &ActorId,
    ) -> Result<Option<Entry>, EntryRepositoryError> {
        let mut entries = self.write_entries();
        let Some(stored) = entries.get_mut(id) else {
            return Ok(None);
        };
        let mut updated = stored.clone();
        updated.apply_changes(changes, self.clock.utc());
        *stored = updated.clone();
        debug!(entry_id = %id, %actor, "entry updated");
        Ok(Some(updated))
    }

    async fn delete_entry(&self, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        Ok(self.write_entries().remove(id).is_some())
    }

    async fn count_entries(&self) -> Result<u64, EntryRepositoryError> {
        Ok(u64::try_from(self.read_entries().len()).unwrap_or(u64::MAX))
    }
}

#[async_trait]
impl UserRepository for MemoryStorage {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self.read_users().get(id).cloned())
    }

    async fn upsert_user(&self, profile: UserProfile) -> Result<User, UserRepositoryError> {
        let now = self.clock.utc();
        let mut users = self.write_users();
        let user = match users.get_mut(profile.id()) {
            Some(existing) => {
                existing.refresh(profile, now);
                existing.clone()
            }
            None => {
                let user = profile.into_user(now, now);
                users.insert(user.id.clone(), user.clone());
                user
            }
        };
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Category, EntryDraft, validate_new_entry};
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    struct SteppingClock {
        now: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
            let current = *now;
            *now = current + self.step;
            current
        }
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn storage() -> MemoryStorage {
        MemoryStorage::new(Arc::new(SteppingClock {
            now: Mutex::new(start()),
            step: Duration::seconds(1),
        }))
    }

    fn new_entry(title: &str) -> NewEntry {
        validate_new_entry(EntryDraft {
            title: Some(title.into()),
            category: Some("deity".into()),
            description: Some(format!("About {title}").into()),
            ..EntryDraft::default()
        })
        .expect("valid draft")
    }

    #[rstest]
    #[tokio::test]
    async fn create_stamps_clock_time(storage: MemoryStorage) {
        let entry = storage
            .create_entry(new_entry("Odin"), &ActorId::system())
            .await
            .expect("create");

        assert_eq!(entry.created_at, start());
        assert_eq!(entry.updated_at, start());
        assert_eq!(entry.category, Category::Deity);
    }

    #[rstest]
    #[tokio::test]
    async fn update_refreshes_updated_at_only(storage: MemoryStorage) {
        let actor = ActorId::system();
        let created = storage
            .create_entry(new_entry("Odin"), &actor)
            .await
            .expect("create");

        let updated = storage
            .update_entry(
                &created.id,
                EntryChanges {
                    title: Some("Wotan".to_owned()),
                    ..EntryChanges::default()
                },
                &actor,
            )
            .await
            .expect("update")
            .expect("entry exists");

        assert_eq!(updated.title, "Wotan");
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.updated_at, start() + Duration::seconds(1));
    }

    #[rstest]
    #[tokio::test]
    async fn upsert_user_keeps_created_at(storage: MemoryStorage) {
        let id = UserId::new("admin").expect("id");
        let first = storage
            .upsert_user(UserProfile::new(id.clone(), "Admin", None).expect("profile"))
            .await
            .expect("insert");
        let second = storage
            .upsert_user(
                UserProfile::new(id.clone(), "Allfather", Some("/odin.png".into()))
                    .expect("profile"),
            )
            .await
            .expect("update");

        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.avatar_url.as_deref(), Some("/odin.png"));
        assert_eq!(
            storage.get_user(&id).await.expect("get"),
            Some(second)
        );
    }
}
