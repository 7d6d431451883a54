use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::{ContentCatalog, ProgressStore, StoreError};
use crate::domain::{ContentKind, ContentProgress, ProgressPatch};

type PairKey = (ContentKind, Uuid, Uuid);

/// In-process store keyed the same way as the unique index of the SQL tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<PairKey, ContentProgress>>,
    content: Mutex<HashSet<(ContentKind, Uuid)>>,
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    m.lock()
        .map_err(|_| StoreError::Backend("memory store lock poisoned".into()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a content item so the catalog reports it as existing.
    pub fn add_content(&self, kind: ContentKind, content_id: Uuid) -> Result<(), StoreError> {
        lock(&self.content)?.insert((kind, content_id));
        Ok(())
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.records)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

#[async_trait::async_trait]
impl ProgressStore for MemoryStore {
    async fn find(
        &self,
        kind: ContentKind,
        user_id: Uuid,
        content_id: Uuid,
    ) -> Result<Option<ContentProgress>, StoreError> {
        Ok(lock(&self.records)?.get(&(kind, user_id, content_id)).cloned())
    }

    async fn insert(&self, record: &ContentProgress) -> Result<(), StoreError> {
        let mut records = lock(&self.records)?;
        let key = (record.kind, record.user_id, record.content_id);
        if records.contains_key(&key) {
            return Err(StoreError::DuplicateKey);
        }
        records.insert(key, record.clone());
        Ok(())
    }

    async fn update(
        &self,
        record: &ContentProgress,
        patch: &ProgressPatch,
    ) -> Result<(), StoreError> {
        let mut records = lock(&self.records)?;
        let existing = match records.get_mut(&(record.kind, record.user_id, record.content_id)) {
            Some(existing) if existing.id == record.id => existing,
            _ => return Err(StoreError::NotFound),
        };
        if let ProgressPatch::Status { from, .. } = patch {
            if existing.status != *from {
                return Err(StoreError::Stale);
            }
        }
        patch.apply_to(existing);
        existing.updated_at = record.updated_at;
        Ok(())
    }

    async fn ratings(&self, kind: ContentKind, content_id: Uuid) -> Result<Vec<f64>, StoreError> {
        Ok(lock(&self.records)?
            .values()
            .filter(|r| r.kind == kind && r.content_id == content_id)
            .filter_map(|r| r.rating)
            .collect())
    }

    async fn list_for_user(
        &self,
        kind: ContentKind,
        user_id: Uuid,
    ) -> Result<Vec<ContentProgress>, StoreError> {
        let mut rows: Vec<ContentProgress> = lock(&self.records)?
            .values()
            .filter(|r| r.kind == kind && r.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(rows)
    }
}

#[async_trait::async_trait]
impl ContentCatalog for MemoryStore {
    async fn exists(&self, kind: ContentKind, content_id: Uuid) -> Result<bool, StoreError> {
        Ok(lock(&self.content)?.contains(&(kind, content_id)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::ProgressStatus;

    #[tokio::test]
    async fn second_insert_for_the_same_pair_is_a_duplicate() {
        let store = MemoryStore::new();
        let (user, lesson) = (Uuid::new_v4(), Uuid::new_v4());
        let first = ContentProgress::create(ContentKind::Lesson, user, lesson, Utc::now());
        store.insert(&first).await.expect("first insert");

        let second = ContentProgress::create(ContentKind::Lesson, user, lesson, Utc::now());
        assert!(matches!(store.insert(&second).await, Err(StoreError::DuplicateKey)));

        // same ids under another kind live in another table
        let program = ContentProgress::create(ContentKind::Program, user, lesson, Utc::now());
        store.insert(&program).await.expect("other kind");
        assert_eq!(store.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn update_of_unknown_record_is_not_found() {
        let store = MemoryStore::new();
        let record = ContentProgress::create(
            ContentKind::Practice,
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now(),
        );
        let patch = ProgressPatch::ResumePosition(5);
        assert!(matches!(store.update(&record, &patch).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn update_writes_only_the_patched_fields() {
        let store = MemoryStore::new();
        let mut stored =
            ContentProgress::create(ContentKind::Lesson, Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        stored.rating = Some(3.0);
        stored.status = ProgressStatus::Completed;
        store.insert(&stored).await.unwrap();

        // an older copy of the row that never saw the rating or the completion
        let mut stale = stored.clone();
        stale.rating = None;
        stale.status = ProgressStatus::Started;
        store
            .update(&stale, &ProgressPatch::ResumePosition(240))
            .await
            .expect("position update");

        let row = store
            .find(ContentKind::Lesson, stored.user_id, stored.content_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.resume_position, Some(240));
        assert_eq!(row.rating, Some(3.0));
        assert_eq!(row.status, ProgressStatus::Completed);
    }

    #[tokio::test]
    async fn status_patch_requires_the_expected_current_status() {
        let store = MemoryStore::new();
        let mut stored =
            ContentProgress::create(ContentKind::Program, Uuid::new_v4(), Uuid::new_v4(), Utc::now());
        stored.status = ProgressStatus::Completed;
        store.insert(&stored).await.unwrap();

        let patch = ProgressPatch::Status {
            from: ProgressStatus::Started,
            to: ProgressStatus::InProgress,
        };
        assert!(matches!(store.update(&stored, &patch).await, Err(StoreError::Stale)));
    }

    #[tokio::test]
    async fn catalog_knows_registered_content_only() {
        let store = MemoryStore::new();
        let shorts = Uuid::new_v4();
        store.add_content(ContentKind::Shorts, shorts).unwrap();
        assert!(store.exists(ContentKind::Shorts, shorts).await.unwrap());
        assert!(!store.exists(ContentKind::Lesson, shorts).await.unwrap());
    }
}
