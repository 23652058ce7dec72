//! In-process collaborator.
//!
//! `MemoryStore` implements every collaborator trait over a mutex-guarded document. It backs the
//! CLI's offline mode and the tests. Failures can be injected to exercise the editor's
//! recovery paths.

use crate::collaborator::{BlueprintDocument, BlueprintStore, MonitorStore, VaultStore};
use crate::monitor::RedFlag;
use crate::section::{SectionKey, SectionRecord};
use crate::vault::{Comparison, Photo};
use crate::{BlueprintError, BlueprintResult};
use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Inner {
    blueprint: Map<String, Value>,
    photos: Vec<Photo>,
    comparisons: Vec<Comparison>,
    red_flags: Vec<RedFlag>,
    failing_loads: bool,
    failing_saves: usize,
    save_attempts: usize,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed one section with a raw JSON value.
    pub fn with_raw_section(self, key: SectionKey, value: Value) -> Self {
        self.lock().blueprint.insert(key.to_wire().to_string(), value);
        self
    }

    /// Seed one section from a record.
    pub fn with_section(self, record: &SectionRecord) -> Self {
        let key = record.key();
        self.with_raw_section(key, Value::Object(record.to_wire()))
    }

    pub fn with_photos(self, photos: Vec<Photo>) -> Self {
        self.lock().photos = photos;
        self
    }

    pub fn with_comparisons(self, comparisons: Vec<Comparison>) -> Self {
        self.lock().comparisons = comparisons;
        self
    }

    pub fn with_red_flags(self, red_flags: Vec<RedFlag>) -> Self {
        self.lock().red_flags = red_flags;
        self
    }

    /// Make every blueprint fetch fail until turned off.
    pub fn set_failing_loads(&self, failing: bool) {
        self.lock().failing_loads = failing;
    }

    /// Fail the next `count` section saves with a 500 status.
    pub fn fail_next_saves(&self, count: usize) {
        self.lock().failing_saves = count;
    }

    /// Number of section saves attempted, failed ones included.
    pub fn save_attempts(&self) -> usize {
        self.lock().save_attempts
    }

    /// The stored value of a section, if it has ever been written.
    pub fn stored_section(&self, key: SectionKey) -> Option<Value> {
        self.lock().blueprint.get(key.to_wire()).cloned()
    }
}

impl BlueprintStore for MemoryStore {
    async fn fetch_blueprint(&self) -> BlueprintResult<BlueprintDocument> {
        let inner = self.lock();
        if inner.failing_loads {
            return Err(BlueprintError::Transport("blueprint store unavailable".into()));
        }
        Ok(BlueprintDocument::new(Value::Object(inner.blueprint.clone())))
    }

    async fn save_section(&self, key: SectionKey, record: &SectionRecord) -> BlueprintResult<()> {
        let mut inner = self.lock();
        inner.save_attempts += 1;
        if inner.failing_saves > 0 {
            inner.failing_saves -= 1;
            return Err(BlueprintError::Status { status: 500 });
        }
        inner
            .blueprint
            .insert(key.to_wire().to_string(), Value::Object(record.to_wire()));
        Ok(())
    }
}

impl VaultStore for MemoryStore {
    async fn list_photos(&self) -> BlueprintResult<Vec<Photo>> {
        Ok(self.lock().photos.clone())
    }

    async fn list_comparisons(&self) -> BlueprintResult<Vec<Comparison>> {
        Ok(self.lock().comparisons.clone())
    }

    async fn create_comparison(
        &self,
        before_photo_id: &str,
        after_photo_id: &str,
    ) -> BlueprintResult<Comparison> {
        let mut inner = self.lock();
        let find = |id: &str| {
            inner
                .photos
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or_else(|| BlueprintError::NotFound(format!("photo {id}")))
        };
        let before = find(before_photo_id)?;
        let after = find(after_photo_id)?;

        let now = Utc::now();
        let comparison = Comparison {
            id: Uuid::new_v4().simple().to_string(),
            title: format!("{} vs {}", before.title, after.title),
            description: String::new(),
            category: before.category.clone(),
            tags: before.tags.clone(),
            privacy: Default::default(),
            before_photo_id: before.id,
            after_photo_id: after.id,
            before_metrics: vec![],
            after_metrics: vec![],
            created_at: Some(now),
            updated_at: Some(now),
        };
        inner.comparisons.push(comparison.clone());
        Ok(comparison)
    }

    async fn delete_comparison(&self, id: &str) -> BlueprintResult<()> {
        let mut inner = self.lock();
        let before = inner.comparisons.len();
        inner.comparisons.retain(|c| c.id != id);
        if inner.comparisons.len() == before {
            return Err(BlueprintError::NotFound(format!("comparison {id}")));
        }
        Ok(())
    }
}

impl MonitorStore for MemoryStore {
    async fn list_red_flags(&self) -> BlueprintResult<Vec<RedFlag>> {
        Ok(self.lock().red_flags.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photo(id: &str, title: &str, category: &str) -> Photo {
        Photo {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category: category.into(),
            tags: vec!["knee".into()],
            url: format!("/photos/{id}.jpg"),
            taken_at: None,
        }
    }

    #[tokio::test]
    async fn saved_sections_are_visible_to_later_fetches() {
        let store = MemoryStore::new();
        let record =
            SectionRecord::from_pairs(SectionKey::Documents, [("insurance", "Bupa 1234")]).unwrap();

        store.save_section(SectionKey::Documents, &record).await.unwrap();

        let doc = store.fetch_blueprint().await.unwrap();
        assert_eq!(doc.section(SectionKey::Documents).unwrap(), record);
        assert_eq!(store.save_attempts(), 1);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_in_order() {
        let store = MemoryStore::new();
        let record = SectionRecord::empty(SectionKey::Timeline);
        store.fail_next_saves(1);

        let err = store
            .save_section(SectionKey::Timeline, &record)
            .await
            .expect_err("first save fails");
        assert!(matches!(err, BlueprintError::Status { status: 500 }));
        assert!(store.stored_section(SectionKey::Timeline).is_none());

        store.save_section(SectionKey::Timeline, &record).await.unwrap();
        assert!(store.stored_section(SectionKey::Timeline).is_some());
        assert_eq!(store.save_attempts(), 2);

        store.set_failing_loads(true);
        assert!(store.fetch_blueprint().await.is_err());
    }

    #[tokio::test]
    async fn comparisons_can_be_created_and_deleted() {
        let store = MemoryStore::new().with_photos(vec![
            photo("p1", "Week 1", "physical"),
            photo("p2", "Week 12", "physical"),
        ]);

        let created = store.create_comparison("p1", "p2").await.unwrap();
        assert_eq!(created.title, "Week 1 vs Week 12");
        assert_eq!(created.category, "physical");
        assert_eq!(store.list_comparisons().await.unwrap().len(), 1);

        let err = store.create_comparison("p1", "nope").await.expect_err("missing photo");
        assert!(matches!(err, BlueprintError::NotFound(_)));

        store.delete_comparison(&created.id).await.unwrap();
        assert!(store.list_comparisons().await.unwrap().is_empty());
        assert!(matches!(
            store.delete_comparison(&created.id).await,
            Err(BlueprintError::NotFound(_))
        ));
    }
}
