//! Page composition.
//!
//! A page owns its editors and views outright; nothing is shared between pages. Dropping a page
//! closes its [`Lifetime`], which abandons any request still in flight.

use crate::collaborator::{BlueprintStore, MonitorStore, VaultStore};
use crate::editor::{LoadOutcome, SectionEditor};
use crate::lifetime::Lifetime;
use crate::list_section::{ListKind, ListSection};
use crate::monitor::{MonitorBoard, MonitorFilter, RedFlag};
use crate::section::SectionKey;
use crate::vault::{Comparison, MetricDelta, Photo};
use crate::view::ViewFilter;
use crate::BlueprintResult;
use futures::future::join_all;
use std::sync::Arc;

/// How many sections have content.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub complete: usize,
    pub total: usize,
}

impl Completion {
    /// Whole-number percentage, `0` for an empty page.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.complete * 100 / self.total) as u8
    }
}

// ============================================================================
// BLUEPRINT PAGE
// ============================================================================

/// The blueprint page: one editor per section plus the local list mini-sections.
pub struct BlueprintPage<C> {
    lifetime: Lifetime,
    editors: Vec<SectionEditor<C>>,
    lists: Vec<ListSection>,
}

impl<C: BlueprintStore> BlueprintPage<C> {
    /// Mount editors for every section and empty lists for every mini-section.
    pub fn mount(collaborator: Arc<C>) -> Self {
        Self::mount_with(collaborator, Lifetime::new())
    }

    /// Mount under a caller-supplied lifetime, so the caller can also abandon requests.
    pub fn mount_with(collaborator: Arc<C>, lifetime: Lifetime) -> Self {
        let editors = SectionKey::ALL
            .into_iter()
            .map(|key| SectionEditor::new(Arc::clone(&collaborator), key, lifetime.clone()))
            .collect();
        let lists = ListKind::ALL.into_iter().map(ListSection::new).collect();

        Self {
            lifetime,
            editors,
            lists,
        }
    }

    /// Load every section concurrently. Each editor issues its own fetch.
    pub async fn load_all(&mut self) -> Vec<(SectionKey, LoadOutcome)> {
        join_all(self.editors.iter_mut().map(|editor| async move {
            let outcome = editor.load().await;
            (editor.key(), outcome)
        }))
        .await
    }

    pub fn editors(&self) -> &[SectionEditor<C>] {
        &self.editors
    }

    pub fn editor(&self, key: SectionKey) -> Option<&SectionEditor<C>> {
        self.editors.iter().find(|e| e.key() == key)
    }

    pub fn editor_mut(&mut self, key: SectionKey) -> Option<&mut SectionEditor<C>> {
        self.editors.iter_mut().find(|e| e.key() == key)
    }

    pub fn lists(&self) -> &[ListSection] {
        &self.lists
    }

    pub fn list_mut(&mut self, kind: ListKind) -> Option<&mut ListSection> {
        self.lists.iter_mut().find(|l| l.kind() == kind)
    }

    /// Sections whose on-screen record has content.
    pub fn completion(&self) -> Completion {
        Completion {
            complete: self.editors.iter().filter(|e| !e.is_empty()).count(),
            total: self.editors.len(),
        }
    }

    /// Abandon in-flight requests. Also happens on drop.
    pub fn teardown(&self) {
        self.lifetime.close();
    }
}

impl<C> Drop for BlueprintPage<C> {
    fn drop(&mut self) {
        self.lifetime.close();
    }
}

// ============================================================================
// GALLERY PAGE
// ============================================================================

/// The before/after gallery over the vault's comparisons.
#[derive(Debug, Default)]
pub struct GalleryPage {
    comparisons: Vec<Comparison>,
    pub filter: ViewFilter,
}

impl GalleryPage {
    /// Fetch comparisons. A failed fetch yields an empty gallery.
    pub async fn load<V: VaultStore>(store: &V) -> Self {
        let comparisons = store.list_comparisons().await.unwrap_or_else(|e| {
            tracing::warn!("failed to load comparisons: {}", e);
            Vec::new()
        });
        Self {
            comparisons,
            filter: ViewFilter::default(),
        }
    }

    pub fn from_comparisons(comparisons: Vec<Comparison>) -> Self {
        Self {
            comparisons,
            filter: ViewFilter::default(),
        }
    }

    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// Visible comparisons with their positional metric deltas.
    pub fn visible(&self) -> Vec<(&Comparison, Vec<MetricDelta>)> {
        self.filter
            .apply(&self.comparisons)
            .into_iter()
            .map(|c| (c, c.metric_deltas()))
            .collect()
    }

    /// Pair two photos and append the result.
    ///
    /// # Errors
    ///
    /// Propagates the collaborator's error; the gallery is unchanged on failure.
    pub async fn create<V: VaultStore>(
        &mut self,
        store: &V,
        before_photo_id: &str,
        after_photo_id: &str,
    ) -> BlueprintResult<&Comparison> {
        let created = store.create_comparison(before_photo_id, after_photo_id).await?;
        self.comparisons.push(created);
        let index = self.comparisons.len() - 1;
        Ok(&self.comparisons[index])
    }

    /// Delete a comparison remotely, then drop it locally.
    ///
    /// # Errors
    ///
    /// Propagates the collaborator's error; the gallery is unchanged on failure.
    pub async fn remove<V: VaultStore>(&mut self, store: &V, id: &str) -> BlueprintResult<()> {
        store.delete_comparison(id).await?;
        self.comparisons.retain(|c| c.id != id);
        Ok(())
    }
}

/// Load the vault's photos, filtered. A failed fetch yields an empty list.
pub async fn load_photos<V: VaultStore>(store: &V, filter: &ViewFilter) -> Vec<Photo> {
    match store.list_photos().await {
        Ok(photos) => filter.apply(&photos).into_iter().cloned().collect(),
        Err(e) => {
            tracing::warn!("failed to load photos: {}", e);
            Vec::new()
        }
    }
}

// ============================================================================
// MONITOR PAGE
// ============================================================================

/// The red-flag monitor.
#[derive(Debug, Default)]
pub struct MonitorPage {
    pub board: MonitorBoard<RedFlag>,
    pub filter: MonitorFilter,
}

impl MonitorPage {
    /// Fetch red flags. A failed fetch yields an empty board.
    pub async fn load<M: MonitorStore>(store: &M) -> Self {
        let flags = store.list_red_flags().await.unwrap_or_else(|e| {
            tracing::warn!("failed to load red flags: {}", e);
            Vec::new()
        });
        Self {
            board: MonitorBoard::new(flags),
            filter: MonitorFilter::default(),
        }
    }

    pub fn visible(&self) -> Vec<&RedFlag> {
        self.board.visible(&self.filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{EditorState, SaveOutcome};
    use crate::memory::MemoryStore;
    use crate::monitor::{FlagStatus, Severity};
    use crate::section::SectionRecord;
    use crate::trend::Trend;
    use crate::vault::{MetricReading, Privacy};
    use serde_json::json;

    fn comparison(id: &str, category: &str) -> Comparison {
        Comparison {
            id: id.into(),
            title: format!("Entry {id}"),
            description: String::new(),
            category: category.into(),
            tags: vec![],
            privacy: Privacy::Private,
            before_photo_id: "b".into(),
            after_photo_id: "a".into(),
            before_metrics: vec![MetricReading {
                name: "Weight".into(),
                value: Some(100.0),
                unit: "kg".into(),
                date: None,
            }],
            after_metrics: vec![MetricReading {
                name: "Weight".into(),
                value: Some(120.0),
                unit: "kg".into(),
                date: None,
            }],
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn blueprint_page_loads_every_section_and_reports_completion() {
        let store = Arc::new(
            MemoryStore::new()
                .with_section(
                    &SectionRecord::from_pairs(SectionKey::IdentityContext, [("name", "Alex")])
                        .unwrap(),
                )
                .with_raw_section(SectionKey::Timeline, json!(42)),
        );
        let mut page = BlueprintPage::mount(Arc::clone(&store));

        let outcomes = page.load_all().await;
        assert_eq!(outcomes.len(), SectionKey::ALL.len());
        assert!(outcomes.contains(&(SectionKey::IdentityContext, LoadOutcome::Loaded)));
        assert!(outcomes.contains(&(SectionKey::Timeline, LoadOutcome::Failed)));
        assert!(outcomes.contains(&(SectionKey::Treatments, LoadOutcome::Empty)));
        assert!(page
            .editors()
            .iter()
            .all(|e| e.state() == EditorState::Viewing));

        assert_eq!(
            page.completion(),
            Completion {
                complete: 1,
                total: 7
            }
        );
        assert_eq!(page.completion().percent(), 14);

        let editor = page.editor_mut(SectionKey::Documents).unwrap();
        editor.edit();
        editor.update_field("insurance", "Bupa").unwrap();
        assert_eq!(editor.save().await, SaveOutcome::Saved);
        assert_eq!(page.completion().complete, 2);
    }

    #[tokio::test]
    async fn list_sections_stay_local() {
        let store = Arc::new(MemoryStore::new());
        let mut page = BlueprintPage::mount(Arc::clone(&store));

        let allergies = page.list_mut(ListKind::Allergies).unwrap();
        allergies.add("Latex");
        allergies.add("Latex");
        assert_eq!(page.lists()[0].len(), 2);
        assert_eq!(store.save_attempts(), 0);
    }

    #[tokio::test]
    async fn teardown_abandons_later_loads() {
        let store = Arc::new(MemoryStore::new());
        let mut page = BlueprintPage::mount(store);
        page.teardown();

        let outcomes = page.load_all().await;
        assert!(outcomes
            .iter()
            .all(|(_, outcome)| *outcome == LoadOutcome::Cancelled));
    }

    #[tokio::test]
    async fn gallery_filters_medical_entries_in_order() {
        let store = MemoryStore::new().with_comparisons(vec![
            comparison("1", "physical"),
            comparison("2", "mental"),
            comparison("3", "medical"),
            comparison("4", "medical"),
            comparison("5", "wellness"),
        ]);

        let mut gallery = GalleryPage::load(&store).await;
        gallery.filter.set_category("medical");
        let visible = gallery.visible();

        let ids: Vec<&str> = visible.iter().map(|(c, _)| c.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4"]);
        assert_eq!(visible[0].1[0].delta.change, 20.0);
        assert_eq!(visible[0].1[0].delta.trend, Trend::Improving);
    }

    #[tokio::test]
    async fn gallery_create_and_remove_round_trip_through_store() {
        let photo = |id: &str| Photo {
            id: id.into(),
            title: format!("Photo {id}"),
            description: String::new(),
            category: "wellness".into(),
            tags: vec![],
            url: String::new(),
            taken_at: None,
        };
        let store = MemoryStore::new().with_photos(vec![photo("p1"), photo("p2")]);

        let mut gallery = GalleryPage::load(&store).await;
        let id = gallery.create(&store, "p1", "p2").await.unwrap().id.clone();
        assert_eq!(gallery.comparisons().len(), 1);

        assert!(gallery.create(&store, "p1", "p9").await.is_err());
        assert_eq!(gallery.comparisons().len(), 1);

        gallery.remove(&store, &id).await.unwrap();
        assert!(gallery.comparisons().is_empty());

        let photos = load_photos(&store, &ViewFilter::new("all", "p2")).await;
        assert_eq!(photos.len(), 1);
        assert_eq!(photos[0].id, "p2");
    }

    #[tokio::test]
    async fn monitor_page_filters_local_triage() {
        let flags: Vec<RedFlag> = serde_json::from_value(json!([
            { "id": "f1", "title": "BP trending up", "category": "cardiovascular", "severity": "high" },
            { "id": "f2", "title": "Low mood", "category": "mental", "severity": "medium" }
        ]))
        .unwrap();
        let store = MemoryStore::new().with_red_flags(flags);

        let mut page = MonitorPage::load(&store).await;
        page.board.dismiss("f1");
        page.filter.status = Some(FlagStatus::Active);
        let visible: Vec<&str> = page.visible().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(visible, vec!["f2"]);

        page.filter.status = None;
        page.filter.min_severity = Some(Severity::High);
        assert_eq!(page.visible().len(), 1);
        assert_eq!(
            store.list_red_flags().await.unwrap()[0].status,
            FlagStatus::Active
        );
    }
}
