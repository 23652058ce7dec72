//! Section editor state machine.
//!
//! One [`SectionEditor`] drives one section of the blueprint through
//! `Loading -> Viewing <-> Editing -> Saving -> {Viewing, Editing}`.
//!
//! ## Failure policy
//!
//! Neither load nor save failures escape the editor:
//!
//! - a failed or malformed load leaves the section empty and is logged at `warn`
//! - a failed save keeps the form open with the draft untouched, is logged at `error`, and is
//!   remembered in [`SectionEditor::last_error`] so the caller can tell the user
//!
//! ## Lifetime
//!
//! Editors share their page's [`Lifetime`]. Once it is closed, in-flight requests are abandoned
//! and their responses are never applied.

use crate::collaborator::BlueprintStore;
use crate::lifetime::Lifetime;
use crate::section::{SectionKey, SectionRecord, SectionSchema};
use crate::{BlueprintError, BlueprintResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorState {
    Loading,
    Viewing,
    Editing,
    Saving,
}

/// What a call to [`SectionEditor::load`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The section had stored content.
    Loaded,
    /// Nothing stored for the section.
    Empty,
    /// Fetch or parse failed; the section is shown as empty.
    Failed,
    /// The editor is mid-edit; loading would clobber the draft.
    Skipped,
    /// The page lifetime closed before the response arrived.
    Cancelled,
}

/// What a call to [`SectionEditor::save`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The draft is now the saved baseline.
    Saved,
    /// The collaborator rejected the save; the draft is retained for another attempt.
    Retained,
    /// Not editing, so there was nothing to save.
    Skipped,
    /// The page lifetime closed before the response arrived; the draft is retained.
    Cancelled,
}

/// Read-only view of an editor's saving flag.
///
/// `save` holds the editor mutably for the whole request, so a renderer that wants to disable
/// its save control meanwhile keeps one of these instead.
#[derive(Clone, Debug, Default)]
pub struct SaveIndicator(Arc<AtomicBool>);

impl SaveIndicator {
    pub fn is_saving(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, saving: bool) {
        self.0.store(saving, Ordering::Release);
    }
}

/// Load/edit/save controller for one blueprint section.
#[derive(Debug)]
pub struct SectionEditor<C> {
    collaborator: Arc<C>,
    lifetime: Lifetime,
    saving: SaveIndicator,
    state: EditorState,
    baseline: SectionRecord,
    draft: Option<SectionRecord>,
    last_error: Option<String>,
}

impl<C: BlueprintStore> SectionEditor<C> {
    /// Mount an editor for `key`. It starts in [`EditorState::Loading`] with empty fields.
    pub fn new(collaborator: Arc<C>, key: SectionKey, lifetime: Lifetime) -> Self {
        Self {
            collaborator,
            lifetime,
            saving: SaveIndicator::default(),
            state: EditorState::Loading,
            baseline: SectionRecord::empty(key),
            draft: None,
            last_error: None,
        }
    }

    pub fn key(&self) -> SectionKey {
        self.baseline.key()
    }

    pub fn schema(&self) -> &'static SectionSchema {
        self.baseline.schema()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// True while a save request is in flight. Only the `&mut` holder can ask this during a
    /// save; see [`SectionEditor::save_indicator`] for everyone else.
    pub fn is_saving(&self) -> bool {
        self.state == EditorState::Saving
    }

    /// A handle that reports the saving flag while [`SectionEditor::save`] is awaited.
    pub fn save_indicator(&self) -> SaveIndicator {
        self.saving.clone()
    }

    /// Message from the most recent failed save, cleared by a successful save or a cancel.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// The last loaded or saved values.
    pub fn baseline(&self) -> &SectionRecord {
        &self.baseline
    }

    /// The values currently on screen: the draft while editing, otherwise the baseline.
    pub fn record(&self) -> &SectionRecord {
        self.draft.as_ref().unwrap_or(&self.baseline)
    }

    pub fn is_empty(&self) -> bool {
        self.record().is_empty()
    }

    /// Fetch the blueprint and replace this section's values wholesale.
    ///
    /// Never fails: any transport or schema problem leaves the section empty.
    pub async fn load(&mut self) -> LoadOutcome {
        if matches!(self.state, EditorState::Editing | EditorState::Saving) {
            tracing::debug!("section {} is being edited; load skipped", self.key());
            return LoadOutcome::Skipped;
        }

        let key = self.key();
        let previous = self.state;
        self.state = EditorState::Loading;

        let collaborator = Arc::clone(&self.collaborator);
        let Some(fetched) = self.lifetime.run(collaborator.fetch_blueprint()).await else {
            tracing::debug!("section {} load abandoned", key);
            self.state = previous;
            return LoadOutcome::Cancelled;
        };

        let parsed = fetched.and_then(|doc| doc.section(key));
        let (record, outcome) = match parsed {
            Ok(record) if record.is_empty() => (record, LoadOutcome::Empty),
            Ok(record) => (record, LoadOutcome::Loaded),
            Err(e) => {
                tracing::warn!("failed to load section {}: {}", key, e);
                (SectionRecord::empty(key), LoadOutcome::Failed)
            }
        };

        self.baseline = record;
        self.state = EditorState::Viewing;
        outcome
    }

    /// Open the form with a draft copied from the baseline. Returns `false` unless viewing.
    pub fn edit(&mut self) -> bool {
        if self.state != EditorState::Viewing {
            return false;
        }
        self.draft = Some(self.baseline.clone());
        self.state = EditorState::Editing;
        true
    }

    /// Replace one draft field.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::NotEditing`] outside the editing state, or
    /// [`BlueprintError::UnknownField`] if `name` is not in this section's schema.
    pub fn update_field(&mut self, name: &str, value: impl Into<String>) -> BlueprintResult<()> {
        let key = self.key();
        match (&mut self.draft, self.state) {
            (Some(draft), EditorState::Editing) => draft.set(name, value),
            _ => Err(BlueprintError::NotEditing(key)),
        }
    }

    /// Submit the whole draft.
    ///
    /// On success the draft becomes the baseline and the editor returns to viewing. On failure
    /// the editor stays in editing with the draft intact.
    pub async fn save(&mut self) -> SaveOutcome {
        if self.state != EditorState::Editing {
            tracing::debug!("section {} not being edited; save skipped", self.key());
            return SaveOutcome::Skipped;
        }
        let Some(draft) = self.draft.clone() else {
            return SaveOutcome::Skipped;
        };

        let key = self.key();
        self.state = EditorState::Saving;
        self.saving.set(true);

        let collaborator = Arc::clone(&self.collaborator);
        let result = self
            .lifetime
            .run(collaborator.save_section(key, &draft))
            .await;
        self.saving.set(false);

        match result {
            None => {
                tracing::debug!("section {} save abandoned", key);
                self.state = EditorState::Editing;
                SaveOutcome::Cancelled
            }
            Some(Ok(())) => {
                tracing::info!("saved section {}", key);
                self.baseline = draft;
                self.draft = None;
                self.last_error = None;
                self.state = EditorState::Viewing;
                SaveOutcome::Saved
            }
            Some(Err(e)) => {
                tracing::error!("failed to save section {}: {}", key, e);
                self.last_error = Some(e.to_string());
                self.state = EditorState::Editing;
                SaveOutcome::Retained
            }
        }
    }

    /// Discard the draft and return to the baseline. Returns `false` unless editing.
    pub fn cancel(&mut self) -> bool {
        if self.state != EditorState::Editing {
            return false;
        }
        self.draft = None;
        self.last_error = None;
        self.state = EditorState::Viewing;
        true
    }
}
