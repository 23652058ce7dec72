//! # Blueprint Core
//!
//! Client-side logic for the personal health blueprint:
//!
//! - [`editor::SectionEditor`]: the load / edit / save / reconcile state machine for one section
//! - [`view`]: category filtering and search over in-memory collections
//! - [`trend`]: before/after deltas and trend classification
//! - [`page`]: composition of editors and views into pages
//!
//! **No transport concerns**: data comes through the [`collaborator`] traits. The HTTP
//! implementation lives in `blueprint-api-client`; [`memory::MemoryStore`] is the in-process one.

pub mod collaborator;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod lifetime;
pub mod list_section;
pub mod memory;
pub mod monitor;
pub mod page;
pub mod providers;
pub mod section;
pub mod trend;
pub mod vault;
pub mod view;

pub use blueprint_types::{NonEmptyText, SearchText, TextError};
pub use collaborator::{BlueprintDocument, BlueprintStore, MonitorStore, VaultStore};
pub use config::ClientConfig;
pub use editor::{EditorState, LoadOutcome, SaveIndicator, SaveOutcome, SectionEditor};
pub use error::{BlueprintError, BlueprintResult};
pub use lifetime::Lifetime;
pub use list_section::{ListKind, ListSection};
pub use memory::MemoryStore;
pub use page::{load_photos, BlueprintPage, Completion, GalleryPage, MonitorPage};
pub use section::{FieldSpec, SectionKey, SectionRecord, SectionSchema};
pub use trend::{compute_delta, Delta, Polarity, Trend};
pub use view::{filter_by_category, filter_by_search, CategoryFilter, Faceted, Searchable, ViewFilter};
