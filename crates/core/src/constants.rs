//! Constants used throughout the Blueprint core crate.
//!
//! Endpoint paths and defaults live here so the HTTP collaborator, the in-memory collaborator
//! and the CLI agree on them.

/// Default API base URL when no explicit URL is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Sentinel category id that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Path of the parent blueprint document.
pub const BLUEPRINT_PATH: &str = "/blueprint";

/// Path prefix for per-section writes (`/blueprint/sections/{sectionKey}`).
pub const BLUEPRINT_SECTIONS_PATH: &str = "/blueprint/sections";

/// Path of the vault photo listing.
pub const VAULT_PHOTOS_PATH: &str = "/vault/photos";

/// Path of the before/after comparison collection.
pub const VAULT_COMPARISONS_PATH: &str = "/vault/before-after";

/// Path of the red-flag monitor feed.
pub const MONITOR_RED_FLAGS_PATH: &str = "/monitor/red-flags";
