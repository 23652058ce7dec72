//! # API Client
//!
//! HTTP collaborator for Blueprint.
//!
//! Handles:
//! - JSON request/response envelopes for the blueprint, vault and monitor endpoints
//! - mapping transport failures and HTTP statuses onto `BlueprintError`
//! - schema-path reporting for malformed responses
//!
//! Section editors and pages in `blueprint-core` are generic over the collaborator traits, so
//! they run unchanged on top of [`HttpCollaborator`].

#![warn(rust_2018_idioms)]

mod client;
mod wire;

pub use client::HttpCollaborator;
