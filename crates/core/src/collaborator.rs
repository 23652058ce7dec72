//! The data collaborator boundary.
//!
//! Editors and pages never talk to a transport directly. They are handed an implementation of
//! these traits: [`crate::memory::MemoryStore`] in-process, or the HTTP collaborator from the
//! `blueprint-api-client` crate.

use crate::monitor::RedFlag;
use crate::section::{SectionKey, SectionRecord};
use crate::vault::{Comparison, Photo};
use crate::BlueprintResult;
use serde_json::Value;
use std::future::Future;

/// The parent blueprint document as returned by the collaborator.
///
/// The document is untrusted: it is kept as raw JSON and narrowed one section at a time so a
/// malformed section cannot affect its neighbours.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlueprintDocument(Value);

impl BlueprintDocument {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// Narrow the sub-object for `key` into a record.
    ///
    /// An absent key, or a document that is `null`, yields an empty record.
    ///
    /// # Errors
    ///
    /// Returns [`crate::BlueprintError::Schema`] if the document is not an object or the
    /// section is not a flat map of strings.
    pub fn section(&self, key: SectionKey) -> BlueprintResult<SectionRecord> {
        match &self.0 {
            Value::Null => Ok(SectionRecord::empty(key)),
            Value::Object(map) => SectionRecord::from_wire(key, map.get(key.to_wire())),
            other => Err(crate::BlueprintError::Schema(format!(
                "blueprint document must be an object, got {}",
                json_kind(other)
            ))),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read and write access to the blueprint document.
pub trait BlueprintStore: Send + Sync {
    /// Fetch the whole blueprint document.
    fn fetch_blueprint(&self) -> impl Future<Output = BlueprintResult<BlueprintDocument>> + Send;

    /// Overwrite one section with `record`. Unconditional: the last write wins.
    fn save_section(
        &self,
        key: SectionKey,
        record: &SectionRecord,
    ) -> impl Future<Output = BlueprintResult<()>> + Send;
}

/// Photo vault access.
pub trait VaultStore: Send + Sync {
    fn list_photos(&self) -> impl Future<Output = BlueprintResult<Vec<Photo>>> + Send;

    fn list_comparisons(&self) -> impl Future<Output = BlueprintResult<Vec<Comparison>>> + Send;

    fn create_comparison(
        &self,
        before_photo_id: &str,
        after_photo_id: &str,
    ) -> impl Future<Output = BlueprintResult<Comparison>> + Send;

    fn delete_comparison(&self, id: &str) -> impl Future<Output = BlueprintResult<()>> + Send;
}

/// Red-flag monitor feed.
pub trait MonitorStore: Send + Sync {
    fn list_red_flags(&self) -> impl Future<Output = BlueprintResult<Vec<RedFlag>>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlueprintError;
    use serde_json::json;

    #[test]
    fn sections_are_narrowed_independently() {
        let doc = BlueprintDocument::new(json!({
            "identityContext": { "name": "Alex" },
            "treatments": { "surgeries": 3 }
        }));

        let identity = doc.section(SectionKey::IdentityContext).expect("identity parses");
        assert_eq!(identity.get("name"), "Alex");

        assert!(matches!(
            doc.section(SectionKey::Treatments),
            Err(BlueprintError::Schema(_))
        ));

        let timeline = doc.section(SectionKey::Timeline).expect("absent section");
        assert!(timeline.is_empty());
    }

    #[test]
    fn non_object_document_is_rejected() {
        let doc = BlueprintDocument::new(json!(["identityContext"]));
        let err = doc.section(SectionKey::IdentityContext).expect_err("array document");
        assert!(matches!(err, BlueprintError::Schema(msg) if msg.contains("an array")));

        let empty = BlueprintDocument::default();
        assert!(empty.section(SectionKey::Documents).unwrap().is_empty());
    }
}
