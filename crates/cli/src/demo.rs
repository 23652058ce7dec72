//! Seed data for `--offline` runs.

use blueprint_core::monitor::RedFlag;
use blueprint_core::vault::{Comparison, Photo};
use blueprint_core::{MemoryStore, SectionKey};
use serde_json::json;

/// An in-process store with a partially filled blueprint, a small vault and a few red flags.
pub fn offline_store() -> anyhow::Result<MemoryStore> {
    let photos: Vec<Photo> = serde_json::from_value(json!([
        { "id": "p1", "title": "January front", "category": "physical", "tags": ["progress"] },
        { "id": "p2", "title": "June front", "category": "physical", "tags": ["progress"] },
        { "id": "p3", "title": "Rash on forearm", "category": "medical", "tags": ["skin"] },
        { "id": "p4", "title": "Forearm after treatment", "category": "medical", "tags": ["skin"] }
    ]))?;

    let comparisons: Vec<Comparison> = serde_json::from_value(json!([
        {
            "id": "c1",
            "title": "Weight journey",
            "description": "Six months of training",
            "category": "physical",
            "tags": ["fitness"],
            "beforePhotoId": "p1",
            "afterPhotoId": "p2",
            "beforeMetrics": [
                { "name": "Weight", "value": 92, "unit": "kg" },
                { "name": "Resting heart rate", "value": 74, "unit": "bpm" }
            ],
            "afterMetrics": [
                { "name": "Weight", "value": 84.5, "unit": "kg" },
                { "name": "Resting heart rate", "value": 62, "unit": "bpm" }
            ]
        },
        {
            "id": "c2",
            "title": "Eczema flare",
            "category": "medical",
            "privacy": "shared",
            "beforePhotoId": "p3",
            "afterPhotoId": "p4",
            "beforeMetrics": [{ "name": "Itch score", "value": 8 }],
            "afterMetrics": [{ "name": "Itch score", "value": 2 }]
        }
    ]))?;

    let red_flags: Vec<RedFlag> = serde_json::from_value(json!([
        {
            "id": "f1",
            "title": "Rising blood pressure",
            "description": "Three readings above 140/90 in two weeks",
            "category": "cardiovascular",
            "severity": "high",
            "confidence": 0.82,
            "triggers": ["bp-readings"],
            "recommendedActions": ["Book a GP appointment", "Log readings daily"]
        },
        {
            "id": "f2",
            "title": "Short sleep",
            "category": "lifestyle",
            "severity": "low",
            "confidence": 0.6,
            "recommendedActions": ["Keep a sleep diary"]
        }
    ]))?;

    Ok(MemoryStore::new()
        .with_raw_section(
            SectionKey::IdentityContext,
            json!({ "name": "Alex Morgan", "pronouns": "they/them", "bloodType": "O+" }),
        )
        .with_raw_section(
            SectionKey::Treatments,
            json!({ "surgeries": "Appendectomy (2015)" }),
        )
        .with_photos(photos)
        .with_comparisons(comparisons)
        .with_red_flags(red_flags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_core::{BlueprintStore, MonitorStore, VaultStore};

    #[tokio::test]
    async fn seed_data_decodes_and_serves() {
        let store = offline_store().expect("seed data");

        let doc = store.fetch_blueprint().await.expect("blueprint");
        let identity = doc.section(SectionKey::IdentityContext).expect("identity");
        assert_eq!(identity.get("name"), "Alex Morgan");

        assert_eq!(store.list_photos().await.expect("photos").len(), 4);
        let comparisons = store.list_comparisons().await.expect("comparisons");
        assert_eq!(comparisons[0].metric_deltas().len(), 2);
        assert_eq!(store.list_red_flags().await.expect("flags").len(), 2);
    }
}
