//! Care providers listed by the appointment coordination view.
//!
//! Library-only: the collaborator contract has no provider endpoint, so pages and the CLI never
//! load these. They share the category and search filters with the vault and monitor entities.

use crate::view::{Faceted, Searchable};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    pub id: String,
    pub name: String,
    pub specialty: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub notes: String,
}

impl Faceted for Provider {
    fn facet(&self) -> &str {
        &self.specialty
    }
}

impl Searchable for Provider {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.specialty.as_str(),
            self.location.as_str(),
            self.notes.as_str(),
        ]
    }
}
