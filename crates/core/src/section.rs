//! Blueprint sections and their field schemas.
//!
//! A blueprint is one document keyed by section. Every section is a flat map of field name to
//! string value. This module defines:
//!
//! - [`SectionKey`]: the closed set of sections and their wire names
//! - [`SectionSchema`]: the fields, labels and empty-state prompt for one section
//! - [`SectionRecord`]: the field values for one section, restricted to its schema
//!
//! Records arriving from the collaborator are untrusted. [`SectionRecord::from_wire`] narrows a
//! raw JSON value into a record and reports the failing path when the shape is wrong.

use crate::{BlueprintError, BlueprintResult};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// SECTION KEYS
// ============================================================================

/// One independently editable block of the blueprint document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKey {
    IdentityContext,
    HealthFoundations,
    Treatments,
    Timeline,
    Documents,
    Providers,
    Preparation,
}

impl SectionKey {
    /// Every section, in page order.
    pub const ALL: [SectionKey; 7] = [
        SectionKey::IdentityContext,
        SectionKey::HealthFoundations,
        SectionKey::Treatments,
        SectionKey::Timeline,
        SectionKey::Documents,
        SectionKey::Providers,
        SectionKey::Preparation,
    ];

    /// Key used in the blueprint document and in the section endpoint path.
    pub fn to_wire(self) -> &'static str {
        match self {
            SectionKey::IdentityContext => "identityContext",
            SectionKey::HealthFoundations => "healthFoundations",
            SectionKey::Treatments => "treatments",
            SectionKey::Timeline => "timeline",
            SectionKey::Documents => "documents",
            SectionKey::Providers => "providers",
            SectionKey::Preparation => "preparation",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.to_wire() == s)
    }

    pub fn schema(self) -> &'static SectionSchema {
        match self {
            SectionKey::IdentityContext => &IDENTITY_CONTEXT,
            SectionKey::HealthFoundations => &HEALTH_FOUNDATIONS,
            SectionKey::Treatments => &TREATMENTS,
            SectionKey::Timeline => &TIMELINE,
            SectionKey::Documents => &DOCUMENTS,
            SectionKey::Providers => &PROVIDERS,
            SectionKey::Preparation => &PREPARATION,
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_wire())
    }
}

impl FromStr for SectionKey {
    type Err = BlueprintError;

    /// Accepts the wire name (`identityContext`), kebab/snake case (`identity-context`), or
    /// the short forms `identity` and `foundations`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "identity" => return Ok(SectionKey::IdentityContext),
            "foundations" => return Ok(SectionKey::HealthFoundations),
            _ => {}
        }

        Self::ALL
            .into_iter()
            .find(|key| key.to_wire().to_lowercase() == folded)
            .ok_or_else(|| BlueprintError::UnknownSection(s.to_string()))
    }
}

// ============================================================================
// SCHEMAS
// ============================================================================

/// A single editable field in a section.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name of the field.
    pub name: &'static str,
    /// Human label used in summaries and forms.
    pub label: &'static str,
}

/// Field layout and presentation text for one section.
#[derive(Debug, PartialEq, Eq)]
pub struct SectionSchema {
    pub key: SectionKey,
    pub title: &'static str,
    /// Prompt shown while the section has no content.
    pub placeholder: &'static str,
    pub fields: &'static [FieldSpec],
}

impl SectionSchema {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

const fn field(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { name, label }
}

static IDENTITY_CONTEXT: SectionSchema = SectionSchema {
    key: SectionKey::IdentityContext,
    title: "Identity",
    placeholder: "Add your name, DOB, and emergency contact",
    fields: &[
        field("name", "Name"),
        field("dateOfBirth", "Date of birth"),
        field("gender", "Gender"),
        field("pronouns", "Pronouns"),
        field("bloodType", "Blood type"),
        field("emergencyContact", "Emergency contact"),
    ],
};

static HEALTH_FOUNDATIONS: SectionSchema = SectionSchema {
    key: SectionKey::HealthFoundations,
    title: "Health Foundations",
    placeholder: "Add your height, weight, activity, diet, and sleep habits",
    fields: &[
        field("height", "Height"),
        field("weight", "Weight"),
        field("activityLevel", "Activity level"),
        field("diet", "Diet"),
        field("sleep", "Sleep"),
        field("stressLevel", "Stress level"),
    ],
};

static TREATMENTS: SectionSchema = SectionSchema {
    key: SectionKey::Treatments,
    title: "Treatments",
    placeholder: "Add surgeries, procedures, therapies, and hospital stays",
    fields: &[
        field("surgeries", "Surgeries"),
        field("procedures", "Procedures"),
        field("therapies", "Therapies"),
        field("hospitalizations", "Hospitalizations"),
    ],
};

static TIMELINE: SectionSchema = SectionSchema {
    key: SectionKey::Timeline,
    title: "Health Timeline",
    placeholder: "Add major health events, diagnoses, and milestones",
    fields: &[
        field("majorEvents", "Major events"),
        field("diagnoses", "Diagnoses"),
        field("milestones", "Milestones"),
    ],
};

static DOCUMENTS: SectionSchema = SectionSchema {
    key: SectionKey::Documents,
    title: "Documents",
    placeholder: "Add insurance details, advance directives, and record locations",
    fields: &[
        field("insurance", "Insurance"),
        field("advanceDirective", "Advance directive"),
        field("records", "Medical records"),
    ],
};

static PROVIDERS: SectionSchema = SectionSchema {
    key: SectionKey::Providers,
    title: "Care Team",
    placeholder: "Add your primary care doctor, specialists, dentist, and pharmacy",
    fields: &[
        field("primaryCare", "Primary care"),
        field("specialists", "Specialists"),
        field("dentist", "Dentist"),
        field("pharmacy", "Pharmacy"),
    ],
};

static PREPARATION: SectionSchema = SectionSchema {
    key: SectionKey::Preparation,
    title: "Appointment Preparation",
    placeholder: "Add questions, symptoms, and goals for your next visit",
    fields: &[
        field("questions", "Questions"),
        field("symptoms", "Symptoms"),
        field("goals", "Goals"),
    ],
};

// ============================================================================
// SECTION RECORD
// ============================================================================

/// Field values for one section.
///
/// Only fields named by the section's schema can be stored. Absent fields read as the empty
/// string, and equality follows [`SectionRecord::get`], so an absent field equals a blank one.
#[derive(Clone, Debug)]
pub struct SectionRecord {
    key: SectionKey,
    values: BTreeMap<&'static str, String>,
}

impl PartialEq for SectionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
            && self
                .schema()
                .fields
                .iter()
                .all(|spec| self.get(spec.name) == other.get(spec.name))
    }
}

impl Eq for SectionRecord {}

impl SectionRecord {
    /// A record with every field empty.
    pub fn empty(key: SectionKey) -> Self {
        Self {
            key,
            values: BTreeMap::new(),
        }
    }

    /// Build a record from `(field, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownField`] if any field is not in the section's schema.
    pub fn from_pairs<'a>(
        key: SectionKey,
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> BlueprintResult<Self> {
        let mut record = Self::empty(key);
        for (name, value) in pairs {
            record.set(name, value)?;
        }
        Ok(record)
    }

    pub fn key(&self) -> SectionKey {
        self.key
    }

    pub fn schema(&self) -> &'static SectionSchema {
        self.key.schema()
    }

    /// Value of `name`, or `""` when absent.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Replace one field value.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::UnknownField`] if `name` is not in the section's schema.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> BlueprintResult<()> {
        let spec = self
            .schema()
            .field(name)
            .ok_or_else(|| BlueprintError::UnknownField {
                section: self.key,
                field: name.to_string(),
            })?;
        self.values.insert(spec.name, value.into());
        Ok(())
    }

    /// True iff every field is absent or blank after trimming.
    pub fn is_empty(&self) -> bool {
        self.values.values().all(|v| v.trim().is_empty())
    }

    /// Fields and their values in schema order, including empty ones.
    pub fn fields(&self) -> impl Iterator<Item = (&'static FieldSpec, &str)> + '_ {
        self.schema()
            .fields
            .iter()
            .map(move |spec| (spec, self.get(spec.name)))
    }

    /// `"Label: value"` lines for every non-blank field, in schema order.
    pub fn summary_lines(&self) -> Vec<String> {
        self.fields()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(spec, value)| format!("{}: {}", spec.label, value.trim()))
            .collect()
    }

    /// Narrow an untrusted section value into a record.
    ///
    /// `None` and JSON `null` mean the section has never been saved and produce an empty record.
    /// Keys outside the schema are ignored. String and `null` field values are accepted; any
    /// other shape is a schema mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`BlueprintError::Schema`] naming the failing path when the value is not a flat
    /// map of strings.
    pub fn from_wire(key: SectionKey, value: Option<&Value>) -> BlueprintResult<Self> {
        let value = match value {
            None | Some(Value::Null) => return Ok(Self::empty(key)),
            Some(v) => v,
        };

        let wire: BTreeMap<String, Option<String>> = serde_path_to_error::deserialize(value)
            .map_err(|err| {
                let path = err.path().to_string();
                let source = err.into_inner();
                let path = if path.is_empty() || path == "." {
                    "<root>".to_string()
                } else {
                    path
                };
                BlueprintError::Schema(format!("section {key} mismatch at {path}: {source}"))
            })?;

        let mut record = Self::empty(key);
        for (name, field_value) in wire {
            match key.schema().field(&name) {
                Some(spec) => {
                    record
                        .values
                        .insert(spec.name, field_value.unwrap_or_default());
                }
                None => {
                    tracing::debug!("ignoring unknown field '{}' in section {}", name, key);
                }
            }
        }

        Ok(record)
    }

    /// Wire form of the record: every schema field, blanks included.
    pub fn to_wire(&self) -> Map<String, Value> {
        self.fields()
            .map(|(spec, value)| (spec.name.to_string(), Value::String(value.to_string())))
            .collect()
    }
}
