//! Bundle document model
//!
//! A thin typed layer over the FHIR JSON wire format. Only the members the
//! engine reads or rewrites are typed (`resourceType`, `entry`, `fullUrl`,
//! `resource`, `id`); everything else is carried through in flattened maps so
//! that re-serialization does not drop unknown content.

use super::resource_type::ResourceType;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `resourceType` tag of the document root
pub const BUNDLE_RESOURCE_TYPE: &str = "Bundle";

/// A FHIR Bundle: an ordered sequence of entries
///
/// # Examples
///
/// ```
/// use fhir_deid::domain::Bundle;
/// use serde_json::json;
///
/// let bundle: Bundle = serde_json::from_value(json!({
///     "resourceType": "Bundle",
///     "type": "transaction",
///     "entry": [{"fullUrl": "urn:uuid:1", "resource": {"resourceType": "Patient", "id": "1"}}]
/// })).unwrap();
/// assert_eq!(bundle.entries().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    /// Always `"Bundle"` for a valid document
    #[serde(rename = "resourceType")]
    pub resource_type: String,

    /// Bundle members the engine does not touch (`id`, `type`, `meta`, ...)
    #[serde(flatten)]
    pub other: Map<String, Value>,

    /// Entries in document order; `None` when the member was absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry>>,
}

impl Bundle {
    /// Creates an empty Bundle of the given `type`
    pub fn new(bundle_type: &str) -> Self {
        let mut other = Map::new();
        other.insert("type".to_string(), Value::String(bundle_type.to_string()));
        Self {
            resource_type: BUNDLE_RESOURCE_TYPE.to_string(),
            other,
            entry: None,
        }
    }

    /// Appends an entry and returns self, for fixture construction
    pub fn with_entry(mut self, entry: BundleEntry) -> Self {
        self.entry.get_or_insert_with(Vec::new).push(entry);
        self
    }

    /// Entries in document order
    pub fn entries(&self) -> &[BundleEntry] {
        self.entry.as_deref().unwrap_or_default()
    }

    /// Mutable entries in document order
    pub fn entries_mut(&mut self) -> &mut [BundleEntry] {
        self.entry.as_deref_mut().unwrap_or_default()
    }
}

/// One entry of a Bundle
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BundleEntry {
    /// Container identity of the entry within the document
    #[serde(rename = "fullUrl", default, skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// The record carried by this entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<Resource>,

    /// Entry members the engine does not touch (`request`, `response`, `search`)
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl BundleEntry {
    /// Creates an entry for a resource, with an optional `fullUrl`
    pub fn new(full_url: Option<&str>, resource: Resource) -> Self {
        Self {
            full_url: full_url.map(str::to_string),
            resource: Some(resource),
            other: Map::new(),
        }
    }
}

/// A single FHIR resource, kept as its JSON object
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Resource(Map<String, Value>);

impl Resource {
    /// Builds a resource from a JSON value, if it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// The raw `resourceType` tag, whether known or not
    pub fn resource_type_tag(&self) -> Option<&str> {
        self.0.get("resourceType").and_then(Value::as_str)
    }

    /// The resource type, if it is one of the known types
    pub fn resource_type(&self) -> Option<ResourceType> {
        self.resource_type_tag().and_then(|tag| tag.parse().ok())
    }

    /// The logical `id`
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Replaces the logical `id`
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.insert("id".to_string(), Value::String(id.into()));
    }

    /// The record identity in typed form, `"<resourceType>/<id>"`
    pub fn identity(&self) -> Option<String> {
        match (self.resource_type_tag(), self.id()) {
            (Some(tag), Some(id)) => Some(format!("{tag}/{id}")),
            _ => None,
        }
    }

    /// Shared access to a member
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Mutable access to a member
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    /// Removes a member, returning whether it was present
    pub fn clear_field(&mut self, field: &str) -> bool {
        self.0.shift_remove(field).is_some()
    }
}
