//! The record capability and the common envelope every record carries.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `attributes` object at the top of every serialized record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Attributes {
    /// Canonical type name the server dispatches the record on.
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Common envelope embedded in every record type.
///
/// Embed it with `#[serde(flatten)]` so `attributes` (and `Id`, when set)
/// serialize at the top level of the record alongside its own fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BaseSObject {
    pub attributes: Attributes,
    #[serde(rename = "Id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl BaseSObject {
    /// An envelope for an already-persisted record.
    pub fn with_id(id: impl Into<String>) -> Self {
        BaseSObject {
            attributes: Attributes::default(),
            id: Some(id.into()),
        }
    }
}

/// Capability every record type submitted in a collection must provide.
///
/// ```ignore
/// #[derive(Serialize)]
/// struct Expense {
///     #[serde(flatten)]
///     base: BaseSObject,
///     #[serde(rename = "name__c")]
///     name: String,
/// }
///
/// impl SObject for Expense {
///     fn api_name(&self) -> &str { "Expense__c" }
///     fn base(&self) -> &BaseSObject { &self.base }
///     fn base_mut(&mut self) -> &mut BaseSObject { &mut self.base }
/// }
/// ```
pub trait SObject: Serialize {
    /// The record's canonical type name.
    fn api_name(&self) -> &str;

    /// The record's envelope.
    fn base(&self) -> &BaseSObject;

    /// Mutable access to the envelope. The tagger writes the type name here.
    fn base_mut(&mut self) -> &mut BaseSObject;

    /// Server id, present once the record exists remotely.
    fn id(&self) -> Option<&str> {
        self.base().id.as_deref()
    }
}

/// A record whose type name and fields are only known at run time.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct DynamicSObject {
    #[serde(flatten)]
    base: BaseSObject,
    #[serde(skip)]
    api_name: String,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl DynamicSObject {
    /// An empty record of type `api_name`.
    pub fn new(api_name: impl Into<String>) -> Self {
        DynamicSObject {
            base: BaseSObject::default(),
            api_name: api_name.into(),
            fields: Map::new(),
        }
    }

    /// Set the server id, for updates.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.base.id = Some(id.into());
        self
    }

    /// Set a field. The envelope keys `attributes` and `Id` are reserved and
    /// ignored here; use the envelope instead.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        if name != "attributes" && name != "Id" {
            self.fields.insert(name, value.into());
        }
        self
    }

    /// A field's value, if set.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl SObject for DynamicSObject {
    fn api_name(&self) -> &str {
        &self.api_name
    }

    fn base(&self) -> &BaseSObject {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseSObject {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_omits_unset_id_and_url() {
        let base = BaseSObject::default();
        assert_eq!(
            serde_json::to_value(&base).unwrap(),
            json!({"attributes": {"type": ""}})
        );
    }

    #[test]
    fn envelope_serializes_id_as_capitalized_key() {
        let base = BaseSObject::with_id("001RM000003oLnnYAE");
        let value = serde_json::to_value(&base).unwrap();
        assert_eq!(value["Id"], "001RM000003oLnnYAE");
    }

    #[test]
    fn dynamic_record_flattens_fields_next_to_envelope() {
        let record = DynamicSObject::new("Account")
            .set("Name", "Acme")
            .set("NumberOfEmployees", 12);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["Name"], "Acme");
        assert_eq!(value["NumberOfEmployees"], 12);
        assert!(value.get("attributes").is_some());
        assert_eq!(record.api_name(), "Account");
    }

    #[test]
    fn dynamic_record_ignores_reserved_keys() {
        let record = DynamicSObject::new("Account")
            .set("attributes", json!({"type": "Contact"}))
            .set("Id", "x");
        assert!(record.get("attributes").is_none());
        assert!(record.get("Id").is_none());
        assert_eq!(record.id(), None);
    }
}
