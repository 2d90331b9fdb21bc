use serde::Serialize;

use crate::error::TagError;
use crate::record::SObject;
use crate::tag::{erase, TaggedRecord};

/// Ordered list of tagged records for one collection request.
///
/// Records are tagged and erased as they are pushed, so one collection may
/// mix record types. Insertion order is the order sent on the wire and the
/// order outcomes come back in.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(transparent)]
pub struct SObjCollection {
    records: Vec<TaggedRecord>,
}

impl SObjCollection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty collection with room for `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        SObjCollection {
            records: Vec::with_capacity(capacity),
        }
    }

    /// Tag a homogeneous slice in place and collect it in order.
    pub fn from_records<R: SObject>(records: &mut [R]) -> Result<Self, TagError> {
        let mut collection = Self::with_capacity(records.len());
        for record in records.iter_mut() {
            collection.push(record)?;
        }
        Ok(collection)
    }

    /// Tag `record` in place and append its wire form.
    pub fn push<R: SObject + ?Sized>(&mut self, record: &mut R) -> Result<(), TagError> {
        self.records.push(erase(record)?);
        Ok(())
    }

    /// Number of records, which is also the expected outcome count.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TaggedRecord> {
        self.records.iter()
    }

    /// The tagged records in submission order.
    pub fn records(&self) -> &[TaggedRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a SObjCollection {
    type Item = &'a TaggedRecord;
    type IntoIter = std::slice::Iter<'a, TaggedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DynamicSObject;

    #[test]
    fn mixed_types_keep_order_and_own_type_names() {
        let mut account = DynamicSObject::new("Account").set("Name", "Acme");
        let mut contact = DynamicSObject::new("Contact").set("LastName", "Doe");

        let mut collection = SObjCollection::new();
        collection.push(&mut account).unwrap();
        collection.push(&mut contact).unwrap();

        let names: Vec<&str> = collection.iter().map(TaggedRecord::type_name).collect();
        assert_eq!(names, vec!["Account", "Contact"]);
    }

    #[test]
    fn from_records_tags_callers_records() {
        let mut records = vec![DynamicSObject::new("Lead"), DynamicSObject::new("Lead")];
        let collection = SObjCollection::from_records(&mut records).unwrap();
        assert_eq!(collection.len(), 2);
        assert!(records
            .iter()
            .all(|r| r.base().attributes.type_name == "Lead"));
    }

    #[test]
    fn empty_collection_serializes_as_empty_array() {
        let collection = SObjCollection::new();
        assert!(collection.is_empty());
        assert_eq!(serde_json::to_string(&collection).unwrap(), "[]");
    }
}
