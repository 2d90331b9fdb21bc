//! Collection request and response bodies.
//!
//! Request:
//!
//! ```text
//! { "allOrNone": true, "records": [ { "attributes": { "type": "..." }, ... }, ... ] }
//! ```
//!
//! Response, one entry per request record in the same order:
//!
//! ```text
//! [ { "id": "...", "success": true, "errors": [] }, ... ]
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::collection::SObjCollection;
use crate::error::DecodeError;

/// Server status codes that show up in per-record errors.
pub mod status_codes {
    pub const DUPLICATES_DETECTED: &str = "DUPLICATES_DETECTED";
    /// Set on every otherwise valid record when an all-or-none batch is rolled back.
    pub const ALL_OR_NONE_OPERATION_ROLLED_BACK: &str = "ALL_OR_NONE_OPERATION_ROLLED_BACK";
    pub const INVALID_TYPE: &str = "INVALID_TYPE";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const ENTITY_IS_DELETED: &str = "ENTITY_IS_DELETED";
    pub const REQUIRED_FIELD_MISSING: &str = "REQUIRED_FIELD_MISSING";
}

/// Body of a create or update collection request.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchRequest {
    /// Roll the whole batch back if any record fails. Omitted when false.
    #[serde(rename = "allOrNone", skip_serializing_if = "is_false")]
    pub all_or_none: bool,
    pub records: SObjCollection,
}

impl BatchRequest {
    /// Request body for `records`.
    pub fn new(records: SObjCollection, all_or_none: bool) -> Self {
        BatchRequest {
            all_or_none,
            records,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Absent, `null` and `[]` all decode to an empty list.
///
/// Pair with `#[serde(default)]` so an absent key is accepted too.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One structured error attached to a failed record.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetail {
    #[serde(rename = "statusCode")]
    pub status_code: String,
    #[serde(default)]
    pub message: String,
    /// Names of the fields the error relates to; often empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<String>,
}

/// The server's verdict for the record at the same index of the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<ErrorDetail>,
}

impl OutcomeEntry {
    /// True when any attached error carries `status_code`.
    pub fn has_error(&self, status_code: &str) -> bool {
        self.errors.iter().any(|e| e.status_code == status_code)
    }

    /// True when the record failed only because its all-or-none batch was
    /// rolled back, not because of a problem with the record itself.
    pub fn is_rolled_back(&self) -> bool {
        !self.success
            && !self.errors.is_empty()
            && self
                .errors
                .iter()
                .all(|e| e.status_code == status_codes::ALL_OR_NONE_OPERATION_ROLLED_BACK)
    }
}

/// Per-record outcomes, positionally aligned with the request's records.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BatchResponse {
    entries: Vec<OutcomeEntry>,
}

impl BatchResponse {
    /// Decode a response body answering a request of `expected` records.
    ///
    /// Record failures are data and decode normally. The body's shape, its
    /// length, and the consistency of successful entries are checked.
    pub fn decode(body: Value, expected: usize) -> Result<Self, DecodeError> {
        let entries: Vec<OutcomeEntry> = serde_json::from_value(body)?;

        if entries.len() != expected {
            return Err(DecodeError::LengthMismatch {
                expected,
                actual: entries.len(),
            });
        }

        for (index, entry) in entries.iter().enumerate() {
            if !entry.success {
                continue;
            }
            if entry.id.is_none() {
                return Err(DecodeError::MissingId { index });
            }
            if !entry.errors.is_empty() {
                return Err(DecodeError::SuccessWithErrors {
                    index,
                    count: entry.errors.len(),
                });
            }
        }

        Ok(BatchResponse { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&OutcomeEntry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OutcomeEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[OutcomeEntry] {
        &self.entries
    }

    pub fn all_succeeded(&self) -> bool {
        self.entries.iter().all(|e| e.success)
    }

    /// Failed entries with their request index.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &OutcomeEntry)> {
        self.entries.iter().enumerate().filter(|(_, e)| !e.success)
    }

    /// Server ids by request index; `None` where the server assigned none.
    pub fn ids(&self) -> Vec<Option<&str>> {
        self.entries.iter().map(|e| e.id.as_deref()).collect()
    }

    /// Pair each caller record with its outcome.
    pub fn zip<'a, T>(
        &'a self,
        records: &'a [T],
    ) -> impl Iterator<Item = (&'a T, &'a OutcomeEntry)> + 'a {
        records.iter().zip(self.entries.iter())
    }
}

impl IntoIterator for BatchResponse {
    type Item = OutcomeEntry;
    type IntoIter = std::vec::IntoIter<OutcomeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a BatchResponse {
    type Item = &'a OutcomeEntry;
    type IntoIter = std::slice::Iter<'a, OutcomeEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DynamicSObject;
    use serde_json::json;

    #[test]
    fn all_or_none_is_omitted_when_false() {
        let request = BatchRequest::new(SObjCollection::new(), false);
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"records": []}));
    }

    #[test]
    fn all_or_none_is_sent_when_true() {
        let mut collection = SObjCollection::new();
        collection
            .push(&mut DynamicSObject::new("Account").set("Name", "Acme"))
            .unwrap();
        let request = BatchRequest::new(collection, true);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "allOrNone": true,
                "records": [{"attributes": {"type": "Account"}, "Name": "Acme"}]
            })
        );
    }

    #[test]
    fn decode_all_success() {
        let body = json!([
            {"id": "001RM000003oLnnYAE", "success": true, "errors": []},
            {"id": "003RM0000068xV6YAI", "success": true, "errors": []}
        ]);
        let response = BatchResponse::decode(body, 2).unwrap();
        assert!(response.all_succeeded());
        assert_eq!(
            response.ids(),
            vec![Some("001RM000003oLnnYAE"), Some("003RM0000068xV6YAI")]
        );
        assert!(response.iter().all(|e| e.errors.is_empty()));
    }

    #[test]
    fn errors_absent_null_and_empty_are_equivalent() {
        let body = json!([
            {"id": "a", "success": true},
            {"id": "b", "success": true, "errors": null},
            {"id": "c", "success": true, "errors": []}
        ]);
        let response = BatchResponse::decode(body, 3).unwrap();
        assert!(response.iter().all(|e| e.errors.is_empty()));
    }

    #[test]
    fn decode_failure_keeps_error_detail_and_position() {
        let body = json!([
            {
                "success": false,
                "errors": [{
                    "statusCode": "DUPLICATES_DETECTED",
                    "message": "Use one of these records?",
                    "fields": []
                }]
            },
            {"id": "003RM0000068xVCYAY", "success": true, "errors": []}
        ]);
        let response = BatchResponse::decode(body, 2).unwrap();

        let first = response.get(0).unwrap();
        assert!(!first.success);
        assert_eq!(first.id, None);
        assert_eq!(
            first.errors,
            vec![ErrorDetail {
                status_code: status_codes::DUPLICATES_DETECTED.to_string(),
                message: "Use one of these records?".to_string(),
                fields: vec![],
            }]
        );
        assert!(!first.is_rolled_back());

        let second = response.get(1).unwrap();
        assert!(second.success);
        assert_eq!(second.id.as_deref(), Some("003RM0000068xVCYAY"));

        let failed: Vec<usize> = response.failures().map(|(i, _)| i).collect();
        assert_eq!(failed, vec![0]);
    }

    #[test]
    fn rolled_back_entry_is_recognised() {
        let body = json!([{
            "success": false,
            "errors": [{
                "statusCode": "ALL_OR_NONE_OPERATION_ROLLED_BACK",
                "message": "Record rolled back because not all records were valid and the request was using AllOrNone header",
                "fields": null
            }]
        }]);
        let response = BatchResponse::decode(body, 1).unwrap();
        let entry = response.get(0).unwrap();
        assert!(entry.is_rolled_back());
        assert!(entry.has_error(status_codes::ALL_OR_NONE_OPERATION_ROLLED_BACK));
        assert!(entry.errors[0].fields.is_empty());
    }

    #[test]
    fn failure_without_errors_or_id_is_tolerated() {
        let response = BatchResponse::decode(json!([{"success": false}]), 1).unwrap();
        let entry = response.get(0).unwrap();
        assert!(!entry.success);
        assert!(entry.errors.is_empty());
        assert!(!entry.is_rolled_back());
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let body = json!([{"id": "a", "success": true}]);
        match BatchResponse::decode(body.clone(), 2) {
            Err(DecodeError::LengthMismatch { expected, actual }) => {
                assert_eq!((expected, actual), (2, 1));
            }
            other => panic!("expected LengthMismatch, got {:?}", other),
        }
        assert!(matches!(
            BatchResponse::decode(body, 0),
            Err(DecodeError::LengthMismatch { expected: 0, actual: 1 })
        ));
    }

    #[test]
    fn success_without_id_is_rejected() {
        let body = json!([{"id": "a", "success": true}, {"success": true}]);
        assert!(matches!(
            BatchResponse::decode(body, 2),
            Err(DecodeError::MissingId { index: 1 })
        ));
    }

    #[test]
    fn success_with_errors_is_rejected() {
        let body = json!([{
            "id": "a",
            "success": true,
            "errors": [{"statusCode": "X", "message": "y"}]
        }]);
        assert!(matches!(
            BatchResponse::decode(body, 1),
            Err(DecodeError::SuccessWithErrors { index: 0, count: 1 })
        ));
    }

    #[test]
    fn non_array_body_is_a_shape_error() {
        let body = json!({"message": "Hello, client"});
        assert!(matches!(
            BatchResponse::decode(body, 1),
            Err(DecodeError::Shape(_))
        ));
    }

    #[test]
    fn zip_pairs_records_with_outcomes() {
        let records = ["first", "second"];
        let body = json!([
            {"id": "1", "success": true},
            {"success": false, "errors": [{"statusCode": "NOT_FOUND", "message": "gone"}]}
        ]);
        let response = BatchResponse::decode(body, 2).unwrap();
        let paired: Vec<(&&str, bool)> = response
            .zip(&records[..])
            .map(|(r, e)| (r, e.success))
            .collect();
        assert_eq!(paired, vec![(&"first", true), (&"second", false)]);
    }
}
