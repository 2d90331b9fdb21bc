use force_sobjects::wire::null_as_empty;
use force_sobjects::{DecodeError, TagError};
use serde::Deserialize;

use crate::executor::Method;

/// All errors a collection call can return.
///
/// Per-record failures are not errors; they are returned inside the
/// [`BatchResponse`](force_sobjects::BatchResponse). Anything here means the
/// call as a whole failed and no outcome list is available.
#[derive(Debug, thiserror::Error)]
pub enum ForceError {
    /// A record could not be tagged. Raised before any request is sent.
    #[error("record cannot be submitted: {0}")]
    Capability(#[from] TagError),

    /// More records than one collection request accepts.
    #[error("batch of {len} records exceeds the limit of {max}")]
    BatchTooLarge { len: usize, max: usize },

    /// An update record without an `Id`.
    #[error("record {index} has no Id and cannot be updated")]
    MissingRecordId { index: usize },

    /// A delete id that is empty or contains `,`.
    #[error("record id {index} is empty or contains ','")]
    InvalidRecordId { index: usize },

    /// A request whose method cannot carry the body it was given.
    #[error("{method} requests do not carry a body")]
    BodyNotAllowed { method: Method },

    /// The resolver has no base path for the resource.
    #[error("no endpoint known for resource '{key}'")]
    UnknownResource { key: String },

    /// The request body could not be encoded.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Connection failure, timeout, or an error status without a
    /// recognizable fault body. Whether the batch was applied is unknown.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The server rejected the request as a whole.
    #[error("request rejected with status {status}: {}", fault_summary(.faults))]
    Api { status: u16, faults: Vec<ApiFault> },

    /// A success status with a body that is not JSON.
    #[error("response body is not valid JSON: {message}")]
    MalformedBody { message: String },

    /// The response does not answer the request that was sent.
    #[error("response does not match the request: {0}")]
    Contract(#[from] DecodeError),
}

/// A request-level fault, as returned with an error status.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiFault {
    #[serde(rename = "errorCode")]
    pub error_code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<String>,
}

fn fault_summary(faults: &[ApiFault]) -> String {
    faults
        .iter()
        .map(|f| format!("{}: {}", f.error_code, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_lists_every_fault() {
        let err = ForceError::Api {
            status: 400,
            faults: vec![
                ApiFault {
                    error_code: "INVALID_FIELD".to_string(),
                    message: "No such column 'foo__c'".to_string(),
                    fields: vec![],
                },
                ApiFault {
                    error_code: "JSON_PARSER_ERROR".to_string(),
                    message: "Unexpected token".to_string(),
                    fields: vec![],
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "request rejected with status 400: INVALID_FIELD: No such column 'foo__c'; JSON_PARSER_ERROR: Unexpected token"
        );
    }

    #[test]
    fn fault_fields_may_be_null_or_absent() {
        let faults: Vec<ApiFault> = serde_json::from_str(
            r#"[
                {"errorCode": "INVALID_TYPE", "message": "bad", "fields": null},
                {"errorCode": "JSON_PARSER_ERROR"},
                {"errorCode": "REQUIRED_FIELD_MISSING", "message": "m", "fields": ["Name"]}
            ]"#,
        )
        .unwrap();
        assert!(faults[0].fields.is_empty());
        assert!(faults[1].fields.is_empty());
        assert_eq!(faults[1].message, "");
        assert_eq!(faults[2].fields, vec!["Name".to_string()]);
    }

    #[test]
    fn invalid_delete_id_names_its_position() {
        let err = ForceError::InvalidRecordId { index: 3 };
        assert_eq!(err.to_string(), "record id 3 is empty or contains ','");
    }

    #[test]
    fn body_not_allowed_names_the_method() {
        let err = ForceError::BodyNotAllowed {
            method: Method::Delete,
        };
        assert_eq!(err.to_string(), "DELETE requests do not carry a body");
    }

    #[test]
    fn decode_errors_convert_to_contract_errors() {
        let err: ForceError = DecodeError::LengthMismatch {
            expected: 2,
            actual: 3,
        }
        .into();
        assert!(matches!(err, ForceError::Contract(_)));
        assert_eq!(
            err.to_string(),
            "response does not match the request: response has 3 entries for 2 records"
        );
    }
}
