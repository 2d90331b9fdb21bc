//! force-sobjects: records, type tagging and collection wire types.
//!
//! Every record submitted to an sObject collection carries a common
//! envelope (`attributes`) whose `type` names the server-side schema the
//! record belongs to. This crate provides:
//!
//! - the [`SObject`] capability that caller types implement,
//! - the tagger ([`tag`], [`erase`]) that stamps the type name into the
//!   envelope and erases the record into a uniform [`TaggedRecord`],
//! - the ordered [`SObjCollection`] container, which may hold records of
//!   several Rust types at once,
//! - the request/response wire types and [`BatchResponse::decode`], which
//!   rebuilds the positional per-record outcome list.
//!
//! No I/O happens here; the transport lives in `force-collections`.

pub mod collection;
pub mod error;
pub mod record;
pub mod tag;
pub mod wire;

pub use collection::SObjCollection;
pub use error::{DecodeError, TagError};
pub use record::{Attributes, BaseSObject, DynamicSObject, SObject};
pub use tag::{erase, tag, TaggedRecord};
pub use wire::{status_codes, BatchRequest, BatchResponse, ErrorDetail, OutcomeEntry};
