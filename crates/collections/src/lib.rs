//! force-collections: batch create, update and delete over the sObject
//! collections resource.
//!
//! [`SObjectCollections`] is the coordinator. It tags and erases the
//! caller's records, sends one request through a [`RequestExecutor`], and
//! decodes the reply into a [`BatchResponse`] whose entries line up with
//! the submitted records by index. Per-record failures, including
//! all-or-none rollbacks, come back as data inside the response; only
//! local validation, transport and protocol problems are returned as
//! [`ForceError`].
//!
//! [`HttpExecutor`] and [`ResourceMap`] are the stock collaborators;
//! [`ForceClient`] wires them together from a [`ClientConfig`].

pub mod collections;
pub mod config;
pub mod error;
pub mod executor;
pub mod http;
pub mod resources;

pub use collections::{ForceClient, SObjectCollections};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiFault, ForceError};
pub use executor::{ApiRequest, Method, RequestExecutor};
pub use http::HttpExecutor;
pub use resources::{EndpointResolver, ResourceMap, COMPOSITE_KEY};

pub use force_sobjects::{
    status_codes, BaseSObject, BatchResponse, DynamicSObject, ErrorDetail, OutcomeEntry,
    SObjCollection, SObject,
};
