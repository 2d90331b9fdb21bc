//! The batch collection coordinator.

use force_sobjects::{BatchRequest, BatchResponse, SObjCollection, SObject};
use tracing::{debug, warn};

use crate::config::{ClientConfig, DEFAULT_MAX_BATCH_SIZE};
use crate::error::ForceError;
use crate::executor::{ApiRequest, Method, RequestExecutor};
use crate::http::HttpExecutor;
use crate::resources::{EndpointResolver, ResourceMap, COMPOSITE_KEY};

/// Coordinator over `<composite>/sobjects`.
///
/// Holds no per-call state: every method takes `&self` and keeps its
/// request and response local, so one instance can serve concurrent calls.
///
/// Each call sends exactly one request. Outcomes come back in request
/// order, one per record, and record-level failures (duplicates, rollbacks
/// under `all_or_none`, unknown types) are returned as data. An empty batch
/// is answered locally with an empty response.
pub struct SObjectCollections<E, R = ResourceMap> {
    executor: E,
    resolver: R,
    max_batch_size: usize,
}

/// Coordinator wired to the stock HTTP executor and resource table.
pub type ForceClient = SObjectCollections<HttpExecutor, ResourceMap>;

impl ForceClient {
    /// Client over HTTP for the configured instance and API version.
    pub fn from_config(config: &ClientConfig) -> Self {
        SObjectCollections::new(
            HttpExecutor::from_config(config),
            ResourceMap::for_version(&config.api_version),
        )
        .with_max_batch_size(config.max_batch_size)
    }
}

impl<E, R> SObjectCollections<E, R>
where
    E: RequestExecutor,
    R: EndpointResolver,
{
    /// Coordinator with the default batch size limit.
    pub fn new(executor: E, resolver: R) -> Self {
        SObjectCollections {
            executor,
            resolver,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    /// Tag `records` in place and create them in one request.
    pub async fn create<S: SObject>(
        &self,
        records: &mut [S],
        all_or_none: bool,
    ) -> Result<BatchResponse, ForceError> {
        let collection = SObjCollection::from_records(records)?;
        self.submit(collection, all_or_none).await
    }

    /// Create an already tagged collection, which may mix record types.
    pub async fn submit(
        &self,
        records: SObjCollection,
        all_or_none: bool,
    ) -> Result<BatchResponse, ForceError> {
        self.send_records(Method::Post, records, all_or_none).await
    }

    /// Update existing records. Every record must carry an `Id`.
    pub async fn update(
        &self,
        records: SObjCollection,
        all_or_none: bool,
    ) -> Result<BatchResponse, ForceError> {
        if let Some(index) = records.iter().position(|r| r.id().is_none()) {
            return Err(ForceError::MissingRecordId { index });
        }
        self.send_records(Method::Patch, records, all_or_none).await
    }

    /// Delete records by id. Outcomes line up with `ids`.
    ///
    /// Ids travel comma-joined in the query string, so an empty id or one
    /// containing `,` is rejected before anything is sent.
    pub async fn delete<I: AsRef<str>>(
        &self,
        ids: &[I],
        all_or_none: bool,
    ) -> Result<BatchResponse, ForceError> {
        if ids.is_empty() {
            debug!("Empty delete batch, nothing to send");
            return Ok(BatchResponse::default());
        }
        if let Some(index) = ids.iter().position(|id| {
            let id = id.as_ref();
            id.is_empty() || id.contains(',')
        }) {
            return Err(ForceError::InvalidRecordId { index });
        }
        self.check_size(ids.len())?;

        let joined = ids
            .iter()
            .map(|id| id.as_ref())
            .collect::<Vec<&str>>()
            .join(",");
        let request = ApiRequest::new(Method::Delete, self.endpoint()?)
            .with_query("ids", joined)
            .with_query("allOrNone", all_or_none.to_string());

        debug!(
            "Deleting {} record(s) (allOrNone: {})",
            ids.len(),
            all_or_none
        );
        self.exchange(request, ids.len()).await
    }

    async fn send_records(
        &self,
        method: Method,
        records: SObjCollection,
        all_or_none: bool,
    ) -> Result<BatchResponse, ForceError> {
        if records.is_empty() {
            debug!("Empty {} batch, nothing to send", method);
            return Ok(BatchResponse::default());
        }
        self.check_size(records.len())?;

        let path = self.endpoint()?;
        let expected = records.len();
        debug!(
            "Sending {} record(s) via {} (allOrNone: {})",
            expected, method, all_or_none
        );

        let body = serde_json::to_value(BatchRequest::new(records, all_or_none))
            .map_err(ForceError::Encode)?;
        let request = ApiRequest::new(method, path).with_body(body);
        self.exchange(request, expected).await
    }

    async fn exchange(
        &self,
        request: ApiRequest,
        expected: usize,
    ) -> Result<BatchResponse, ForceError> {
        let body = self.executor.execute(request).await?;
        let response = BatchResponse::decode(body, expected).map_err(|e| {
            warn!("Collection response rejected: {}", e);
            ForceError::Contract(e)
        })?;

        let failed = response.failures().count();
        if failed > 0 {
            debug!("{} of {} record(s) failed", failed, expected);
        }
        Ok(response)
    }

    fn check_size(&self, len: usize) -> Result<(), ForceError> {
        if len > self.max_batch_size {
            return Err(ForceError::BatchTooLarge {
                len,
                max: self.max_batch_size,
            });
        }
        Ok(())
    }

    fn endpoint(&self) -> Result<String, ForceError> {
        let base = self
            .resolver
            .resolve(COMPOSITE_KEY)
            .ok_or_else(|| ForceError::UnknownResource {
                key: COMPOSITE_KEY.to_string(),
            })?;
        Ok(format!("{}/sobjects", base.trim_end_matches('/')))
    }
}
