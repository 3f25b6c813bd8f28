//! Collection-scoped operations on the record service.

use std::future::Future;
use std::marker::PhantomData;

use rollcall_core::Record;
use tracing::{info, instrument};

use super::RecordClient;
use super::envelope::{decode_item, decode_list};
use crate::error::SyncError;

/// The remote authority for one record collection.
///
/// Implemented over HTTP by [`CollectionClient`]; tests substitute an
/// in-memory fake.
pub trait RecordService<R: Record>: Send + Sync {
    /// Fetch the full collection.
    fn list(&self) -> impl Future<Output = Result<Vec<R>, SyncError>> + Send;

    /// Send `patch` for `id` and return the field values the service committed.
    fn update(
        &self,
        id: &R::Id,
        patch: &R::Patch,
    ) -> impl Future<Output = Result<R::Patch, SyncError>> + Send;

    /// Delete `id`.
    fn delete(&self, id: &R::Id) -> impl Future<Output = Result<(), SyncError>> + Send;
}

/// [`RecordClient`] bound to the collection of `R`.
pub struct CollectionClient<R> {
    client: RecordClient,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for CollectionClient<R> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _record: PhantomData,
        }
    }
}

impl<R> std::fmt::Debug for CollectionClient<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionClient")
            .field("client", &self.client)
            .finish()
    }
}

impl<R: Record> CollectionClient<R> {
    /// Bind `client` to the collection of `R`.
    #[must_use]
    pub const fn new(client: RecordClient) -> Self {
        Self {
            client,
            _record: PhantomData,
        }
    }
}

impl<R: Record> RecordService<R> for CollectionClient<R> {
    #[instrument(skip(self), fields(collection = R::COLLECTION))]
    async fn list(&self) -> Result<Vec<R>, SyncError> {
        let body = self.client.get(&[R::COLLECTION]).await?;
        let records = decode_list::<R>(body)?;
        info!(count = records.len(), "Fetched collection");
        Ok(records)
    }

    #[instrument(skip(self, patch), fields(collection = R::COLLECTION, id = %id))]
    async fn update(&self, id: &R::Id, patch: &R::Patch) -> Result<R::Patch, SyncError> {
        let body = self
            .client
            .put(&[R::COLLECTION, id.as_ref()], patch)
            .await?;
        decode_item::<R>(id, body)
    }

    #[instrument(skip(self), fields(collection = R::COLLECTION, id = %id))]
    async fn delete(&self, id: &R::Id) -> Result<(), SyncError> {
        self.client.delete(&[R::COLLECTION, id.as_ref()]).await
    }
}
