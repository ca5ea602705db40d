use tracing::{debug, instrument};

use crate::domain::{Product, ProductId, ProductPatch};
use crate::error::CatalogError;
use crate::impl_basic_client;

/// Client for the catalog actor.
#[derive(Clone)]
pub struct ProductClient {
    inner: crate::actor_framework::ResourceClient<Product>,
}

impl_basic_client!(ProductClient, Product, CatalogError, product);

impl ProductClient {
    #[instrument(skip(self))]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(|e| match e {
            crate::actor_framework::FrameworkError::NotFound(_) => CatalogError::NotFound(id),
            other => CatalogError::ActorCommunicationError(other.to_string()),
        })
    }
}
