use tracing::{debug, instrument};

use crate::actor_framework::FrameworkError;
use crate::domain::{ProductId, Stock, StockPatch};
use crate::error::StockError;
use crate::impl_basic_client;

/// Client for the stock actor. This is the stock oracle the cart checks against.
#[derive(Clone)]
pub struct StockClient {
    inner: crate::actor_framework::ResourceClient<Stock>,
}

impl_basic_client!(StockClient, Stock, StockError, stock);

impl StockClient {
    #[instrument(skip(self))]
    pub async fn set_stock(&self, id: ProductId, amount: u32) -> Result<Stock, StockError> {
        self.patch(id, StockPatch::Set(amount)).await
    }

    #[instrument(skip(self))]
    pub async fn restock(&self, id: ProductId, units: u32) -> Result<Stock, StockError> {
        self.patch(id, StockPatch::Restock(units)).await
    }

    async fn patch(&self, id: ProductId, patch: StockPatch) -> Result<Stock, StockError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(|e| match e {
            FrameworkError::NotFound(_) => StockError::NotFound(id),
            other => StockError::ActorCommunicationError(other.to_string()),
        })
    }
}
