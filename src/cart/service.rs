use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use super::CartManager;
use crate::clients::CartClient;
use crate::domain::{ProductId, UpdateAmount};
use crate::error::CartError;
use crate::messages::{CartRequest, ServiceResponse};
use crate::store::SnapshotStore;

/// Actor that owns a [`CartManager`].
///
/// Messages are handled one at a time and each handler runs to completion,
/// stock and catalog round-trips included, before the next message is read.
/// Two adds for the same product therefore always see each other's result.
pub struct CartService<S: SnapshotStore> {
    receiver: mpsc::Receiver<CartRequest>,
    manager: CartManager<S>,
}

impl<S: SnapshotStore> CartService<S> {
    pub fn new(buffer_size: usize, manager: CartManager<S>) -> (Self, CartClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self { receiver, manager };
        (service, CartClient::new(sender))
    }

    #[instrument(name = "cart_service", skip(self))]
    pub async fn run(mut self) {
        info!(cart_size = self.manager.cart_size(), "CartService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CartRequest::AddProduct { product_id, respond_to } => {
                    self.handle_add_product(product_id, respond_to).await;
                }
                CartRequest::RemoveProduct { product_id, respond_to } => {
                    self.handle_remove_product(product_id, respond_to);
                }
                CartRequest::UpdateProductAmount { update, respond_to } => {
                    self.handle_update_product_amount(update, respond_to).await;
                }
                CartRequest::GetCart { respond_to } => {
                    let _ = respond_to.send(Ok(self.manager.cart().clone()));
                }
                CartRequest::CartSize { respond_to } => {
                    let _ = respond_to.send(Ok(self.manager.cart_size()));
                }
                CartRequest::AmountOf { product_id, respond_to } => {
                    let _ = respond_to.send(Ok(self.manager.amount_of(product_id)));
                }
                CartRequest::Shutdown => {
                    info!("CartService shutting down");
                    break;
                }
            }
        }

        info!("CartService stopped");
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_add_product(&mut self, product_id: ProductId, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing add_product request");
        let result = self.manager.add_product(product_id).await;
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    fn handle_remove_product(&mut self, product_id: ProductId, respond_to: ServiceResponse<(), CartError>) {
        debug!("Processing remove_product request");
        let result = self.manager.remove_product(product_id);
        let _ = respond_to.send(result);
    }

    #[instrument(skip(self, respond_to))]
    async fn handle_update_product_amount(
        &mut self,
        update: UpdateAmount,
        respond_to: ServiceResponse<(), CartError>,
    ) {
        debug!("Processing update_product_amount request");
        let result = self.manager.update_product_amount(update).await;
        let _ = respond_to.send(result);
    }
}
