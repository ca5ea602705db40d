use tracing::{error, info, instrument};

use crate::app_system::CartConfig;
use crate::cart::{CartManager, CartService};
use crate::clients::{CartClient, ProductClient, StockClient};
use crate::domain::{Cart, ProductId, UpdateAmount};
use crate::error::CartError;
use crate::notifier::{NotificationFeed, Notifier};
use crate::store::SnapshotStore;

pub const OUT_OF_STOCK_MESSAGE: &str = "Requested amount is out of stock";
pub const ADD_FAILED_MESSAGE: &str = "Failed to add product";
pub const REMOVE_FAILED_MESSAGE: &str = "Failed to remove product";
pub const UPDATE_FAILED_MESSAGE: &str = "Failed to update product amount";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    Update,
}

impl CartOperation {
    /// The message shown to the shopper when this operation fails with `error`.
    pub fn failure_message(self, error: &CartError) -> &'static str {
        if error.is_out_of_stock() {
            return OUT_OF_STOCK_MESSAGE;
        }
        match self {
            CartOperation::Add => ADD_FAILED_MESSAGE,
            CartOperation::Remove => REMOVE_FAILED_MESSAGE,
            CartOperation::Update => UPDATE_FAILED_MESSAGE,
        }
    }
}

/// Starts and wires the cart service, the catalog and stock actors, and the
/// notifier. This is what a storefront UI holds for the length of a session.
///
/// The mutation methods never return errors: failures become notices on the
/// [`NotificationFeed`] handed out by [`CartSystem::new`].
pub struct CartSystem {
    pub cart_client: CartClient,
    pub product_client: ProductClient,
    pub stock_client: StockClient,
    notifier: Notifier,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl CartSystem {
    /// Create and start the whole system with in-process catalog and stock actors.
    ///
    /// **Startup Order:**
    /// 1. Start the catalog and stock actors (no dependencies)
    /// 2. Load the cart snapshot and start the cart service with their clients
    #[instrument(name = "cart_system", skip(config, store))]
    pub fn new<S: SnapshotStore>(config: &CartConfig, store: S) -> (Self, NotificationFeed) {
        info!("Starting cart system");

        let (catalog_actor, product_client) = crate::product_actor::new(config.buffer_size);
        let (stock_actor, stock_client) = crate::stock_actor::new(config.buffer_size);
        let handles = vec![tokio::spawn(catalog_actor.run()), tokio::spawn(stock_actor.run())];

        Self::start(config, product_client, stock_client, store, handles)
    }

    /// Start only the cart service, against catalog and stock clients owned elsewhere.
    #[instrument(name = "cart_system", skip_all)]
    pub fn with_services<S: SnapshotStore>(
        config: &CartConfig,
        product_client: ProductClient,
        stock_client: StockClient,
        store: S,
    ) -> (Self, NotificationFeed) {
        Self::start(config, product_client, stock_client, store, Vec::new())
    }

    fn start<S: SnapshotStore>(
        config: &CartConfig,
        product_client: ProductClient,
        stock_client: StockClient,
        store: S,
        mut handles: Vec<tokio::task::JoinHandle<()>>,
    ) -> (Self, NotificationFeed) {
        let manager = CartManager::new(config, stock_client.clone(), product_client.clone(), store);
        let (cart_service, cart_client) = CartService::new(config.buffer_size, manager);
        handles.push(tokio::spawn(cart_service.run()));

        let (notifier, feed) = Notifier::new();
        info!("Cart system started successfully");

        let system = Self {
            cart_client,
            product_client,
            stock_client,
            notifier,
            handles,
        };
        (system, feed)
    }

    pub async fn add_product(&self, product_id: ProductId) {
        let result = self.cart_client.add_product(product_id).await;
        self.report(CartOperation::Add, result);
    }

    pub async fn remove_product(&self, product_id: ProductId) {
        let result = self.cart_client.remove_product(product_id).await;
        self.report(CartOperation::Remove, result);
    }

    pub async fn update_product_amount(&self, update: UpdateAmount) {
        let result = self.cart_client.update_product_amount(update).await;
        self.report(CartOperation::Update, result);
    }

    pub async fn cart(&self) -> Result<Cart, CartError> {
        self.cart_client.get_cart().await
    }

    pub async fn cart_size(&self) -> Result<usize, CartError> {
        self.cart_client.cart_size().await
    }

    fn report(&self, operation: CartOperation, result: Result<(), CartError>) {
        if let Err(e) = result {
            error!(?operation, error = %e, "Cart operation failed");
            self.notifier.report_error(operation.failure_message(&e));
        }
    }

    /// Gracefully shutdown the cart service, then wait for every task.
    ///
    /// The catalog and stock actors stop once the last client handle is gone,
    /// so clones handed out elsewhere must be dropped first.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), CartError> {
        info!("Shutting down cart system");

        let _ = self.cart_client.shutdown().await;
        drop(self.product_client);
        drop(self.stock_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
            }
        }

        info!("Cart system shutdown complete");
        Ok(())
    }
}
