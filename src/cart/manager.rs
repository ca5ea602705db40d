use std::future::Future;
use std::time::Duration;

use tracing::{debug, error, info, instrument, warn};

use crate::app_system::{CartConfig, PersistFailurePolicy};
use crate::clients::{ProductClient, StockClient};
use crate::domain::{Cart, CartEntry, Product, ProductId, Stock, UpdateAmount};
use crate::error::{CartError, CatalogError, StockError, StoreError};
use crate::store::SnapshotStore;

/// Owns the shopper's cart and reconciles every change against live stock.
///
/// Each operation validates against the stock service, builds the new cart on a
/// copy and commits it. A failed operation leaves the cart exactly as it was.
pub struct CartManager<S: SnapshotStore> {
    cart: Cart,
    stock: StockClient,
    catalog: ProductClient,
    store: S,
    storage_key: String,
    persist_policy: PersistFailurePolicy,
    query_timeout: Option<Duration>,
}

impl<S: SnapshotStore> CartManager<S> {
    /// Builds a manager and loads the last snapshot from `store`.
    ///
    /// A missing or unreadable snapshot starts an empty cart.
    pub fn new(config: &CartConfig, stock: StockClient, catalog: ProductClient, store: S) -> Self {
        let cart = load_snapshot(&store, &config.storage_key);
        info!(cart_size = cart.len(), key = %config.storage_key, "Cart loaded");

        Self {
            cart,
            stock,
            catalog,
            store,
            storage_key: config.storage_key.clone(),
            persist_policy: config.persist_policy,
            query_timeout: config.query_timeout,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Number of distinct products in the cart.
    pub fn cart_size(&self) -> usize {
        self.cart.len()
    }

    pub fn amount_of(&self, product_id: ProductId) -> Option<u32> {
        self.cart.amount_of(product_id)
    }

    /// Adds one unit of `product_id`, fetching the product record on first add.
    #[instrument(skip(self))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        let current = self.cart.amount_of(product_id);
        let stock = self.query_stock(product_id).await?;

        let target = current.unwrap_or(0).checked_add(1).filter(|target| *target <= stock.amount);
        let Some(target) = target else {
            warn!(current = current.unwrap_or(0), available = stock.amount, "Add rejected: out of stock");
            return Err(CartError::OutOfStock {
                product_id,
                requested: i64::from(current.unwrap_or(0)) + 1,
                available: stock.amount,
            });
        };

        let mut updated = self.cart.clone();
        if current.is_some() {
            updated.set_amount(product_id, target);
        } else {
            let product = self.query_product(product_id).await?;
            debug!(product_name = %product.name, "Product fetched from catalog");
            updated.push(CartEntry::new(product, 1));
        }

        self.commit(updated)?;
        info!(amount = target, "Product added");
        Ok(())
    }

    /// Removes `product_id` if present. Removing an absent product still commits.
    #[instrument(skip(self))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<(), CartError> {
        if self.cart.get(product_id).is_none() {
            debug!("Product not in cart, committing unchanged cart");
        }
        let updated = self.cart.without(product_id);
        self.commit(updated)?;
        info!("Product removed");
        Ok(())
    }

    /// Sets the amount of a product already in the cart.
    ///
    /// Non-positive amounts are ignored without touching the store.
    #[instrument(skip(self))]
    pub async fn update_product_amount(&mut self, update: UpdateAmount) -> Result<(), CartError> {
        let UpdateAmount { product_id, amount } = update;
        if amount <= 0 {
            debug!("Ignoring non-positive amount");
            return Ok(());
        }

        let stock = self.query_stock(product_id).await?;
        if amount > i64::from(stock.amount) {
            warn!(available = stock.amount, "Update rejected: out of stock");
            return Err(CartError::OutOfStock {
                product_id,
                requested: amount,
                available: stock.amount,
            });
        }
        // 0 < amount <= stock.amount
        let amount = amount as u32;

        let mut updated = self.cart.clone();
        if !updated.set_amount(product_id, amount) {
            warn!("Update rejected: product not in cart");
            return Err(CartError::NotInCart(product_id));
        }

        self.commit(updated)?;
        info!("Product amount updated");
        Ok(())
    }

    /// Writes the snapshot, then installs `updated` in memory.
    fn commit(&mut self, updated: Cart) -> Result<(), CartError> {
        if let Err(e) = self.persist(&updated) {
            match self.persist_policy {
                PersistFailurePolicy::Abort => {
                    error!(error = %e, "Snapshot write failed, cart left unchanged");
                    return Err(CartError::Persistence(e));
                }
                PersistFailurePolicy::LogAndContinue => {
                    error!(error = %e, "Snapshot write failed, keeping in-memory cart");
                }
            }
        }
        self.cart = updated;
        debug!(cart_size = self.cart.len(), "Cart committed");
        Ok(())
    }

    fn persist(&mut self, cart: &Cart) -> Result<(), StoreError> {
        let snapshot = serde_json::to_string(cart).map_err(|e| StoreError::Encoding(e.to_string()))?;
        self.store.write(&self.storage_key, &snapshot)
    }

    async fn query_stock(&self, product_id: ProductId) -> Result<Stock, StockError> {
        let result = with_timeout(self.query_timeout, self.stock.get_stock(product_id))
            .await
            .unwrap_or_else(|limit| Err(StockError::Timeout(limit.as_millis())));
        if let Err(e) = &result {
            warn!(error = %e, "Stock query failed");
        }
        result
    }

    async fn query_product(&self, product_id: ProductId) -> Result<Product, CatalogError> {
        let result = with_timeout(self.query_timeout, self.catalog.get_product(product_id))
            .await
            .unwrap_or_else(|limit| Err(CatalogError::Timeout(limit.as_millis())));
        if let Err(e) = &result {
            warn!(error = %e, "Catalog query failed");
        }
        result
    }
}

/// Runs `query`, giving up after `limit` when one is set.
async fn with_timeout<T>(limit: Option<Duration>, query: impl Future<Output = T>) -> Result<T, Duration> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, query).await.map_err(|_| limit),
        None => Ok(query.await),
    }
}

fn load_snapshot<S: SnapshotStore>(store: &S, key: &str) -> Cart {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(error = %e, "Cart snapshot unreadable, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => cart.normalized(),
        Err(e) => {
            warn!(error = %e, "Cart snapshot unparseable, starting empty");
            Cart::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    const KEY: &str = "@RocketShoes:cart";

    struct Fixture {
        stock: StockClient,
        catalog: ProductClient,
        store: MemoryStore,
    }

    impl Fixture {
        async fn new(products: &[(ProductId, &str, u32)]) -> Self {
            let (stock_actor, stock) = crate::stock_actor::new(10);
            let (catalog_actor, catalog) = crate::product_actor::new(10);
            tokio::spawn(stock_actor.run());
            tokio::spawn(catalog_actor.run());

            for (id, name, available) in products {
                catalog.put_product(Product::new(*id, *name, 99.9)).await.unwrap();
                stock.put_stock(Stock::new(*id, *available)).await.unwrap();
            }

            Self { stock, catalog, store: MemoryStore::new() }
        }

        fn manager(&self, config: &CartConfig) -> CartManager<MemoryStore> {
            CartManager::new(config, self.stock.clone(), self.catalog.clone(), self.store.clone())
        }

        fn seed(&self, entries: &[(ProductId, u32)]) {
            let cart: Cart = entries
                .iter()
                .map(|(id, amount)| CartEntry::new(Product::new(*id, format!("Product {}", id), 99.9), *amount))
                .collect::<Vec<_>>()
                .into();
            let mut store = self.store.clone();
            store.write(KEY, &serde_json::to_string(&cart).unwrap()).unwrap();
        }
    }

    fn ids(cart: &Cart) -> Vec<ProductId> {
        cart.entries().iter().map(CartEntry::id).collect()
    }

    #[tokio::test]
    async fn test_add_new_product_creates_single_entry() {
        let fixture = Fixture::new(&[(5, "X", 10)]).await;
        let mut manager = fixture.manager(&CartConfig::default());

        manager.add_product(5).await.unwrap();

        assert_eq!(manager.cart().entries(), &[CartEntry::new(Product::new(5, "X", 99.9), 1)]);
        let stored = fixture.store.read(KEY).unwrap().unwrap();
        assert!(stored.contains(r#""name":"X""#));
        assert!(stored.contains(r#""amount":1"#));
    }

    #[tokio::test]
    async fn test_add_existing_product_increments_amount() {
        let fixture = Fixture::new(&[(1, "A", 5), (2, "B", 5)]).await;
        fixture.seed(&[(1, 2), (2, 1)]);
        let mut manager = fixture.manager(&CartConfig::default());

        manager.add_product(1).await.unwrap();

        assert_eq!(manager.cart_size(), 2);
        assert_eq!(manager.amount_of(1), Some(3));
        assert_eq!(ids(manager.cart()), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_add_beyond_stock_leaves_cart_unchanged() {
        let fixture = Fixture::new(&[(1, "A", 2)]).await;
        fixture.seed(&[(1, 2)]);
        let mut manager = fixture.manager(&CartConfig::default());
        let before = manager.cart().clone();

        let result = manager.add_product(1).await;

        assert_eq!(
            result,
            Err(CartError::OutOfStock { product_id: 1, requested: 3, available: 2 })
        );
        assert_eq!(manager.cart(), &before);
        assert_eq!(fixture.store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_add_with_zero_stock_is_rejected() {
        let fixture = Fixture::new(&[(4, "D", 0)]).await;
        let mut manager = fixture.manager(&CartConfig::default());

        let result = manager.add_product(4).await;

        assert!(result.unwrap_err().is_out_of_stock());
        assert!(manager.cart().is_empty());
    }

    #[tokio::test]
    async fn test_add_without_stock_record_fails() {
        let fixture = Fixture::new(&[]).await;
        let mut manager = fixture.manager(&CartConfig::default());

        let result = manager.add_product(9).await;

        assert_eq!(result, Err(CartError::StockUnavailable(StockError::NotFound(9))));
        assert!(manager.cart().is_empty());
        assert_eq!(fixture.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_add_with_stock_but_missing_catalog_record_fails() {
        let fixture = Fixture::new(&[]).await;
        fixture.stock.put_stock(Stock::new(3, 4)).await.unwrap();
        let mut manager = fixture.manager(&CartConfig::default());

        let result = manager.add_product(3).await;

        assert_eq!(result, Err(CartError::CatalogUnavailable(CatalogError::NotFound(3))));
        assert!(manager.cart().is_empty());
    }

    #[tokio::test]
    async fn test_remove_absent_product_is_silent_success() {
        let fixture = Fixture::new(&[]).await;
        let mut manager = fixture.manager(&CartConfig::default());

        manager.remove_product(42).unwrap();

        assert!(manager.cart().is_empty());
        assert_eq!(fixture.store.read(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_remove_preserves_order_of_remaining_entries() {
        let fixture = Fixture::new(&[]).await;
        fixture.seed(&[(1, 1), (2, 2), (3, 3)]);
        let mut manager = fixture.manager(&CartConfig::default());

        manager.remove_product(2).unwrap();

        assert_eq!(ids(manager.cart()), vec![1, 3]);
        assert_eq!(manager.amount_of(3), Some(3));
    }

    #[tokio::test]
    async fn test_remove_persists_under_the_reloaded_key() {
        let fixture = Fixture::new(&[]).await;
        fixture.seed(&[(1, 1), (2, 1)]);
        let mut manager = fixture.manager(&CartConfig::default());

        manager.remove_product(1).unwrap();

        let reloaded = fixture.manager(&CartConfig::default());
        assert_eq!(ids(reloaded.cart()), vec![2]);
        assert_eq!(fixture.store.keys(), vec![KEY.to_string()]);
    }

    #[tokio::test]
    async fn test_update_with_non_positive_amount_is_ignored() {
        let fixture = Fixture::new(&[(1, "A", 5)]).await;
        fixture.seed(&[(1, 2)]);
        let mut manager = fixture.manager(&CartConfig::default());

        for amount in [0, -3] {
            manager.update_product_amount(UpdateAmount { product_id: 1, amount }).await.unwrap();
        }

        assert_eq!(manager.amount_of(1), Some(2));
        assert_eq!(fixture.store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_update_sets_exact_amount() {
        let fixture = Fixture::new(&[(1, "A", 5)]).await;
        fixture.seed(&[(1, 1)]);
        let mut manager = fixture.manager(&CartConfig::default());

        manager.update_product_amount(UpdateAmount { product_id: 1, amount: 5 }).await.unwrap();

        assert_eq!(manager.amount_of(1), Some(5));
        let reloaded = fixture.manager(&CartConfig::default());
        assert_eq!(reloaded.amount_of(1), Some(5));
    }

    #[tokio::test]
    async fn test_update_beyond_stock_is_rejected() {
        let fixture = Fixture::new(&[(1, "A", 3)]).await;
        fixture.seed(&[(1, 1)]);
        let mut manager = fixture.manager(&CartConfig::default());

        let result = manager.update_product_amount(UpdateAmount { product_id: 1, amount: 4 }).await;

        assert_eq!(
            result,
            Err(CartError::OutOfStock { product_id: 1, requested: 4, available: 3 })
        );
        assert_eq!(manager.amount_of(1), Some(1));
    }

    #[tokio::test]
    async fn test_update_absent_product_fails() {
        let fixture = Fixture::new(&[(8, "H", 10)]).await;
        let mut manager = fixture.manager(&CartConfig::default());

        let result = manager.update_product_amount(UpdateAmount { product_id: 8, amount: 2 }).await;

        assert_eq!(result, Err(CartError::NotInCart(8)));
        assert!(manager.cart().is_empty());
        assert_eq!(fixture.store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_snapshot_round_trip_keeps_order_and_amounts() {
        let fixture = Fixture::new(&[(3, "C", 9), (1, "A", 9), (2, "B", 9)]).await;
        let mut manager = fixture.manager(&CartConfig::default());
        for id in [3, 1, 2, 1] {
            manager.add_product(id).await.unwrap();
        }

        let reloaded = fixture.manager(&CartConfig::default());

        assert_eq!(reloaded.cart(), manager.cart());
        assert_eq!(ids(reloaded.cart()), vec![3, 1, 2]);
        assert_eq!(reloaded.amount_of(1), Some(2));
    }

    #[tokio::test]
    async fn test_unparseable_snapshot_starts_empty() {
        let fixture = Fixture::new(&[]).await;
        let mut store = fixture.store.clone();
        store.write(KEY, "{not json").unwrap();

        let manager = fixture.manager(&CartConfig::default());

        assert!(manager.cart().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_aborts_by_default() {
        let fixture = Fixture::new(&[(1, "A", 5)]).await;
        let mut manager = fixture.manager(&CartConfig::default());
        fixture.store.fail_writes(true);

        let result = manager.add_product(1).await;

        assert!(matches!(result, Err(CartError::Persistence(_))));
        assert!(manager.cart().is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_can_keep_memory_state() {
        let fixture = Fixture::new(&[(1, "A", 5)]).await;
        let config = CartConfig::default().with_persist_policy(PersistFailurePolicy::LogAndContinue);
        let mut manager = fixture.manager(&config);
        fixture.store.fail_writes(true);

        manager.add_product(1).await.unwrap();

        assert_eq!(manager.amount_of(1), Some(1));
        assert_eq!(fixture.store.read(KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_stock_is_read_fresh_on_every_add() {
        let fixture = Fixture::new(&[(1, "A", 1)]).await;
        let mut manager = fixture.manager(&CartConfig::default());

        manager.add_product(1).await.unwrap();
        assert!(manager.add_product(1).await.unwrap_err().is_out_of_stock());

        fixture.stock.restock(1, 2).await.unwrap();
        manager.add_product(1).await.unwrap();
        assert_eq!(manager.amount_of(1), Some(2));

        fixture.stock.delete_stock(1).await.unwrap();
        assert_eq!(
            manager.add_product(1).await,
            Err(CartError::StockUnavailable(StockError::NotFound(1)))
        );
        assert_eq!(manager.amount_of(1), Some(2));
    }

    #[tokio::test]
    async fn test_cart_keeps_product_snapshot_after_catalog_change() {
        let fixture = Fixture::new(&[(1, "A", 5)]).await;
        let mut manager = fixture.manager(&CartConfig::default());
        manager.add_product(1).await.unwrap();

        let patch = crate::domain::ProductPatch { name: Some("Renamed".into()), ..Default::default() };
        fixture.catalog.update_product(1, patch).await.unwrap();
        manager.add_product(1).await.unwrap();

        let entry = manager.cart().get(1).unwrap();
        assert_eq!(entry.product.name, "A");
        assert_eq!(entry.amount, 2);
    }

    #[tokio::test]
    async fn test_stock_query_timeout() {
        // Nobody answers on this channel.
        let (stock, _stock_rx) = crate::mock_framework::create_mock_client::<Stock>(1);
        let (catalog, _catalog_rx) = crate::mock_framework::create_mock_client::<Product>(1);
        let config = CartConfig::default().with_query_timeout(Duration::from_millis(20));
        let mut manager = CartManager::new(
            &config,
            StockClient::new(stock),
            ProductClient::new(catalog),
            MemoryStore::new(),
        );

        let result = manager.add_product(1).await;

        assert_eq!(result, Err(CartError::StockUnavailable(StockError::Timeout(20))));
    }
}
