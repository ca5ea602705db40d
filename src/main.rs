use tracing::{info, warn, Instrument};

use storefront_cart::app_system::{setup_tracing, CartConfig, CartSystem};
use storefront_cart::domain::{Product, Stock, UpdateAmount};
use storefront_cart::store::{FileStore, MemoryStore, SnapshotStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = CartConfig::from_env();
    info!(key = %config.storage_key, "Starting storefront cart demo");

    // Snapshots survive restarts only when a data directory is configured
    let store: Box<dyn SnapshotStore> = match &config.data_dir {
        Some(dir) => Box::new(FileStore::open(dir)?),
        None => Box::new(MemoryStore::new()),
    };

    let (system, mut notices) = CartSystem::new(&config, store);

    let span = tracing::info_span!("catalog_seeding");
    async {
        info!("Seeding catalog and stock");
        for (id, name, price, amount) in [
            (1, "Tenis de Caminhada Leve Confortavel", 179.9, 3),
            (2, "Tenis VR Caminhada Confortavel Detalhes Couro Masculino", 139.9, 5),
            (3, "Tenis Adidas Duramo Lite 2.0", 219.9, 2),
        ] {
            system.product_client.put_product(Product::new(id, name, price)).await?;
            system.stock_client.put_stock(Stock::new(id, amount)).await?;
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    let span = tracing::info_span!("shopping_session");
    async {
        system.add_product(1).await;
        system.add_product(3).await;
        system.add_product(3).await;
        // Only two units of product 3 exist
        system.add_product(3).await;

        system.update_product_amount(UpdateAmount { product_id: 1, amount: 3 }).await;
        // Not in the cart yet
        system.update_product_amount(UpdateAmount { product_id: 2, amount: 1 }).await;
        system.update_product_amount(UpdateAmount { product_id: 1, amount: 0 }).await;

        system.remove_product(3).await;
    }
    .instrument(span)
    .await;

    for notice in notices.drain() {
        warn!(message = %notice.message, "Shopper notice");
    }

    let cart = system.cart().await?;
    for entry in cart.entries() {
        info!(product_id = entry.id(), name = %entry.product.name, amount = entry.amount, "Cart entry");
    }
    info!(cart_size = cart.len(), "Final cart");

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
