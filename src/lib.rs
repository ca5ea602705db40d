//! # Storefront Cart
//!
//! Client-side shopping cart state for a storefront, reconciled against live stock.
//!
//! ## Terminology Note
//!
//! - **Service** (e.g. [`CartService`](cart::CartService)) = an actor owning state
//! - **Client** (e.g. [`CartClient`](clients::CartClient)) = a cloneable handle to a service
//!
//! ## Ingredients
//!
//! - **Domain types** - [`Product`](domain::Product), [`Stock`](domain::Stock),
//!   [`CartEntry`](domain::CartEntry), [`Cart`](domain::Cart)
//! - **Resource actors** - generic catalog and stock services → [`actor_framework::ResourceActor`]
//! - **Cart manager** - add / remove / update against the stock oracle → [`cart::CartManager`]
//! - **Snapshot store** - local persistence of the cart → [`store::SnapshotStore`]
//! - **System coordinator** - startup, wiring, notices, shutdown → [`app_system::CartSystem`]
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use storefront_cart::app_system::{CartConfig, CartSystem};
//! use storefront_cart::domain::{Product, Stock};
//! use storefront_cart::store::MemoryStore;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let (system, mut notices) = CartSystem::new(&CartConfig::default(), MemoryStore::new());
//! system.product_client.put_product(Product::new(1, "Tenis", 139.9)).await?;
//! system.stock_client.put_stock(Stock::new(1, 3)).await?;
//!
//! system.add_product(1).await;
//! for notice in notices.drain() {
//!     eprintln!("{}", notice.message);
//! }
//!
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod cart;
pub mod clients;
pub mod domain;
pub mod error;
pub mod messages;
pub mod notifier;
pub mod product_actor;
pub mod stock_actor;
pub mod store;

#[cfg(test)]
mod mock_framework;
