//! Cart reconciliation: the manager that owns the cart and the service that
//! serialises access to it.

mod manager;
mod service;

pub use manager::CartManager;
pub use service::CartService;
