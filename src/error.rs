use thiserror::Error;

use crate::domain::ProductId;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Catalog query timed out after {0} ms")]
    Timeout(u128),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StockError {
    #[error("No stock record for product: {0}")]
    NotFound(ProductId),
    #[error("Stock query timed out after {0} ms")]
    Timeout(u128),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Snapshot store I/O error on key {key}: {message}")]
    Io { key: String, message: String },
    #[error("Snapshot encoding error: {0}")]
    Encoding(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: i64,
        available: u32,
    },
    #[error("Stock query failed: {0}")]
    StockUnavailable(#[from] StockError),
    #[error("Catalog query failed: {0}")]
    CatalogUnavailable(#[from] CatalogError),
    #[error("Product not in cart: {0}")]
    NotInCart(ProductId),
    #[error("Cart snapshot could not be persisted: {0}")]
    Persistence(#[from] StoreError),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl CartError {
    pub fn is_out_of_stock(&self) -> bool {
        matches!(self, CartError::OutOfStock { .. })
    }
}
