use tokio::sync::oneshot;

use crate::domain::{Cart, ProductId, UpdateAmount};
use crate::error::CartError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed messages for the cart service. Each variant carries its parameters and
/// a oneshot channel for the reply.
#[derive(Debug)]
pub enum CartRequest {
    AddProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<(), CartError>,
    },
    RemoveProduct {
        product_id: ProductId,
        respond_to: ServiceResponse<(), CartError>,
    },
    UpdateProductAmount {
        update: UpdateAmount,
        respond_to: ServiceResponse<(), CartError>,
    },
    GetCart {
        respond_to: ServiceResponse<Cart, CartError>,
    },
    CartSize {
        respond_to: ServiceResponse<usize, CartError>,
    },
    AmountOf {
        product_id: ProductId,
        respond_to: ServiceResponse<Option<u32>, CartError>,
    },
    Shutdown,
}
