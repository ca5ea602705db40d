//! Stock levels per product, served the same way as catalog records.

pub mod entity;

use crate::actor_framework::ResourceActor;
use crate::clients::StockClient;
use crate::domain::Stock;

/// Creates a new stock actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Stock>, StockClient) {
    let (actor, generic_client) = ResourceActor::new("stock", buffer_size);
    (actor, StockClient::new(generic_client))
}
