//! Catalog-side resource logic for product records.

pub mod entity;

use crate::actor_framework::ResourceActor;
use crate::clients::ProductClient;
use crate::domain::Product;

/// Creates a new catalog actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Product>, ProductClient) {
    let (actor, generic_client) = ResourceActor::new("catalog", buffer_size);
    (actor, ProductClient::new(generic_client))
}
