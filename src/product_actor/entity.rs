use crate::actor_framework::Entity;
use crate::domain::{Product, ProductId, ProductPatch};

impl Entity for Product {
    type Id = ProductId;
    type Patch = ProductPatch;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// Updates the product's display fields.
    ///
    /// # Errors
    /// Rejects negative or non-finite prices.
    fn on_update(&mut self, patch: ProductPatch) -> Result<(), String> {
        if let Some(price) = patch.price {
            if !price.is_finite() || price < 0.0 {
                return Err(format!("Invalid price: {}", price));
            }
            self.price = price;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        Ok(())
    }
}
