use serde::{Deserialize, Serialize};

pub type ProductId = u64;

/// Represents a product in the storefront catalog.
///
/// The cart only keeps a snapshot of this record; display fields are opaque to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub image: String,
}

/// Payload for updating a catalog product.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub image: Option<String>,
}

impl Product {
    pub fn new(id: ProductId, name: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            image: String::new(),
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }
}
