use serde::{Deserialize, Serialize};

use super::ProductId;

/// Units of a product currently available, as reported by the stock service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: ProductId,
    pub amount: u32,
}

/// Payload for updating a stock record.
#[derive(Debug, Clone, Copy)]
pub enum StockPatch {
    Set(u32),
    Restock(u32),
}

impl Stock {
    pub fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }
}
