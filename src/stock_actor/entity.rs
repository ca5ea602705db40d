use crate::actor_framework::Entity;
use crate::domain::{ProductId, Stock, StockPatch};

impl Entity for Stock {
    type Id = ProductId;
    type Patch = StockPatch;

    fn id(&self) -> &ProductId {
        &self.id
    }

    /// # Errors
    /// A restock that would overflow the counter is rejected.
    fn on_update(&mut self, patch: StockPatch) -> Result<(), String> {
        match patch {
            StockPatch::Set(amount) => self.amount = amount,
            StockPatch::Restock(units) => {
                self.amount = self
                    .amount
                    .checked_add(units)
                    .ok_or_else(|| format!("Stock overflow: {} + {}", self.amount, units))?;
            }
        }
        Ok(())
    }
}
