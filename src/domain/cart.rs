use serde::{Deserialize, Serialize};

use super::{Product, ProductId};

/// A product snapshot plus the amount the shopper selected.
///
/// Serialized flat: the product fields sit next to `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    #[serde(flatten)]
    pub product: Product,
    pub amount: u32,
}

impl CartEntry {
    pub fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    pub fn id(&self) -> ProductId {
        self.product.id
    }
}

/// Requested quantity for a product already in the cart. Non-positive amounts are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Ordered cart contents. Insertion order is the order products were first added.
///
/// At most one entry per product id; every amount is at least one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    pub fn amount_of(&self, id: ProductId) -> Option<u32> {
        self.get(id).map(|entry| entry.amount)
    }

    /// Sets the amount of an existing entry. Returns `false` if the product is absent.
    pub(crate) fn set_amount(&mut self, id: ProductId, amount: u32) -> bool {
        debug_assert!(amount >= 1);
        match self.entries.iter_mut().find(|entry| entry.id() == id) {
            Some(entry) => {
                entry.amount = amount;
                true
            }
            None => false,
        }
    }

    pub(crate) fn push(&mut self, entry: CartEntry) {
        debug_assert!(self.get(entry.id()).is_none());
        self.entries.push(entry);
    }

    /// Returns a copy without the given product, keeping the order of the rest.
    pub(crate) fn without(&self, id: ProductId) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|entry| entry.id() != id)
                .cloned()
                .collect(),
        }
    }

    /// Drops duplicate ids and non-positive amounts from a loaded snapshot.
    /// The first occurrence of an id wins.
    pub(crate) fn normalized(self) -> Self {
        let mut entries: Vec<CartEntry> = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            if entry.amount == 0 || entries.iter().any(|kept| kept.id() == entry.id()) {
                continue;
            }
            entries.push(entry);
        }
        Self { entries }
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        Self { entries }
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries
    }
}
