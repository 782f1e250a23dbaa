use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ghframes_core::{DomainError, DomainResult, Entity, StockItemId};

/// Stock-keeping record: one frame size/variant combination.
///
/// `price` is in the smallest currency unit. `quantity` is on-hand stock;
/// it may go negative through an unchecked sale (create-invoice does not
/// pre-check availability).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: StockItemId,
    pub size: String,
    pub variant: String,
    pub price: u64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StockItem {
    /// Validate a creation request and build the record.
    pub fn create(new: NewStockItem, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.size.trim().is_empty() {
            return Err(DomainError::validation("size cannot be empty"));
        }
        if new.variant.trim().is_empty() {
            return Err(DomainError::validation("variant cannot be empty"));
        }
        if new.quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }

        Ok(Self {
            id: StockItemId::new(),
            size: new.size,
            variant: new.variant,
            price: new.price,
            quantity: new.quantity,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an explicit-presence patch: absent fields stay unchanged,
    /// present fields are applied even when zero.
    pub fn apply_patch(&mut self, patch: StockItemPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(size) = patch.size {
            if size.trim().is_empty() {
                return Err(DomainError::validation("size cannot be empty"));
            }
            self.size = size;
        }
        if let Some(variant) = patch.variant {
            if variant.trim().is_empty() {
                return Err(DomainError::validation("variant cannot be empty"));
            }
            self.variant = variant;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(quantity) = patch.quantity {
            if quantity < 0 {
                return Err(DomainError::validation("quantity cannot be negative"));
            }
            self.quantity = quantity;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Human-readable label used in error messages ("13x19 Gold").
    pub fn describe(&self) -> String {
        format!("{} {}", self.size, self.variant)
    }
}

impl Entity for StockItem {
    type Id = StockItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Creation request for a stock item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockItem {
    pub size: String,
    pub variant: String,
    pub price: u64,
    #[serde(default)]
    pub quantity: i64,
}

/// Explicit-presence partial update for a stock item.
///
/// `None` means "not in the request"; `Some` is applied verbatim, so a caller
/// can deliberately set price or quantity to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItemPatch {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
    #[serde(default)]
    pub price: Option<u64>,
    #[serde(default)]
    pub quantity: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item() -> NewStockItem {
        NewStockItem {
            size: "13x19".to_string(),
            variant: "Gold".to_string(),
            price: 500,
            quantity: 10,
        }
    }

    #[test]
    fn create_validates_required_fields() {
        let item = StockItem::create(new_item(), Utc::now()).unwrap();
        assert_eq!(item.size, "13x19");
        assert_eq!(item.variant, "Gold");
        assert_eq!(item.quantity, 10);

        let mut blank = new_item();
        blank.size = "  ".to_string();
        let err = StockItem::create(blank, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_rejects_negative_quantity() {
        let mut new = new_item();
        new.quantity = -1;
        let err = StockItem::create(new, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn patch_applies_only_present_fields() {
        let mut item = StockItem::create(new_item(), Utc::now()).unwrap();

        let patch = StockItemPatch {
            price: Some(0),
            quantity: Some(0),
            ..Default::default()
        };
        item.apply_patch(patch, Utc::now()).unwrap();

        // Zero is a deliberate value, not "unchanged".
        assert_eq!(item.price, 0);
        assert_eq!(item.quantity, 0);
        assert_eq!(item.size, "13x19");
        assert_eq!(item.variant, "Gold");
    }

    #[test]
    fn patch_rejects_blank_strings() {
        let mut item = StockItem::create(new_item(), Utc::now()).unwrap();
        let patch = StockItemPatch {
            variant: Some(String::new()),
            ..Default::default()
        };
        let err = item.apply_patch(patch, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(item.variant, "Gold");
    }

    #[test]
    fn describe_joins_size_and_variant() {
        let item = StockItem::create(new_item(), Utc::now()).unwrap();
        assert_eq!(item.describe(), "13x19 Gold");
    }
}
