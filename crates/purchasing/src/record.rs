use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ghframes_core::{DomainError, DomainResult, Entity, PurchaseId};

/// A logged vendor purchase. Independent of stock items by design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    pub id: PurchaseId,
    pub vendor_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub cost: u64,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseRecord {
    /// Validate a creation request and build the record.
    pub fn create(new: NewPurchase, now: DateTime<Utc>) -> DomainResult<Self> {
        if new.vendor_name.trim().is_empty() {
            return Err(DomainError::validation("vendor name is required"));
        }
        if new.product_name.trim().is_empty() {
            return Err(DomainError::validation("product name is required"));
        }
        if new.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }
        if new.cost == 0 {
            return Err(DomainError::validation("cost must be positive"));
        }

        Ok(Self {
            id: PurchaseId::new(),
            vendor_name: new.vendor_name,
            product_name: new.product_name,
            quantity: new.quantity,
            cost: new.cost,
            date: new.date.unwrap_or(now),
            notes: new.notes,
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply an explicit-presence patch: absent fields stay unchanged,
    /// present fields are applied even when zero or empty. A present empty
    /// `notes` clears the field.
    pub fn apply_patch(&mut self, patch: PurchasePatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(vendor_name) = patch.vendor_name {
            if vendor_name.trim().is_empty() {
                return Err(DomainError::validation("vendor name cannot be empty"));
            }
            self.vendor_name = vendor_name;
        }
        if let Some(product_name) = patch.product_name {
            if product_name.trim().is_empty() {
                return Err(DomainError::validation("product name cannot be empty"));
            }
            self.product_name = product_name;
        }
        if let Some(quantity) = patch.quantity {
            if quantity < 0 {
                return Err(DomainError::validation("quantity cannot be negative"));
            }
            // Unlike creation, an explicit zero is accepted here: presence in
            // the patch means the caller wants the value set.
            self.quantity = quantity;
        }
        if let Some(cost) = patch.cost {
            self.cost = cost;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(notes) = patch.notes {
            self.notes = if notes.is_empty() { None } else { Some(notes) };
        }
        self.updated_at = now;
        Ok(())
    }
}

impl Entity for PurchaseRecord {
    type Id = PurchaseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Creation request for a purchase record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPurchase {
    pub vendor_name: String,
    pub product_name: String,
    pub quantity: i64,
    pub cost: u64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Explicit-presence partial update for a purchase record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchasePatch {
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub cost: Option<u64>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_purchase() -> NewPurchase {
        NewPurchase {
            vendor_name: "Sharma Timber".to_string(),
            product_name: "Teak moulding".to_string(),
            quantity: 40,
            cost: 12_000,
            date: None,
            notes: Some("8ft lengths".to_string()),
        }
    }

    #[test]
    fn create_requires_all_mandatory_fields() {
        let record = PurchaseRecord::create(new_purchase(), Utc::now()).unwrap();
        assert_eq!(record.vendor_name, "Sharma Timber");
        assert_eq!(record.quantity, 40);

        let mut missing = new_purchase();
        missing.product_name = String::new();
        let err = PurchaseRecord::create(missing, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut zero_cost = new_purchase();
        zero_cost.cost = 0;
        let err = PurchaseRecord::create(zero_cost, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn create_defaults_date_to_now() {
        let now = Utc::now();
        let record = PurchaseRecord::create(new_purchase(), now).unwrap();
        assert_eq!(record.date, now);
    }

    #[test]
    fn patch_applies_present_zero_and_clears_notes() {
        let mut record = PurchaseRecord::create(new_purchase(), Utc::now()).unwrap();

        let patch = PurchasePatch {
            cost: Some(0),
            notes: Some(String::new()),
            ..Default::default()
        };
        record.apply_patch(patch, Utc::now()).unwrap();

        assert_eq!(record.cost, 0);
        assert_eq!(record.notes, None);
        // Absent fields stayed put.
        assert_eq!(record.vendor_name, "Sharma Timber");
        assert_eq!(record.quantity, 40);
    }

    #[test]
    fn patch_accepts_explicit_zero_quantity_but_not_negative() {
        let mut record = PurchaseRecord::create(new_purchase(), Utc::now()).unwrap();

        let patch = PurchasePatch {
            quantity: Some(0),
            ..Default::default()
        };
        record.apply_patch(patch, Utc::now()).unwrap();
        assert_eq!(record.quantity, 0);

        let patch = PurchasePatch {
            quantity: Some(-1),
            ..Default::default()
        };
        let err = record.apply_patch(patch, Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
