use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ghframes_core::{DomainError, DomainResult, Entity, InvoiceId, StockItemId};

use crate::number::InvoiceNumber;

/// One sold quantity of one stock item within an invoice.
///
/// `size`, `variant` and `unit_price` are snapshotted at sale time and never
/// re-derived from the live stock record; `stock_item_id` is a weak
/// reference and the record may be deleted independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub stock_item_id: StockItemId,
    pub size: String,
    pub variant: String,
    pub quantity: i64,
    pub unit_price: u64,
    pub line_amount: u64,
}

impl InvoiceLine {
    /// Human-readable label used in error messages.
    pub fn describe(&self) -> String {
        format!("{} {}", self.size, self.variant)
    }
}

/// A recorded sale with line items and a generated invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: InvoiceNumber,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub lines: Vec<InvoiceLine>,
    pub total_amount: u64,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Validate a draft and build a new invoice under the given number.
    pub fn from_draft(
        draft: InvoiceDraft,
        invoice_number: InvoiceNumber,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let lines = build_lines(&draft)?;

        Ok(Self {
            id: InvoiceId::new(),
            invoice_number,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            lines,
            total_amount: draft.total_amount,
            date: draft.date.unwrap_or(now),
            created_at: now,
        })
    }

    /// Validate a draft and apply it over this invoice, keeping the identity
    /// fields (`id`, `invoice_number`, `created_at`). The stored date is
    /// kept unless the draft supplies a new one.
    pub fn apply_draft(&self, draft: InvoiceDraft) -> DomainResult<Self> {
        let lines = build_lines(&draft)?;

        Ok(Self {
            id: self.id,
            invoice_number: self.invoice_number.clone(),
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            lines,
            total_amount: draft.total_amount,
            date: draft.date.unwrap_or(self.date),
            created_at: self.created_at,
        })
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

fn build_lines(draft: &InvoiceDraft) -> DomainResult<Vec<InvoiceLine>> {
    if draft.customer_name.trim().is_empty() {
        return Err(DomainError::validation("customer name is required"));
    }
    if draft.items.is_empty() {
        return Err(DomainError::validation("invoice must have at least one item"));
    }

    let mut lines = Vec::with_capacity(draft.items.len());
    for item in &draft.items {
        if item.quantity <= 0 {
            return Err(DomainError::validation(format!(
                "quantity for {} {} must be positive",
                item.size, item.variant
            )));
        }
        let line_amount = (item.quantity as u64)
            .checked_mul(item.unit_price)
            .ok_or_else(|| DomainError::validation("line amount overflow"))?;

        lines.push(InvoiceLine {
            stock_item_id: item.stock_item_id,
            size: item.size.clone(),
            variant: item.variant.clone(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            line_amount,
        });
    }

    Ok(lines)
}

/// Incoming sale (or edit) as submitted by the request layer. The descriptive
/// line fields are the caller's snapshot of the stock record at sale time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub items: Vec<DraftLine>,
    pub total_amount: u64,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// One requested line within a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftLine {
    pub stock_item_id: StockItemId,
    pub size: String,
    pub variant: String,
    pub quantity: i64,
    pub unit_price: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_line(quantity: i64) -> DraftLine {
        DraftLine {
            stock_item_id: StockItemId::new(),
            size: "13x19".to_string(),
            variant: "Gold".to_string(),
            quantity,
            unit_price: 500,
        }
    }

    fn draft(items: Vec<DraftLine>) -> InvoiceDraft {
        InvoiceDraft {
            customer_name: "A".to_string(),
            customer_phone: None,
            items,
            total_amount: 1500,
            date: None,
        }
    }

    #[test]
    fn from_draft_snapshots_lines_and_computes_amounts() {
        let d = draft(vec![draft_line(3)]);
        let invoice =
            Invoice::from_draft(d, InvoiceNumber::from_suffix(1), Utc::now()).unwrap();

        assert_eq!(invoice.invoice_number.as_str(), "GHW#001");
        assert_eq!(invoice.lines.len(), 1);
        assert_eq!(invoice.lines[0].line_amount, 1500);
        assert_eq!(invoice.total_amount, 1500);
    }

    #[test]
    fn empty_items_fail_validation() {
        let d = draft(vec![]);
        let err =
            Invoice::from_draft(d, InvoiceNumber::from_suffix(1), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_customer_name_fails_validation() {
        let mut d = draft(vec![draft_line(1)]);
        d.customer_name = "   ".to_string();
        let err =
            Invoice::from_draft(d, InvoiceNumber::from_suffix(1), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn non_positive_quantity_fails_validation() {
        let d = draft(vec![draft_line(0)]);
        let err =
            Invoice::from_draft(d, InvoiceNumber::from_suffix(1), Utc::now()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn apply_draft_keeps_identity_and_number() {
        let original =
            Invoice::from_draft(draft(vec![draft_line(3)]), InvoiceNumber::from_suffix(7), Utc::now())
                .unwrap();

        let mut edit = draft(vec![draft_line(5)]);
        edit.customer_name = "B".to_string();
        edit.total_amount = 2500;

        let updated = original.apply_draft(edit).unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.invoice_number, original.invoice_number);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.customer_name, "B");
        assert_eq!(updated.lines[0].quantity, 5);
        // Date was not supplied, so the stored one is kept.
        assert_eq!(updated.date, original.date);
    }
}
