use serde::Deserialize;

use ghframes_billing::Invoice;
use ghframes_inventory::StockItem;
use ghframes_purchasing::PurchaseRecord;

// -------------------------
// Request DTOs
// -------------------------
//
// Create/patch bodies deserialize straight into the domain's `New*` and
// `*Patch` types; only shapes with no domain counterpart live here.

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub delta: i64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn stock_to_json(item: StockItem) -> serde_json::Value {
    serde_json::json!({
        "id": item.id.to_string(),
        "size": item.size,
        "variant": item.variant,
        "price": item.price,
        "quantity": item.quantity,
        "created_at": item.created_at,
        "updated_at": item.updated_at,
    })
}

pub fn invoice_to_json(invoice: Invoice) -> serde_json::Value {
    serde_json::json!({
        "id": invoice.id.to_string(),
        "invoice_number": invoice.invoice_number.as_str(),
        "customer_name": invoice.customer_name,
        "customer_phone": invoice.customer_phone,
        "items": invoice.lines.iter().map(|line| serde_json::json!({
            "stock_item_id": line.stock_item_id.to_string(),
            "size": line.size,
            "variant": line.variant,
            "quantity": line.quantity,
            "unit_price": line.unit_price,
            "line_amount": line.line_amount,
        })).collect::<Vec<_>>(),
        "total_amount": invoice.total_amount,
        "date": invoice.date,
        "created_at": invoice.created_at,
    })
}

pub fn purchase_to_json(record: PurchaseRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id.to_string(),
        "vendor_name": record.vendor_name,
        "product_name": record.product_name,
        "quantity": record.quantity,
        "cost": record.cost,
        "date": record.date,
        "notes": record.notes,
        "created_at": record.created_at,
        "updated_at": record.updated_at,
    })
}
