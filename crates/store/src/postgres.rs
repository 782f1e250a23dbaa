//! Postgres-backed store adapter.
//!
//! Billing commits run inside a single transaction with `SELECT ... FOR
//! UPDATE` row locks on every touched stock item, so concurrent billing
//! operations against the same items serialize instead of losing updates,
//! and a failed operation rolls back without leaving partial quantity
//! mutations behind.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Postgres, Row, Transaction};
use uuid::Uuid;

use ghframes_billing::{Invoice, InvoiceLine, InvoiceNumber, InvoiceStore, InvoiceWrite};
use ghframes_core::{DomainError, DomainResult, InvoiceId, PurchaseId, StockItemId};
use ghframes_inventory::{NewStockItem, StockItem, StockItemPatch, StockMovementPlan, StockStore};
use ghframes_purchasing::{NewPurchase, PurchasePatch, PurchaseRecord, PurchaseStore};

/// Postgres adapter for all three store ports.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect with pool defaults suitable for a single-shop deployment.
    pub async fn connect(database_url: &str) -> DomainResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(std::time::Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the schema if it doesn't exist. Idempotent.
    pub async fn migrate(&self) -> DomainResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS stock_items (
                id UUID PRIMARY KEY,
                size TEXT NOT NULL,
                variant TEXT NOT NULL,
                price BIGINT NOT NULL,
                quantity BIGINT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("migrate stock_items", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS invoices (
                id UUID PRIMARY KEY,
                invoice_number TEXT NOT NULL UNIQUE,
                customer_name TEXT NOT NULL,
                customer_phone TEXT,
                lines JSONB NOT NULL,
                total_amount BIGINT NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("migrate invoices", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS purchases (
                id UUID PRIMARY KEY,
                vendor_name TEXT NOT NULL,
                product_name TEXT NOT NULL,
                quantity BIGINT NOT NULL,
                cost BIGINT NOT NULL,
                date TIMESTAMPTZ NOT NULL,
                notes TEXT,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("migrate purchases", e))?;

        Ok(())
    }

    async fn write_invoice(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        write: InvoiceWrite,
    ) -> DomainResult<()> {
        match write {
            InvoiceWrite::Insert(invoice) => {
                let lines = lines_to_json(&invoice.lines)?;
                sqlx::query(
                    r#"
                    INSERT INTO invoices
                        (id, invoice_number, customer_name, customer_phone,
                         lines, total_amount, date, created_at)
                    VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                    "#,
                )
                .bind(invoice.id.as_uuid())
                .bind(invoice.invoice_number.as_str())
                .bind(&invoice.customer_name)
                .bind(&invoice.customer_phone)
                .bind(&lines)
                .bind(invoice.total_amount as i64)
                .bind(invoice.date)
                .bind(invoice.created_at)
                .execute(&mut **tx)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        DomainError::conflict(format!(
                            "invoice number {} already exists",
                            invoice.invoice_number
                        ))
                    } else {
                        map_sqlx_error("insert_invoice", e)
                    }
                })?;
            }
            InvoiceWrite::Update(invoice) => {
                let lines = lines_to_json(&invoice.lines)?;
                let result = sqlx::query(
                    r#"
                    UPDATE invoices
                    SET customer_name = $2, customer_phone = $3, lines = $4,
                        total_amount = $5, date = $6
                    WHERE id = $1
                    "#,
                )
                .bind(invoice.id.as_uuid())
                .bind(&invoice.customer_name)
                .bind(&invoice.customer_phone)
                .bind(&lines)
                .bind(invoice.total_amount as i64)
                .bind(invoice.date)
                .execute(&mut **tx)
                .await
                .map_err(|e| map_sqlx_error("update_invoice", e))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::not_found(format!("invoice {}", invoice.id)));
                }
            }
            InvoiceWrite::Delete(id) => {
                let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
                    .bind(id.as_uuid())
                    .execute(&mut **tx)
                    .await
                    .map_err(|e| map_sqlx_error("delete_invoice", e))?;

                if result.rows_affected() == 0 {
                    return Err(DomainError::not_found(format!("invoice {id}")));
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl StockStore for PgStore {
    async fn get_stock(&self, id: StockItemId) -> DomainResult<Option<StockItem>> {
        let row = sqlx::query("SELECT * FROM stock_items WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_stock", e))?;

        row.map(|r| stock_from_row(&r)).transpose()
    }

    async fn list_stocks(&self) -> DomainResult<Vec<StockItem>> {
        let rows = sqlx::query("SELECT * FROM stock_items ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_stocks", e))?;

        rows.iter().map(stock_from_row).collect()
    }

    async fn insert_stock(&self, new: NewStockItem) -> DomainResult<StockItem> {
        let item = StockItem::create(new, Utc::now())?;
        sqlx::query(
            r#"
            INSERT INTO stock_items (id, size, variant, price, quantity, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.size)
        .bind(&item.variant)
        .bind(item.price as i64)
        .bind(item.quantity)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_stock", e))?;

        Ok(item)
    }

    async fn update_stock(
        &self,
        id: StockItemId,
        patch: StockItemPatch,
    ) -> DomainResult<StockItem> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        let row = sqlx::query("SELECT * FROM stock_items WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_stock", e))?
            .ok_or_else(|| DomainError::not_found(format!("stock item {id}")))?;

        let mut item = stock_from_row(&row)?;
        item.apply_patch(patch, Utc::now())?;

        sqlx::query(
            r#"
            UPDATE stock_items
            SET size = $2, variant = $3, price = $4, quantity = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.size)
        .bind(&item.variant)
        .bind(item.price as i64)
        .bind(item.quantity)
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_stock", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(item)
    }

    async fn remove_stock(&self, id: StockItemId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM stock_items WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_stock", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("stock item {id}")));
        }
        Ok(())
    }

    async fn adjust_quantity(&self, id: StockItemId, delta: i64) -> DomainResult<StockItem> {
        let row = sqlx::query(
            r#"
            UPDATE stock_items
            SET quantity = quantity + $2, updated_at = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id.as_uuid())
        .bind(delta)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("adjust_quantity", e))?
        .ok_or_else(|| DomainError::not_found(format!("stock item {id}")))?;

        stock_from_row(&row)
    }
}

#[async_trait]
impl InvoiceStore for PgStore {
    async fn get_invoice(&self, id: InvoiceId) -> DomainResult<Option<Invoice>> {
        let row = sqlx::query("SELECT * FROM invoices WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_invoice", e))?;

        row.map(|r| invoice_from_row(&r)).transpose()
    }

    async fn list_invoices(&self) -> DomainResult<Vec<Invoice>> {
        let rows = sqlx::query("SELECT * FROM invoices")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_invoices", e))?;

        rows.iter().map(invoice_from_row).collect()
    }

    async fn commit_billing(
        &self,
        plan: &StockMovementPlan,
        write: InvoiceWrite,
    ) -> DomainResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        // Lock every touched stock row up front, in id order, so concurrent
        // billing commits serialize instead of deadlocking.
        let mut ids: Vec<Uuid> = plan
            .restock
            .iter()
            .chain(plan.issue.iter())
            .map(|m| *m.stock_item_id.as_uuid())
            .collect();
        ids.sort();
        ids.dedup();

        let rows = sqlx::query(
            "SELECT id, quantity FROM stock_items WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(&ids)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("lock_stock", e))?;

        let mut on_hand = std::collections::HashMap::with_capacity(rows.len());
        for row in &rows {
            let id: Uuid = row.try_get("id").map_err(row_error)?;
            let quantity: i64 = row.try_get("quantity").map_err(row_error)?;
            on_hand.insert(StockItemId::from_uuid(id), quantity);
        }

        let staged = plan.stage(|id| on_hand.get(&id).copied())?;

        let now = Utc::now();
        for (id, quantity) in staged {
            sqlx::query("UPDATE stock_items SET quantity = $2, updated_at = $3 WHERE id = $1")
                .bind(id.as_uuid())
                .bind(quantity)
                .bind(now)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("apply_movement", e))?;
        }

        self.write_invoice(&mut tx, write).await?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))
    }
}

#[async_trait]
impl PurchaseStore for PgStore {
    async fn get_purchase(&self, id: PurchaseId) -> DomainResult<Option<PurchaseRecord>> {
        let row = sqlx::query("SELECT * FROM purchases WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_purchase", e))?;

        row.map(|r| purchase_from_row(&r)).transpose()
    }

    async fn list_purchases(&self) -> DomainResult<Vec<PurchaseRecord>> {
        let rows = sqlx::query("SELECT * FROM purchases ORDER BY date DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_purchases", e))?;

        rows.iter().map(purchase_from_row).collect()
    }

    async fn insert_purchase(&self, new: NewPurchase) -> DomainResult<PurchaseRecord> {
        let record = PurchaseRecord::create(new, Utc::now())?;
        sqlx::query(
            r#"
            INSERT INTO purchases
                (id, vendor_name, product_name, quantity, cost, date, notes,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.vendor_name)
        .bind(&record.product_name)
        .bind(record.quantity)
        .bind(record.cost as i64)
        .bind(record.date)
        .bind(&record.notes)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_purchase", e))?;

        Ok(record)
    }

    async fn update_purchase(
        &self,
        id: PurchaseId,
        patch: PurchasePatch,
    ) -> DomainResult<PurchaseRecord> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin", e))?;

        let row = sqlx::query("SELECT * FROM purchases WHERE id = $1 FOR UPDATE")
            .bind(id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_purchase", e))?
            .ok_or_else(|| DomainError::not_found(format!("purchase {id}")))?;

        let mut record = purchase_from_row(&row)?;
        record.apply_patch(patch, Utc::now())?;

        sqlx::query(
            r#"
            UPDATE purchases
            SET vendor_name = $2, product_name = $3, quantity = $4, cost = $5,
                date = $6, notes = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(&record.vendor_name)
        .bind(&record.product_name)
        .bind(record.quantity)
        .bind(record.cost as i64)
        .bind(record.date)
        .bind(&record.notes)
        .bind(record.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("update_purchase", e))?;

        tx.commit().await.map_err(|e| map_sqlx_error("commit", e))?;
        Ok(record)
    }

    async fn remove_purchase(&self, id: PurchaseId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("remove_purchase", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!("purchase {id}")));
        }
        Ok(())
    }
}

// Row mapping

fn stock_from_row(row: &PgRow) -> DomainResult<StockItem> {
    let id: Uuid = row.try_get("id").map_err(row_error)?;
    let price: i64 = row.try_get("price").map_err(row_error)?;

    Ok(StockItem {
        id: StockItemId::from_uuid(id),
        size: row.try_get("size").map_err(row_error)?,
        variant: row.try_get("variant").map_err(row_error)?,
        price: unsigned(price, "price")?,
        quantity: row.try_get("quantity").map_err(row_error)?,
        created_at: row.try_get("created_at").map_err(row_error)?,
        updated_at: row.try_get("updated_at").map_err(row_error)?,
    })
}

fn invoice_from_row(row: &PgRow) -> DomainResult<Invoice> {
    let id: Uuid = row.try_get("id").map_err(row_error)?;
    let number: String = row.try_get("invoice_number").map_err(row_error)?;
    let lines: serde_json::Value = row.try_get("lines").map_err(row_error)?;
    let lines: Vec<InvoiceLine> = serde_json::from_value(lines)
        .map_err(|e| DomainError::storage(format!("invalid invoice lines: {e}")))?;
    let total_amount: i64 = row.try_get("total_amount").map_err(row_error)?;

    Ok(Invoice {
        id: InvoiceId::from_uuid(id),
        invoice_number: InvoiceNumber::new(number),
        customer_name: row.try_get("customer_name").map_err(row_error)?,
        customer_phone: row.try_get("customer_phone").map_err(row_error)?,
        lines,
        total_amount: unsigned(total_amount, "total_amount")?,
        date: row.try_get("date").map_err(row_error)?,
        created_at: row.try_get("created_at").map_err(row_error)?,
    })
}

fn purchase_from_row(row: &PgRow) -> DomainResult<PurchaseRecord> {
    let id: Uuid = row.try_get("id").map_err(row_error)?;
    let cost: i64 = row.try_get("cost").map_err(row_error)?;

    Ok(PurchaseRecord {
        id: PurchaseId::from_uuid(id),
        vendor_name: row.try_get("vendor_name").map_err(row_error)?,
        product_name: row.try_get("product_name").map_err(row_error)?,
        quantity: row.try_get("quantity").map_err(row_error)?,
        cost: unsigned(cost, "cost")?,
        date: row.try_get("date").map_err(row_error)?,
        notes: row.try_get("notes").map_err(row_error)?,
        created_at: row.try_get("created_at").map_err(row_error)?,
        updated_at: row.try_get("updated_at").map_err(row_error)?,
    })
}

fn lines_to_json(lines: &[InvoiceLine]) -> DomainResult<serde_json::Value> {
    serde_json::to_value(lines)
        .map_err(|e| DomainError::storage(format!("failed to serialize invoice lines: {e}")))
}

fn unsigned(value: i64, field: &str) -> DomainResult<u64> {
    u64::try_from(value)
        .map_err(|_| DomainError::storage(format!("negative {field} in stored row")))
}

fn row_error(err: sqlx::Error) -> DomainError {
    DomainError::storage(format!("failed to read row: {err}"))
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> DomainError {
    DomainError::storage(format!("{operation}: {err}"))
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = err {
        if let Some(code) = db_err.code() {
            return code.as_ref() == "23505";
        }
    }
    false
}
