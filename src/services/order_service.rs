use chrono::{DateTime, Utc};

use crate::{
    audit::log_audit,
    db::DbPool,
    dto::orders::{
        BulkStatusRequest, BulkStatusResponse, CreateOrderRequest, CreateOrderResponse,
        EnrichedOrder, EnrichedOrderList, LineItemProduct, OrderLineItem, UpdateOrderRequest,
    },
    error::{AppError, AppResult},
    models::{Customer, Order, Product},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::pricing::effective_price,
};

const NO_ADDRESS: &str = "No address provided";

pub async fn list_orders(
    pool: &DbPool,
    query: OrderListQuery,
) -> AppResult<ApiResponse<EnrichedOrderList>> {
    let (skip, limit) = query.list.normalize();

    let orders: Vec<Order> = sqlx::query_as(
        r#"
        SELECT * FROM orders
        WHERE ($1::boolean IS NULL OR status = $1)
        ORDER BY id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.shipped)
    .bind(limit)
    .bind(skip)
    .fetch_all(pool)
    .await?;

    let total: (i64,) =
        sqlx::query_as("SELECT count(*) FROM orders WHERE ($1::boolean IS NULL OR status = $1)")
            .bind(query.shipped)
            .fetch_one(pool)
            .await?;

    let items = enrich_all(pool, &orders).await?;
    let meta = Meta::new(skip, limit, total.0);
    Ok(ApiResponse::success(
        "Orders",
        EnrichedOrderList { items },
        Some(meta),
    ))
}

pub async fn get_order(pool: &DbPool, id: i32) -> AppResult<ApiResponse<EnrichedOrder>> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".to_string())),
    };

    let view = enrich_order(pool, &order)
        .await?
        .ok_or(AppError::AssociatedEntityMissing)?;

    Ok(ApiResponse::success("Order", view, Some(Meta::empty())))
}

/// Validates both references inside one transaction before inserting, so
/// an order is never created against a product or customer deleted
/// mid-request.
pub async fn create_order(
    pool: &DbPool,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<CreateOrderResponse>> {
    let mut txn = pool.begin().await?;

    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(payload.product_id)
        .fetch_optional(&mut *txn)
        .await?;
    let product = match product {
        Some(p) => p,
        None => {
            return Err(AppError::NotFound(format!(
                "Product with ID {} not found",
                payload.product_id
            )));
        }
    };

    let customer: Option<Customer> = sqlx::query_as("SELECT * FROM customers WHERE id = $1")
        .bind(payload.customer_id)
        .fetch_optional(&mut *txn)
        .await?;
    let customer = match customer {
        Some(c) => c,
        None => return Err(AppError::NotFound("Customer not found".to_string())),
    };

    let order: Order = sqlx::query_as(
        r#"
        INSERT INTO orders (product_id, customer_id, quantity, address, phone)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(payload.product_id)
    .bind(payload.customer_id)
    .bind(payload.quantity)
    .bind(payload.address)
    .bind(payload.phone)
    .fetch_one(&mut *txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        pool,
        "order_create",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let amount_paid = effective_price(&product) * order.quantity as f64;
    let data = CreateOrderResponse {
        id: order.id,
        product_id: order.product_id,
        customer_id: order.customer_id,
        quantity: order.quantity,
        address: order.address,
        phone: order.phone,
        date_ordered: order.date.map(|d| d.format("%Y-%m-%d").to_string()),
        status: order.status,
        date_shipped: order.date_shipped.map(|dt| dt.to_rfc3339()),
        amount_paid,
        customer_email: customer.email,
    };

    Ok(ApiResponse::success(
        "Order created",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn update_order(
    pool: &DbPool,
    id: i32,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<EnrichedOrder>> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let mut order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound("Order not found".to_string())),
    };

    if let Some(product_id) = payload.product_id {
        order.product_id = product_id;
    }
    if let Some(customer_id) = payload.customer_id {
        order.customer_id = customer_id;
    }
    if let Some(quantity) = payload.quantity {
        order.quantity = quantity;
    }
    if let Some(address) = payload.address {
        order.address = address;
    }
    if let Some(phone) = payload.phone {
        order.phone = phone;
    }
    if let Some(status) = payload.status {
        order.date_shipped = resolve_date_shipped(status, order.date_shipped, Utc::now());
        order.status = status;
    }

    let order: Order = sqlx::query_as(
        r#"
        UPDATE orders
        SET product_id = $2, customer_id = $3, quantity = $4,
            address = $5, phone = $6, status = $7, date_shipped = $8
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(order.id)
    .bind(order.product_id)
    .bind(order.customer_id)
    .bind(order.quantity)
    .bind(order.address)
    .bind(order.phone)
    .bind(order.status)
    .bind(order.date_shipped)
    .fetch_one(pool)
    .await?;

    if let Err(err) = log_audit(
        pool,
        "order_update",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let view = enrich_order(pool, &order)
        .await?
        .ok_or(AppError::AssociatedEntityMissing)?;

    Ok(ApiResponse::success(
        "Order updated",
        view,
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(
    pool: &DbPool,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Order not found".to_string()));
    }

    if let Err(err) = log_audit(
        pool,
        "order_delete",
        Some("orders"),
        Some(serde_json::json!({ "order_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        format!("Order {id} deleted successfully"),
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Applies the shipping-status rule to every listed order. Ids that do
/// not resolve are skipped rather than failing the batch.
pub async fn bulk_update_status(
    pool: &DbPool,
    payload: BulkStatusRequest,
) -> AppResult<ApiResponse<BulkStatusResponse>> {
    let mut updated = Vec::new();

    for id in payload.order_ids {
        let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        let Some(order) = order else { continue };

        let date_shipped = resolve_date_shipped(payload.status, order.date_shipped, Utc::now());
        sqlx::query("UPDATE orders SET status = $2, date_shipped = $3 WHERE id = $1")
            .bind(id)
            .bind(payload.status)
            .bind(date_shipped)
            .execute(pool)
            .await?;
        updated.push(id);
    }

    if let Err(err) = log_audit(
        pool,
        "order_bulk_status",
        Some("orders"),
        Some(serde_json::json!({ "order_ids": &updated, "status": payload.status })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let data = BulkStatusResponse {
        updated_count: updated.len() as i64,
        order_ids: updated,
    };
    Ok(ApiResponse::success(
        format!("{} orders updated", data.updated_count),
        data,
        Some(Meta::empty()),
    ))
}

pub async fn list_shipped(pool: &DbPool) -> AppResult<ApiResponse<EnrichedOrderList>> {
    let items = list_by_status(pool, true).await?;
    Ok(ApiResponse::success(
        "Shipped orders",
        EnrichedOrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn list_unshipped(pool: &DbPool) -> AppResult<ApiResponse<EnrichedOrderList>> {
    let items = list_by_status(pool, false).await?;
    Ok(ApiResponse::success(
        "Unshipped orders",
        EnrichedOrderList { items },
        Some(Meta::empty()),
    ))
}

async fn list_by_status(pool: &DbPool, shipped: bool) -> AppResult<Vec<EnrichedOrder>> {
    let orders: Vec<Order> =
        sqlx::query_as("SELECT * FROM orders WHERE status = $1 ORDER BY id")
            .bind(shipped)
            .fetch_all(pool)
            .await?;
    enrich_all(pool, &orders).await
}

/// Join an order to its product and customer and derive the legacy view.
/// `None` means a reference no longer resolves: list callers drop the
/// order, single-order callers surface `AssociatedEntityMissing`.
pub async fn enrich_order(pool: &DbPool, order: &Order) -> AppResult<Option<EnrichedOrder>> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(order.product_id)
        .fetch_optional(pool)
        .await?;
    let customer: Option<Customer> = sqlx::query_as("SELECT * FROM customers WHERE id = $1")
        .bind(order.customer_id)
        .fetch_optional(pool)
        .await?;

    let (Some(product), Some(customer)) = (product, customer) else {
        return Ok(None);
    };

    Ok(Some(build_enriched(order, &product, &customer)))
}

async fn enrich_all(pool: &DbPool, orders: &[Order]) -> AppResult<Vec<EnrichedOrder>> {
    let mut items = Vec::with_capacity(orders.len());
    for order in orders {
        if let Some(view) = enrich_order(pool, order).await? {
            items.push(view);
        }
    }
    Ok(items)
}

fn build_enriched(order: &Order, product: &Product, customer: &Customer) -> EnrichedOrder {
    let price = effective_price(product);
    let full_name = format!("{} {}", customer.first_name, customer.last_name)
        .trim()
        .to_string();
    let shipping_address = order
        .address
        .as_deref()
        .filter(|a| !a.is_empty())
        .map_or_else(|| NO_ADDRESS.to_string(), str::to_string);

    EnrichedOrder {
        id: order.id,
        full_name,
        email: customer.email.clone(),
        shipping_address,
        amount_paid: price * order.quantity as f64,
        date_ordered: order.date.map(|d| d.format("%Y-%m-%d").to_string()),
        shipped: order.status,
        date_shipped: order
            .date_shipped
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string()),
        items_list: vec![OrderLineItem {
            product: LineItemProduct {
                name: product.name.clone(),
            },
            quantity: order.quantity,
            price,
        }],
    }
}

/// Single authority for the "`date_shipped` set iff shipped" invariant.
/// Marking an already-shipped order shipped again keeps its original
/// timestamp; unshipping always clears it.
pub(crate) fn resolve_date_shipped(
    new_status: bool,
    current: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if new_status { current.or(Some(now)) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn product() -> Product {
        Product {
            id: 1,
            name: "Widget".into(),
            price: 100.0,
            category_id: 1,
            description: None,
            image: None,
            is_sale: true,
            sale_price: 80.0,
        }
    }

    fn customer(first: &str, last: &str) -> Customer {
        Customer {
            id: 1,
            first_name: first.into(),
            last_name: last.into(),
            phone: None,
            email: "john.doe@example.com".into(),
            password: "hash".into(),
        }
    }

    fn order() -> Order {
        Order {
            id: 7,
            product_id: 1,
            customer_id: 1,
            quantity: 3,
            address: None,
            phone: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 5),
            status: false,
            date_shipped: None,
        }
    }

    #[test]
    fn enriched_view_uses_effective_price() {
        let view = build_enriched(&order(), &product(), &customer("John", "Doe"));
        assert_eq!(view.amount_paid, 240.0);
        assert_eq!(view.items_list.len(), 1);
        assert_eq!(view.items_list[0].price, 80.0);
        assert_eq!(view.items_list[0].quantity, 3);
        assert_eq!(view.items_list[0].product.name, "Widget");
    }

    #[test]
    fn full_name_is_trimmed_when_a_part_is_empty() {
        let view = build_enriched(&order(), &product(), &customer("", "Doe"));
        assert_eq!(view.full_name, "Doe");
        let view = build_enriched(&order(), &product(), &customer("John", ""));
        assert_eq!(view.full_name, "John");
    }

    #[test]
    fn missing_or_empty_address_gets_placeholder() {
        let view = build_enriched(&order(), &product(), &customer("John", "Doe"));
        assert_eq!(view.shipping_address, "No address provided");

        let mut with_empty = order();
        with_empty.address = Some(String::new());
        let view = build_enriched(&with_empty, &product(), &customer("John", "Doe"));
        assert_eq!(view.shipping_address, "No address provided");

        let mut with_address = order();
        with_address.address = Some("42 Elm Street".into());
        let view = build_enriched(&with_address, &product(), &customer("John", "Doe"));
        assert_eq!(view.shipping_address, "42 Elm Street");
    }

    #[test]
    fn date_fields_use_the_legacy_formats() {
        let mut shipped = order();
        shipped.status = true;
        shipped.date_shipped = Some(Utc.with_ymd_and_hms(2024, 3, 6, 14, 30, 59).unwrap());

        let view = build_enriched(&shipped, &product(), &customer("John", "Doe"));
        assert_eq!(view.date_ordered.as_deref(), Some("2024-03-05"));
        assert_eq!(view.date_shipped.as_deref(), Some("2024-03-06 14:30"));
        assert!(view.shipped);
    }

    #[test]
    fn shipping_stamps_only_when_unset() {
        let now = Utc.with_ymd_and_hms(2024, 3, 6, 12, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        assert_eq!(resolve_date_shipped(true, None, now), Some(now));
        assert_eq!(resolve_date_shipped(true, Some(earlier), now), Some(earlier));
        assert_eq!(resolve_date_shipped(false, Some(earlier), now), None);
        assert_eq!(resolve_date_shipped(false, None, now), None);
    }
}
