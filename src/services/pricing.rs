use crate::models::Product;

/// Price actually charged per unit: the sale price when a sale is active
/// and priced above zero, the list price otherwise.
///
/// Resolved fresh at every computation site. Orders never snapshot the
/// price they were placed at, so enrichment and revenue figures follow
/// the product's current pricing.
pub fn effective_price(product: &Product) -> f64 {
    if product.is_sale && product.sale_price > 0.0 {
        product.sale_price
    } else {
        product.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64, is_sale: bool, sale_price: f64) -> Product {
        Product {
            id: 1,
            name: "Widget".into(),
            price,
            category_id: 1,
            description: None,
            image: None,
            is_sale,
            sale_price,
        }
    }

    #[test]
    fn list_price_when_not_on_sale() {
        assert_eq!(effective_price(&product(100.0, false, 80.0)), 100.0);
    }

    #[test]
    fn list_price_when_sale_price_is_zero() {
        assert_eq!(effective_price(&product(100.0, true, 0.0)), 100.0);
    }

    #[test]
    fn sale_price_when_sale_is_active() {
        assert_eq!(effective_price(&product(100.0, true, 80.0)), 80.0);
    }
}
