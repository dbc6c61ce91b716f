pub mod analysis_service;
pub mod category_service;
pub mod customer_service;
pub mod order_service;
pub mod pricing;
pub mod product_service;
pub mod seed_service;
