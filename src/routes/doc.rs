use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        analysis::{ProductSales, StoreStats},
        categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
        customers::{CreateCustomerRequest, CustomerList},
        orders::{
            BulkStatusRequest, BulkStatusResponse, CreateOrderRequest, CreateOrderResponse,
            EnrichedOrder, EnrichedOrderList, LineItemProduct, OrderLineItem, UpdateOrderRequest,
        },
        products::{CreateProductRequest, ProductList, UpdateProductRequest},
    },
    models::{Category, Customer, Order, Product},
    response::{ApiResponse, Meta},
    routes::{analysis, categories, customers, health, orders, params, products, seed},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::create_product,
        products::upsert_product,
        products::delete_product,
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        customers::list_customers,
        customers::create_customer,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order,
        orders::bulk_update_status,
        orders::orders_shipped,
        orders::orders_unshipped,
        analysis::revenue_for_product,
        analysis::highest_selling,
        analysis::store_stats,
        seed::create_sample_data,
    ),
    components(
        schemas(
            Category,
            Product,
            Customer,
            Order,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            CreateCategoryRequest,
            UpdateCategoryRequest,
            CategoryList,
            CreateCustomerRequest,
            CustomerList,
            CreateOrderRequest,
            UpdateOrderRequest,
            CreateOrderResponse,
            EnrichedOrder,
            EnrichedOrderList,
            LineItemProduct,
            OrderLineItem,
            BulkStatusRequest,
            BulkStatusResponse,
            ProductSales,
            StoreStats,
            params::ListParams,
            params::OrderListQuery,
            params::ProductQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<EnrichedOrder>,
            ApiResponse<EnrichedOrderList>,
            ApiResponse<ProductSales>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Product endpoints"),
        (name = "Categories", description = "Category endpoints"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Legacy Orders", description = "Pre-pagination storefront views"),
        (name = "Analysis", description = "Sales analysis endpoints"),
        (name = "Utility", description = "Operational helpers"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
