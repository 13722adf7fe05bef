pub mod dim_customer;
pub mod dim_date;
pub mod dim_location;
pub mod dim_product;
pub mod fact_orders;

pub use dim_customer::Entity as DimCustomer;
pub use dim_date::Entity as DimDate;
pub use dim_location::Entity as DimLocation;
pub use dim_product::Entity as DimProduct;
pub use fact_orders::Entity as FactOrders;
