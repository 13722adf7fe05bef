use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fact_orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub order_line_id: i64,
    /// Shared by every line of one order.
    pub order_id: String,
    pub customer_key: i64,
    pub product_key: i64,
    pub date_key: String,
    pub location_key: i64,
    pub quantity: i32,
    pub unit_price: f64,
    pub discount_pct: f64,
    pub gross_revenue: f64,
    pub net_revenue: f64,
    pub profit: f64,
    pub is_returned: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dim_customer::Entity",
        from = "Column::CustomerKey",
        to = "super::dim_customer::Column::CustomerKey"
    )]
    DimCustomer,
    #[sea_orm(
        belongs_to = "super::dim_product::Entity",
        from = "Column::ProductKey",
        to = "super::dim_product::Column::ProductKey"
    )]
    DimProduct,
    #[sea_orm(
        belongs_to = "super::dim_date::Entity",
        from = "Column::DateKey",
        to = "super::dim_date::Column::DateKey"
    )]
    DimDate,
    #[sea_orm(
        belongs_to = "super::dim_location::Entity",
        from = "Column::LocationKey",
        to = "super::dim_location::Column::LocationKey"
    )]
    DimLocation,
}

impl Related<super::dim_customer::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DimCustomer.def()
    }
}

impl Related<super::dim_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DimProduct.def()
    }
}

impl Related<super::dim_date::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DimDate.def()
    }
}

impl Related<super::dim_location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DimLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
