use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dim_product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub product_key: i64,
    #[sea_orm(unique)]
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub sub_category: Option<String>,
    pub brand: Option<String>,
    pub unit_cost: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::fact_orders::Entity")]
    FactOrders,
}

impl Related<super::fact_orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FactOrders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
