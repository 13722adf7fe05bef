use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dim_customer")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub customer_key: i64,
    #[sea_orm(unique)]
    pub customer_id: String,
    pub full_name: String,
    pub email: Option<String>,
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub loyalty_tier: Option<String>,
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
