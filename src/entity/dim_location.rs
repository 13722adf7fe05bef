use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dim_location")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub location_key: i64,
    pub city: String,
    pub state: String,
    pub region: String,
    #[sea_orm(unique)]
    pub postal_code: String,
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
