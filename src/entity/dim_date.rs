use sea_orm::entity::prelude::*;

/// Keyed by the ISO date string; there is no surrogate key.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "dim_date")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub date_key: String,
    pub year: i32,
    pub quarter: i32,
    pub month: i32,
    pub month_name: String,
    pub week_of_year: i32,
    pub day_of_month: i32,
    pub day_name: String,
    pub is_weekend: bool,
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
