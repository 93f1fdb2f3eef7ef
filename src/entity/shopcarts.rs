use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shopcart")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub total_price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shopcart_items::Entity")]
    ShopcartItems,
}

impl Related<super::shopcart_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShopcartItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
