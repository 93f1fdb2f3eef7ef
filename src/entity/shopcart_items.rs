use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "shopcart_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub shopcart_id: i32,
    pub product_id: i32,
    pub name: String,
    pub quantity: i32,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub price: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shopcarts::Entity",
        from = "Column::ShopcartId",
        to = "super::shopcarts::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Shopcarts,
}

impl Related<super::shopcarts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shopcarts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
