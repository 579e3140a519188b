//! Expenditure payers table: the members who fronted the money for an
//! expenditure. The converted total is split evenly among them when the
//! payment ledger is built.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenditure_payers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub expenditure_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenditures::Entity",
        from = "Column::ExpenditureId",
        to = "super::expenditures::Column::Id"
    )]
    Expenditures,
}

impl Related<super::expenditures::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenditures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
