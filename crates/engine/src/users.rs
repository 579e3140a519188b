//! Users table (minimal entity).
//!
//! The engine keys everything by `user_id`, which is the username. The
//! `currency` column is the user's default currency: debts owed *to* a user
//! are re-expressed in it, and it is the reference currency when the user
//! requests their own settlement.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
