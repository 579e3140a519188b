//! Expenditures table and domain type.
//!
//! An `Expenditure` is a shared cost: a total price in some currency, the set
//! of members who fronted the money (payers) and the fractional distribution
//! of responsibility among members (shares). Payers and shares live in their
//! own tables and are attached after the base rows are loaded.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{Category, CurrencyCode, EngineError, MoneyMinor, shares::Share};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenditures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub session_id: String,
    pub name: String,
    pub category: String,
    pub amount_minor: i64,
    pub currency: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sessions::Entity",
        from = "Column::SessionId",
        to = "super::sessions::Column::Id"
    )]
    Sessions,
    #[sea_orm(has_many = "super::payers::Entity")]
    Payers,
    #[sea_orm(has_many = "super::shares::Entity")]
    Shares,
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl Related<super::payers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payers.def()
    }
}

impl Related<super::shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct Expenditure {
    pub id: Uuid,
    pub name: String,
    pub category: Category,
    pub total: MoneyMinor,
    pub currency: CurrencyCode,
    pub payers: Vec<String>,
    pub shares: Vec<Share>,
}

impl TryFrom<Model> for Expenditure {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        if model.amount_minor < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "expenditure {} has a negative total",
                model.id
            )));
        }
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expenditure not exists".to_string()))?,
            name: model.name,
            category: Category::parse(&model.category),
            total: MoneyMinor::new(model.amount_minor),
            currency: CurrencyCode::try_from(model.currency.as_str())?,
            payers: Vec::new(),
            shares: Vec::new(),
        })
    }
}
