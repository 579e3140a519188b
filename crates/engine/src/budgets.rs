//! Budgets table and domain type.
//!
//! A budget row is either owned by a member (`user_id` set) or session-wide
//! (`user_id` null). The aggregator only reads them; amounts are non-negative
//! by CRUD-layer contract.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{CurrencyCode, EngineError, MoneyMinor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub session_id: String,
    pub user_id: Option<String>,
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
}

impl Related<super::sessions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sessions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub amount: MoneyMinor,
    pub currency: CurrencyCode,
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        if model.amount_minor < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "budget {} has a negative amount",
                model.id
            )));
        }
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("budget not exists".to_string()))?,
            user_id: model.user_id,
            amount: MoneyMinor::new(model.amount_minor),
            currency: CurrencyCode::try_from(model.currency.as_str())?,
        })
    }
}
