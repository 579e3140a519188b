//! Repayments table and domain type.
//!
//! A `Repayment` records money one member already sent another outside the
//! settlement flow. The reconciler subtracts them from netted obligations;
//! the engine never writes them.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

use crate::{CurrencyCode, EngineError, MoneyMinor};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "repayments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub session_id: String,
    pub sender: String,
    pub receiver: String,
    pub amount_minor: i64,
    pub currency: String,
    pub occurred_at: DateTimeUtc,
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
pub struct Repayment {
    pub id: Uuid,
    pub sender: String,
    pub receiver: String,
    pub amount: MoneyMinor,
    pub currency: CurrencyCode,
    pub occurred_at: DateTime<Utc>,
}

impl TryFrom<Model> for Repayment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        if model.amount_minor < 0 {
            return Err(EngineError::InvalidAmount(format!(
                "repayment {} has a negative amount",
                model.id
            )));
        }
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("repayment not exists".to_string()))?,
            sender: model.sender,
            receiver: model.receiver,
            amount: MoneyMinor::new(model.amount_minor),
            currency: CurrencyCode::try_from(model.currency.as_str())?,
            occurred_at: model.occurred_at,
        })
    }
}
