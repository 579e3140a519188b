//! Distribution shares table and domain type.
//!
//! A `Share` attributes an exact rational fraction of an expenditure's total
//! to one user. Fractions of one expenditure usually sum to 1 but the engine
//! does not rely on it; the CRUD layer owns that validation.

use sea_orm::entity::prelude::*;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "distribution_shares")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub expenditure_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    pub numerator: i64,
    pub denominator: i64,
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

/// One user's exact fractional share of an expenditure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub user_id: String,
    pub numerator: i64,
    pub denominator: i64,
}

impl TryFrom<Model> for Share {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        if model.denominator <= 0 {
            return Err(EngineError::Inconsistency(format!(
                "share for {} in expenditure {} has a non-positive denominator",
                model.user_id, model.expenditure_id
            )));
        }
        if model.numerator < 0 {
            return Err(EngineError::Inconsistency(format!(
                "share for {} in expenditure {} has a negative numerator",
                model.user_id, model.expenditure_id
            )));
        }
        Ok(Self {
            user_id: model.user_id,
            numerator: model.numerator,
            denominator: model.denominator,
        })
    }
}
