//! `SeaORM` Entity for companies table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub vat_number: String,
    pub submitter_name: String,
    #[sea_orm(column_type = "Decimal(Some((4, 3)))", nullable)]
    pub credit_coefficient: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::vat_returns::Entity")]
    VatReturns,
    #[sea_orm(has_many = "super::vat_ledger_lines::Entity")]
    VatLedgerLines,
}

impl Related<super::vat_returns::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VatReturns.def()
    }
}

impl Related<super::vat_ledger_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VatLedgerLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
