//! `SeaORM` Entity for vat_ledger_lines table.
//!
//! A read projection of posted ledger entries, maintained by the
//! accounting ledger. The engine never writes to it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "vat_ledger_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub document_number: String,
    pub document_type: String,
    pub document_date: Date,
    pub vat_date: Date,
    pub counterparty_vat_number: Option<String>,
    pub counterparty_name: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub tax_base: Decimal,
    #[sea_orm(column_type = "Decimal(Some((15, 2)))")]
    pub vat_amount: Decimal,
    pub operation: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::companies::Entity",
        from = "Column::CompanyId",
        to = "super::companies::Column::Id"
    )]
    Companies,
}

impl Related<super::companies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Companies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
