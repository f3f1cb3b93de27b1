//! SeaORM Entity for members table

use sea_orm::entity::prelude::*;

/// Membership standing
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
pub enum MemberStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "lapsed")]
    Lapsed,
    #[sea_orm(string_value = "suspended")]
    Suspended,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub full_name: String,
    pub email: Option<String>,
    pub status: MemberStatus,
    pub joined_at: DateTime,
    pub expires_at: Option<DateTime>,
}

impl Model {
    /// Active standing with no lapsed expiry as of `now`.
    pub fn is_eligible_at(&self, now: DateTime) -> bool {
        self.status == MemberStatus::Active && self.expires_at.map_or(true, |exp| exp > now)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
