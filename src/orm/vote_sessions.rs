//! SeaORM Entity for vote_sessions table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which ballot a session covers. Candidate and initiative ballots are
/// submitted independently.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(20))")]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    #[sea_orm(string_value = "candidates")]
    Candidates,
    #[sea_orm(string_value = "initiatives")]
    Initiatives,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Candidates => "candidates",
            Self::Initiatives => "initiatives",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vote_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub election_id: i32,
    pub session_type: SessionType,
    pub started_at: DateTime,
    pub completed_at: Option<DateTime>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::elections::Entity",
        from = "Column::ElectionId",
        to = "super::elections::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Election,
}

impl Related<super::elections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Election.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
