//! SeaORM Entity for candidates table
//!
//! One nomination per user per election, enforced by the
//! `(election_id, user_id)` unique index.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "candidates")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub election_id: i32,
    pub user_id: i32,
    pub position: String,
    pub full_name: String,
    pub bio: Option<String>,
    pub manifesto: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime,
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
    #[sea_orm(has_many = "super::votes::Entity")]
    Votes,
}

impl Related<super::elections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Election.def()
    }
}

impl Related<super::votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
