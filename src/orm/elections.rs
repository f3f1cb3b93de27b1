//! SeaORM Entity for elections table

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "elections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    /// Election type as stored; parsed with `ElectionType::parse`.
    #[sea_orm(column_name = "type")]
    pub type_: String,
    pub status: String,
    pub start_date: DateTime,
    pub end_date: DateTime,
    pub nomination_start: Option<DateTime>,
    pub nomination_end: Option<DateTime>,
    pub candidate_voting_start: Option<DateTime>,
    pub candidate_voting_end: Option<DateTime>,
    /// Null falls back to the election type default.
    pub enable_separate_voting_periods: Option<bool>,
    /// Null falls back to the election type default.
    pub show_unopposed_status: Option<bool>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::candidates::Entity")]
    Candidates,
    #[sea_orm(has_many = "super::initiatives::Entity")]
    Initiatives,
    #[sea_orm(has_many = "super::votes::Entity")]
    Votes,
}

impl Related<super::candidates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Candidates.def()
    }
}

impl Related<super::initiatives::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Initiatives.def()
    }
}

impl Related<super::votes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
