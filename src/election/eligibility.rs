//! Member eligibility. Only members in good standing may nominate or vote.

use super::ElectionError;
use crate::orm::members;
use chrono::NaiveDateTime;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};

pub async fn find_member(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<members::Model>, DbErr> {
    members::Entity::find()
        .filter(members::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// The caller's membership record, if it is active and unexpired at `now`.
pub async fn ensure_eligible_member(
    db: &DatabaseConnection,
    user_id: i32,
    now: NaiveDateTime,
) -> Result<members::Model, ElectionError> {
    match find_member(db, user_id).await? {
        Some(member) if member.is_eligible_at(now) => Ok(member),
        Some(member) => {
            log::info!(
                "User {} refused: membership {:?}, expires {:?}",
                user_id,
                member.status,
                member.expires_at
            );
            Err(ElectionError::NotEligible)
        }
        None => Err(ElectionError::NotEligible),
    }
}
