//! Candidate self-nomination.

use super::eligibility::ensure_eligible_member;
use super::window::nomination_window_open;
use super::{find_election, ElectionError};
use chrono::NaiveDateTime;
use sea_orm::{DatabaseConnection, DbBackend, FromQueryResult, Statement};
use serde::Deserialize;
use validator::Validate;

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct NominationRequest {
    #[validate(length(min = 1, max = 100, message = "Position must be 1-100 characters"))]
    pub position: String,
    #[validate(length(min = 1, max = 200, message = "Full name must be 1-200 characters"))]
    pub full_name: String,
    #[validate(length(max = 2000, message = "Bio is too long"))]
    pub bio: Option<String>,
    #[validate(length(max = 10000, message = "Manifesto is too long"))]
    pub manifesto: Option<String>,
    #[validate(url(message = "Photo URL must be a valid URL"))]
    pub photo_url: Option<String>,
}

fn trimmed_or_none(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl NominationRequest {
    /// Trim whitespace and drop blank optional fields, as submitted by HTML forms.
    pub fn normalized(self) -> Self {
        Self {
            position: self.position.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            bio: trimmed_or_none(self.bio),
            manifesto: trimmed_or_none(self.manifesto),
            photo_url: trimmed_or_none(self.photo_url),
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct InsertedCandidate {
    id: i32,
}

/// Record a nomination and return the new candidate id.
///
/// One nomination per member per election. The unique index decides, so two
/// racing submissions cannot both succeed.
pub async fn submit_nomination(
    db: &DatabaseConnection,
    user_id: i32,
    election_id: i32,
    request: NominationRequest,
    now: NaiveDateTime,
) -> Result<i32, ElectionError> {
    let request = request.normalized();
    request
        .validate()
        .map_err(|e| ElectionError::InvalidNomination(e.to_string()))?;

    let election = find_election(db, election_id).await?;
    if !nomination_window_open(&election, now) {
        return Err(ElectionError::NominationsClosed);
    }

    ensure_eligible_member(db, user_id, now).await?;

    let inserted = InsertedCandidate::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        INSERT INTO candidates
            (election_id, user_id, position, full_name, bio, manifesto, photo_url, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (election_id, user_id) DO NOTHING
        RETURNING id
        "#,
        vec![
            election_id.into(),
            user_id.into(),
            request.position.clone().into(),
            request.full_name.into(),
            request.bio.into(),
            request.manifesto.into(),
            request.photo_url.into(),
            now.into(),
        ],
    ))
    .one(db)
    .await?;

    match inserted {
        Some(row) => {
            log::info!(
                "User {} nominated for {} in election {} (candidate {})",
                user_id,
                request.position,
                election_id,
                row.id
            );
            Ok(row.id)
        }
        None => Err(ElectionError::AlreadyNominated),
    }
}
