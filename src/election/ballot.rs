//! Ballot submission.
//!
//! A member submits at most one candidate ballot and one initiative ballot
//! per election. The ballot is claimed by completing its `vote_sessions` row
//! inside the same transaction that writes the votes and the confirmation,
//! so a second submission either waits on the first and then finds the
//! session completed, or fails outright. Either way it writes nothing.

use super::confirmation::issue_confirmation;
use super::eligibility::ensure_eligible_member;
use super::window::{candidate_voting_open, initiative_voting_open};
use super::{find_election, ElectionError, VotingConfig};
use crate::orm::vote_sessions::SessionType;
use crate::orm::votes::VoteValue;
use crate::orm::{candidates, initiatives, vote_sessions, votes};
use chrono::NaiveDateTime;
use sea_orm::{
    entity::*, query::*, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult,
    Statement, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Clone, Debug, Deserialize)]
pub struct CandidateBallot {
    pub candidate_ids: Vec<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InitiativeChoice {
    pub initiative_id: i32,
    pub vote: VoteValue,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InitiativeBallot {
    pub choices: Vec<InitiativeChoice>,
}

/// Returned to the member once a ballot is stored.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BallotReceipt {
    pub election_id: i32,
    pub session_type: SessionType,
    pub confirmation_code: String,
    pub votes_recorded: usize,
    pub submitted_at: NaiveDateTime,
}

/// Check a candidate selection against the election's candidates.
///
/// `on_ballot` is every candidate of the election among the requested ids.
pub fn validate_candidate_selection(
    requested: &[i32],
    on_ballot: &[candidates::Model],
) -> Result<(), ElectionError> {
    if requested.is_empty() {
        return Err(ElectionError::InvalidBallot(
            "select at least one candidate".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for id in requested {
        if !seen.insert(*id) {
            return Err(ElectionError::InvalidBallot(format!(
                "candidate {} selected more than once",
                id
            )));
        }
        if !on_ballot.iter().any(|c| c.id == *id) {
            return Err(ElectionError::InvalidBallot(format!(
                "candidate {} is not on this ballot",
                id
            )));
        }
    }

    let mut positions = HashSet::new();
    for candidate in on_ballot.iter().filter(|c| seen.contains(&c.id)) {
        if !positions.insert(candidate.position.as_str()) {
            return Err(ElectionError::InvalidBallot(format!(
                "only one candidate may be selected for {}",
                candidate.position
            )));
        }
    }

    Ok(())
}

/// Check initiative choices against the election's initiatives.
pub fn validate_initiative_choices(
    choices: &[InitiativeChoice],
    on_ballot: &[initiatives::Model],
) -> Result<(), ElectionError> {
    if choices.is_empty() {
        return Err(ElectionError::InvalidBallot(
            "vote on at least one initiative".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for choice in choices {
        if !seen.insert(choice.initiative_id) {
            return Err(ElectionError::InvalidBallot(format!(
                "initiative {} voted on more than once",
                choice.initiative_id
            )));
        }
        if !on_ballot.iter().any(|i| i.id == choice.initiative_id) {
            return Err(ElectionError::InvalidBallot(format!(
                "initiative {} is not on this ballot",
                choice.initiative_id
            )));
        }
    }

    Ok(())
}

#[derive(Debug, FromQueryResult)]
struct ClaimedSession {
    id: i32,
}

/// Complete the member's session for this ballot. `None` if it was already
/// completed.
async fn claim_session<C>(
    conn: &C,
    user_id: i32,
    election_id: i32,
    session_type: SessionType,
    now: NaiveDateTime,
) -> Result<Option<i32>, DbErr>
where
    C: ConnectionTrait,
{
    let claimed = ClaimedSession::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        INSERT INTO vote_sessions (user_id, election_id, session_type, started_at, completed_at)
        VALUES ($1, $2, $3, $4, $4)
        ON CONFLICT (user_id, election_id, session_type)
        DO UPDATE SET completed_at = EXCLUDED.completed_at
        WHERE vote_sessions.completed_at IS NULL
        RETURNING id
        "#,
        vec![
            user_id.into(),
            election_id.into(),
            session_type.as_str().into(),
            now.into(),
        ],
    ))
    .one(conn)
    .await?;

    Ok(claimed.map(|row| row.id))
}

async fn record_ballot(
    db: &DatabaseConnection,
    user_id: i32,
    election_id: i32,
    session_type: SessionType,
    rows: Vec<votes::ActiveModel>,
    now: NaiveDateTime,
) -> Result<BallotReceipt, ElectionError> {
    let txn = db.begin().await?;

    if claim_session(&txn, user_id, election_id, session_type, now)
        .await?
        .is_none()
    {
        txn.rollback().await?;
        return Err(ElectionError::AlreadyVoted);
    }

    let votes_recorded = rows.len();
    for row in rows {
        row.insert(&txn).await?;
    }

    let confirmation = issue_confirmation(&txn, user_id, election_id, session_type, now).await?;
    txn.commit().await?;

    log::info!(
        "Recorded {} ballot for user {} in election {} ({} votes)",
        session_type.as_str(),
        user_id,
        election_id,
        votes_recorded
    );

    Ok(BallotReceipt {
        election_id,
        session_type,
        confirmation_code: confirmation.confirmation_code,
        votes_recorded,
        submitted_at: now,
    })
}

pub async fn submit_candidate_ballot(
    db: &DatabaseConnection,
    user_id: i32,
    election_id: i32,
    ballot: CandidateBallot,
    now: NaiveDateTime,
) -> Result<BallotReceipt, ElectionError> {
    let election = find_election(db, election_id).await?;
    let config =
        VotingConfig::from_election(&election).map_err(|e| ElectionError::Config(e.into()))?;
    if !candidate_voting_open(&election, &config, now) {
        return Err(ElectionError::VotingClosed);
    }

    ensure_eligible_member(db, user_id, now).await?;

    if ballot.candidate_ids.is_empty() {
        return Err(ElectionError::InvalidBallot(
            "select at least one candidate".to_string(),
        ));
    }

    let on_ballot = candidates::Entity::find()
        .filter(candidates::Column::ElectionId.eq(election_id))
        .filter(candidates::Column::Id.is_in(ballot.candidate_ids.clone()))
        .all(db)
        .await?;
    validate_candidate_selection(&ballot.candidate_ids, &on_ballot)?;

    let rows = on_ballot
        .iter()
        .map(|candidate| votes::ActiveModel {
            user_id: Set(user_id),
            election_id: Set(election_id),
            candidate_id: Set(Some(candidate.id)),
            initiative_id: Set(None),
            position: Set(Some(candidate.position.clone())),
            vote_value: Set(None),
            voted_at: Set(now),
            ..Default::default()
        })
        .collect();

    record_ballot(db, user_id, election_id, SessionType::Candidates, rows, now).await
}

pub async fn submit_initiative_ballot(
    db: &DatabaseConnection,
    user_id: i32,
    election_id: i32,
    ballot: InitiativeBallot,
    now: NaiveDateTime,
) -> Result<BallotReceipt, ElectionError> {
    let election = find_election(db, election_id).await?;
    if !initiative_voting_open(&election, now) {
        return Err(ElectionError::VotingClosed);
    }

    ensure_eligible_member(db, user_id, now).await?;

    if ballot.choices.is_empty() {
        return Err(ElectionError::InvalidBallot(
            "vote on at least one initiative".to_string(),
        ));
    }

    let on_ballot = initiatives::Entity::find()
        .filter(initiatives::Column::ElectionId.eq(election_id))
        .all(db)
        .await?;
    validate_initiative_choices(&ballot.choices, &on_ballot)?;

    let rows = ballot
        .choices
        .iter()
        .map(|choice| votes::ActiveModel {
            user_id: Set(user_id),
            election_id: Set(election_id),
            candidate_id: Set(None),
            initiative_id: Set(Some(choice.initiative_id)),
            position: Set(None),
            vote_value: Set(Some(choice.vote)),
            voted_at: Set(now),
            ..Default::default()
        })
        .collect();

    record_ballot(db, user_id, election_id, SessionType::Initiatives, rows, now).await
}

/// Ballots the member has already completed in an election.
pub async fn completed_sessions(
    db: &DatabaseConnection,
    user_id: i32,
    election_id: i32,
) -> Result<Vec<SessionType>, DbErr> {
    let sessions = vote_sessions::Entity::find()
        .filter(vote_sessions::Column::UserId.eq(user_id))
        .filter(vote_sessions::Column::ElectionId.eq(election_id))
        .filter(vote_sessions::Column::CompletedAt.is_not_null())
        .all(db)
        .await?;
    Ok(sessions.into_iter().map(|s| s.session_type).collect())
}
