//! "Elected unopposed" classification.
//!
//! The election-wide flag is all-or-nothing: a single contested position
//! suppresses unopposed styling for every position, including positions with
//! a sole nominee. `uncontested_positions` carries the per-position view
//! alongside it.

use super::voting_config::VotingConfig;
use super::window::candidate_voting_ended;
use crate::orm::elections;
use chrono::NaiveDateTime;
use sea_orm::{DatabaseConnection, DbBackend, DbErr, FromQueryResult, Statement};
use serde::Serialize;

/// Candidate count for one ballot position.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult)]
pub struct PositionCount {
    pub position: String,
    pub candidate_count: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnopposedStatus {
    /// Show "elected unopposed" badges across the election.
    pub election_wide: bool,
    /// Positions with exactly one candidate, regardless of the election-wide flag.
    pub uncontested_positions: Vec<String>,
}

impl UnopposedStatus {
    pub fn is_position_uncontested(&self, position: &str) -> bool {
        self.uncontested_positions.iter().any(|p| p == position)
    }
}

/// Classify from per-position counts.
pub fn classify_unopposed(
    show_unopposed_status: bool,
    voting_ended: bool,
    counts: &[PositionCount],
) -> UnopposedStatus {
    let uncontested_positions: Vec<String> = counts
        .iter()
        .filter(|c| c.candidate_count == 1)
        .map(|c| c.position.clone())
        .collect();

    let has_candidates = counts.iter().any(|c| c.candidate_count > 0);
    let any_contested = counts.iter().any(|c| c.candidate_count > 1);

    UnopposedStatus {
        election_wide: show_unopposed_status && voting_ended && has_candidates && !any_contested,
        uncontested_positions,
    }
}

/// Group candidates into per-position counts, in order of first appearance.
pub fn position_counts<'a, I>(positions: I) -> Vec<PositionCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<PositionCount> = Vec::new();
    for position in positions {
        match counts.iter_mut().find(|c| c.position == position) {
            Some(c) => c.candidate_count += 1,
            None => counts.push(PositionCount {
                position: position.to_string(),
                candidate_count: 1,
            }),
        }
    }
    counts
}

/// Candidate counts per position for an election.
pub async fn fetch_position_counts(
    db: &DatabaseConnection,
    election_id: i32,
) -> Result<Vec<PositionCount>, DbErr> {
    PositionCount::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        r#"
        SELECT position, COUNT(*) AS candidate_count
        FROM candidates
        WHERE election_id = $1
        GROUP BY position
        ORDER BY MIN(id)
        "#,
        vec![election_id.into()],
    ))
    .all(db)
    .await
}

/// Query candidate counts and classify.
pub async fn compute_unopposed_status(
    db: &DatabaseConnection,
    election: &elections::Model,
    config: &VotingConfig,
    now: NaiveDateTime,
) -> Result<UnopposedStatus, DbErr> {
    let voting_ended = candidate_voting_ended(election, config, now);
    // Skip the query when the answer cannot be true.
    if !config.show_unopposed_status || !voting_ended {
        return Ok(UnopposedStatus::default());
    }

    let counts = fetch_position_counts(db, election.id).await?;
    Ok(classify_unopposed(
        config.show_unopposed_status,
        voting_ended,
        &counts,
    ))
}

/// `compute_unopposed_status`, reporting "not unopposed" when the lookup fails.
pub async fn compute_unopposed_status_or_default(
    db: &DatabaseConnection,
    election: &elections::Model,
    config: &VotingConfig,
    now: NaiveDateTime,
) -> UnopposedStatus {
    compute_unopposed_status(db, election, config, now)
        .await
        .unwrap_or_else(|e| {
            log::warn!(
                "Unopposed status for election {} unavailable: {}",
                election.id,
                e
            );
            UnopposedStatus::default()
        })
}
