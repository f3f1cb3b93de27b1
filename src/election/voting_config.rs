//! Per-election voting configuration: persisted columns merged with the
//! election type's defaults.

use super::kind::{ElectionType, UnknownElectionType};
use crate::orm::elections;
use chrono::NaiveDateTime;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingConfig {
    pub candidate_voting_start: Option<NaiveDateTime>,
    pub candidate_voting_end: Option<NaiveDateTime>,
    pub enable_separate_voting_periods: bool,
    pub show_unopposed_status: bool,
    /// None only for the safe default, when the election could not be read.
    pub election_type: Option<ElectionType>,
}

impl VotingConfig {
    /// Conservative configuration used when the real one cannot be loaded.
    pub fn safe_default() -> Self {
        Self {
            candidate_voting_start: None,
            candidate_voting_end: None,
            enable_separate_voting_periods: false,
            show_unopposed_status: true,
            election_type: None,
        }
    }

    /// Merge an election row with its type defaults.
    pub fn from_election(election: &elections::Model) -> Result<Self, UnknownElectionType> {
        let election_type = ElectionType::parse(&election.type_)?;
        let defaults = election_type.defaults();

        Ok(Self {
            candidate_voting_start: election.candidate_voting_start,
            candidate_voting_end: election.candidate_voting_end,
            enable_separate_voting_periods: election
                .enable_separate_voting_periods
                .unwrap_or(defaults.enable_separate_voting_periods),
            show_unopposed_status: election
                .show_unopposed_status
                .unwrap_or(defaults.show_unopposed_status),
            election_type: Some(election_type),
        })
    }

    /// `from_election`, degrading to `safe_default` on an unknown type.
    pub fn from_election_or_default(election: &elections::Model) -> Self {
        Self::from_election(election).unwrap_or_else(|e| {
            log::warn!(
                "Election {} has {}; using safe voting defaults",
                election.id,
                e
            );
            Self::safe_default()
        })
    }
}

#[derive(Debug)]
pub enum VotingConfigError {
    NotFound(i32),
    UnknownType(UnknownElectionType),
    Database(DbErr),
}

impl fmt::Display for VotingConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "election {} not found", id),
            Self::UnknownType(e) => write!(f, "{}", e),
            Self::Database(e) => write!(f, "database error: {}", e),
        }
    }
}

impl std::error::Error for VotingConfigError {}

impl From<DbErr> for VotingConfigError {
    fn from(e: DbErr) -> Self {
        Self::Database(e)
    }
}

impl From<UnknownElectionType> for VotingConfigError {
    fn from(e: UnknownElectionType) -> Self {
        Self::UnknownType(e)
    }
}

/// Load an election's voting configuration.
pub async fn load_voting_config(
    db: &DatabaseConnection,
    election_id: i32,
) -> Result<VotingConfig, VotingConfigError> {
    let election = elections::Entity::find_by_id(election_id)
        .one(db)
        .await?
        .ok_or(VotingConfigError::NotFound(election_id))?;

    Ok(VotingConfig::from_election(&election)?)
}

/// Load an election's voting configuration, falling back to
/// `VotingConfig::safe_default` on any failure. The failure is logged but
/// otherwise invisible to the caller; prefer `load_voting_config` where the
/// caller can act on the error.
pub async fn load_voting_config_or_default(
    db: &DatabaseConnection,
    election_id: i32,
) -> VotingConfig {
    match load_voting_config(db, election_id).await {
        Ok(config) => config,
        Err(e) => {
            log::warn!(
                "Voting config for election {} unavailable ({}); using safe defaults",
                election_id,
                e
            );
            VotingConfig::safe_default()
        }
    }
}
