//! Voting-window evaluation.
//!
//! All comparisons are on naive UTC timestamps. The general window
//! `[start_date, end_date]` is inclusive at both ends and governs initiative
//! voting. Candidate voting may close earlier when separate voting periods
//! are enabled.

use super::voting_config::VotingConfig;
use crate::orm::elections;
use chrono::NaiveDateTime;
use serde::Serialize;

/// `start_date <= now <= end_date`
pub fn general_window_open(election: &elections::Model, now: NaiveDateTime) -> bool {
    election.start_date <= now && now <= election.end_date
}

/// Initiative voting always follows the general window.
pub fn initiative_voting_open(election: &elections::Model, now: NaiveDateTime) -> bool {
    general_window_open(election, now)
}

/// Candidate-specific gate, layered on top of the general window by callers.
///
/// `candidate_voting_start` is not consulted: the lower bound of
/// candidate voting is the general `start_date`.
pub fn candidate_window_open(config: &VotingConfig, now: NaiveDateTime) -> bool {
    if !config.enable_separate_voting_periods {
        return true;
    }
    match config.candidate_voting_end {
        None => true,
        Some(end) => now < end,
    }
}

/// Candidate voting as enforced on ballot submission.
pub fn candidate_voting_open(
    election: &elections::Model,
    config: &VotingConfig,
    now: NaiveDateTime,
) -> bool {
    general_window_open(election, now) && candidate_window_open(config, now)
}

/// Whether candidate voting is over, as opposed to not yet started.
pub fn candidate_voting_ended(
    election: &elections::Model,
    config: &VotingConfig,
    now: NaiveDateTime,
) -> bool {
    match (config.enable_separate_voting_periods, config.candidate_voting_end) {
        (true, Some(end)) => now >= end,
        _ => now > election.end_date,
    }
}

/// Nominations need both bounds set; a missing bound means closed.
pub fn nomination_window_open(election: &elections::Model, now: NaiveDateTime) -> bool {
    match (election.nomination_start, election.nomination_end) {
        (Some(start), Some(end)) => start <= now && now <= end,
        _ => false,
    }
}

/// Snapshot of every window for one election at one instant.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingStatus {
    pub now: NaiveDateTime,
    pub general_voting_open: bool,
    pub candidate_voting_open: bool,
    pub initiative_voting_open: bool,
    pub candidate_voting_ended: bool,
    pub election_ended: bool,
    pub nominations_open: bool,
    pub separate_voting_periods: bool,
    pub show_unopposed_status: bool,
    pub candidate_voting_start: Option<NaiveDateTime>,
    pub candidate_voting_end: Option<NaiveDateTime>,
}

impl VotingStatus {
    pub fn evaluate(
        election: &elections::Model,
        config: &VotingConfig,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            now,
            general_voting_open: general_window_open(election, now),
            candidate_voting_open: candidate_voting_open(election, config, now),
            initiative_voting_open: initiative_voting_open(election, now),
            candidate_voting_ended: candidate_voting_ended(election, config, now),
            election_ended: now > election.end_date,
            nominations_open: nomination_window_open(election, now),
            separate_voting_periods: config.enable_separate_voting_periods,
            show_unopposed_status: config.show_unopposed_status,
            candidate_voting_start: config.candidate_voting_start,
            candidate_voting_end: config.candidate_voting_end,
        }
    }
}
