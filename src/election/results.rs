//! Results tallying.
//!
//! Counts are computed from a full scan of the election's vote rows. Within a
//! position, candidates are ordered by votes descending; ties keep candidate
//! id order.

use super::unopposed::{classify_unopposed, position_counts, UnopposedStatus};
use super::voting_config::VotingConfig;
use super::window::VotingStatus;
use crate::orm::members::MemberStatus;
use crate::orm::vote_sessions::SessionType;
use crate::orm::votes::VoteValue;
use crate::orm::{candidates, elections, initiatives, members, vote_sessions, votes};
use chrono::NaiveDateTime;
use sea_orm::{
    entity::*, query::*, ActiveEnum, Condition, DatabaseConnection, DbBackend, DbErr,
    FromQueryResult, Statement,
};
use serde::Serialize;
use std::collections::HashMap;

/// Share of `total` as a percentage rounded to two decimals. Zero when
/// `total` is zero.
pub fn percentage(count: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    ((count as f64 / total as f64) * 10000.0).round() / 100.0
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub candidate_id: i32,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub votes: i64,
    pub percentage: f64,
    pub is_unopposed: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionResult {
    pub position: String,
    pub total_votes: i64,
    pub uncontested: bool,
    pub candidates: Vec<CandidateTally>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VoteCounts {
    pub yes: i64,
    pub no: i64,
    pub abstain: i64,
}

impl VoteCounts {
    pub fn total(&self) -> i64 {
        self.yes + self.no + self.abstain
    }

    pub fn percentages(&self) -> VotePercentages {
        let total = self.total();
        VotePercentages {
            yes: percentage(self.yes, total),
            no: percentage(self.no, total),
            abstain: percentage(self.abstain, total),
        }
    }

    fn record(&mut self, value: VoteValue) {
        match value {
            VoteValue::Yes => self.yes += 1,
            VoteValue::No => self.no += 1,
            VoteValue::Abstain => self.abstain += 1,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct VotePercentages {
    pub yes: f64,
    pub no: f64,
    pub abstain: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeResult {
    pub initiative_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub ballot_order: i32,
    pub votes: VoteCounts,
    pub total_votes: i64,
    pub percentages: VotePercentages,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSummary {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub election_type: String,
    pub status: String,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub nomination_start: Option<NaiveDateTime>,
    pub nomination_end: Option<NaiveDateTime>,
}

impl From<&elections::Model> for ElectionSummary {
    fn from(e: &elections::Model) -> Self {
        Self {
            id: e.id,
            title: e.title.clone(),
            description: e.description.clone(),
            election_type: e.type_.clone(),
            status: e.status.clone(),
            start_date: e.start_date,
            end_date: e.end_date,
            nomination_start: e.nomination_start,
            nomination_end: e.nomination_end,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionStatistics {
    pub total_voters: i64,
    pub candidate_ballots: i64,
    pub initiative_ballots: i64,
    pub eligible_members: i64,
    pub turnout_percentage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    pub election: ElectionSummary,
    pub voting_status: VotingStatus,
    pub unopposed: UnopposedStatus,
    pub statistics: ElectionStatistics,
    pub candidate_results: Vec<PositionResult>,
    pub initiative_results: Vec<InitiativeResult>,
    pub positions: Vec<String>,
}

/// Positions in order of first nomination.
pub fn ordered_positions(candidates: &[candidates::Model]) -> Vec<String> {
    position_counts(candidates.iter().map(|c| c.position.as_str()))
        .into_iter()
        .map(|c| c.position)
        .collect()
}

/// Per-position candidate tallies. `candidates` should be in id order.
pub fn tally_candidates(
    candidates: &[candidates::Model],
    votes: &[votes::Model],
    unopposed: &UnopposedStatus,
) -> Vec<PositionResult> {
    let mut counts: HashMap<i32, i64> = candidates.iter().map(|c| (c.id, 0)).collect();
    for vote in votes {
        let Some(candidate_id) = vote.candidate_id else {
            continue;
        };
        match counts.get_mut(&candidate_id) {
            Some(n) => *n += 1,
            None => log::debug!(
                "Vote {} references candidate {} outside this election",
                vote.id,
                candidate_id
            ),
        }
    }

    ordered_positions(candidates)
        .into_iter()
        .map(|position| {
            let mut tallies: Vec<CandidateTally> = candidates
                .iter()
                .filter(|c| c.position == position)
                .map(|c| CandidateTally {
                    candidate_id: c.id,
                    full_name: c.full_name.clone(),
                    photo_url: c.photo_url.clone(),
                    votes: counts.get(&c.id).copied().unwrap_or(0),
                    percentage: 0.0,
                    is_unopposed: false,
                })
                .collect();

            // sort_by is stable: ties keep candidate order
            tallies.sort_by(|a, b| b.votes.cmp(&a.votes));

            let total_votes: i64 = tallies.iter().map(|t| t.votes).sum();
            let sole_nominee = tallies.len() == 1;
            for t in tallies.iter_mut() {
                t.percentage = percentage(t.votes, total_votes);
                t.is_unopposed = unopposed.election_wide && sole_nominee;
            }

            PositionResult {
                uncontested: unopposed.is_position_uncontested(&position),
                position,
                total_votes,
                candidates: tallies,
            }
        })
        .collect()
}

/// Yes/no/abstain tallies per initiative, in the order given.
pub fn tally_initiatives(
    initiatives: &[initiatives::Model],
    votes: &[votes::Model],
) -> Vec<InitiativeResult> {
    let mut counts: HashMap<i32, VoteCounts> =
        initiatives.iter().map(|i| (i.id, VoteCounts::default())).collect();

    for vote in votes {
        if let (Some(initiative_id), Some(value)) = (vote.initiative_id, vote.vote_value) {
            if let Some(c) = counts.get_mut(&initiative_id) {
                c.record(value);
            }
        }
    }

    initiatives
        .iter()
        .map(|i| {
            let votes = counts.get(&i.id).copied().unwrap_or_default();
            InitiativeResult {
                initiative_id: i.id,
                title: i.title.clone(),
                description: i.description.clone(),
                ballot_order: i.ballot_order,
                total_votes: votes.total(),
                percentages: votes.percentages(),
                votes,
            }
        })
        .collect()
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

/// Distinct voters, through the database's `get_election_vote_count` function.
pub async fn election_vote_count(db: &DatabaseConnection, election_id: i32) -> Result<i64, DbErr> {
    let row = CountRow::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT get_election_vote_count($1)::bigint AS count",
        vec![election_id.into()],
    ))
    .one(db)
    .await?;
    Ok(row.map_or(0, |r| r.count))
}

async fn completed_ballots(
    db: &DatabaseConnection,
    election_id: i32,
    session_type: SessionType,
) -> Result<i64, DbErr> {
    let n = vote_sessions::Entity::find()
        .filter(vote_sessions::Column::ElectionId.eq(election_id))
        .filter(vote_sessions::Column::SessionType.eq(session_type.as_str()))
        .filter(vote_sessions::Column::CompletedAt.is_not_null())
        .count(db)
        .await?;
    Ok(n as i64)
}

async fn eligible_member_count(db: &DatabaseConnection, now: NaiveDateTime) -> Result<i64, DbErr> {
    let n = members::Entity::find()
        .filter(members::Column::Status.eq(MemberStatus::Active.to_value()))
        .filter(
            Condition::any()
                .add(members::Column::ExpiresAt.is_null())
                .add(members::Column::ExpiresAt.gt(now)),
        )
        .count(db)
        .await?;
    Ok(n as i64)
}

/// Build the full results document for an election that is known to exist.
pub async fn load_election_results(
    db: &DatabaseConnection,
    election: &elections::Model,
    now: NaiveDateTime,
) -> Result<ElectionResults, DbErr> {
    let config = VotingConfig::from_election_or_default(election);
    let voting_status = VotingStatus::evaluate(election, &config, now);

    let candidates = candidates::Entity::find()
        .filter(candidates::Column::ElectionId.eq(election.id))
        .order_by_asc(candidates::Column::Id)
        .all(db)
        .await?;

    let initiatives = initiatives::Entity::find()
        .filter(initiatives::Column::ElectionId.eq(election.id))
        .order_by_asc(initiatives::Column::BallotOrder)
        .order_by_asc(initiatives::Column::Id)
        .all(db)
        .await?;

    let votes = votes::Entity::find()
        .filter(votes::Column::ElectionId.eq(election.id))
        .order_by_asc(votes::Column::Id)
        .all(db)
        .await?;

    let unopposed = classify_unopposed(
        config.show_unopposed_status,
        voting_status.candidate_voting_ended,
        &position_counts(candidates.iter().map(|c| c.position.as_str())),
    );

    let total_voters = election_vote_count(db, election.id).await?;
    let candidate_ballots = completed_ballots(db, election.id, SessionType::Candidates).await?;
    let initiative_ballots = completed_ballots(db, election.id, SessionType::Initiatives).await?;
    let eligible_members = eligible_member_count(db, now).await?;

    Ok(ElectionResults {
        election: ElectionSummary::from(election),
        candidate_results: tally_candidates(&candidates, &votes, &unopposed),
        initiative_results: tally_initiatives(&initiatives, &votes),
        positions: ordered_positions(&candidates),
        statistics: ElectionStatistics {
            total_voters,
            candidate_ballots,
            initiative_ballots,
            eligible_members,
            turnout_percentage: percentage(total_voters, eligible_members),
        },
        voting_status,
        unopposed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::election::test_support::{at, candidate, initiative, initiative_vote, vote_for};

    #[test]
    fn test_percentage_rounding() {
        let counts = VoteCounts {
            yes: 2,
            no: 1,
            abstain: 0,
        };
        let p = counts.percentages();
        assert_eq!(p.yes, 66.67);
        assert_eq!(p.no, 33.33);
        assert_eq!(p.abstain, 0.0);
    }

    #[test]
    fn test_percentage_of_nothing() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(VoteCounts::default().percentages(), VotePercentages::default());
    }

    #[test]
    fn test_candidates_grouped_and_sorted() {
        let candidates = vec![
            candidate(1, "Chair", "Ana"),
            candidate(2, "Chair", "Ben"),
            candidate(3, "Treasurer", "Cy"),
            candidate(4, "Chair", "Dee"),
        ];
        let votes = vec![
            vote_for(1, 2),
            vote_for(2, 2),
            vote_for(3, 4),
            vote_for(4, 3),
            vote_for(5, 2),
        ];

        let results = tally_candidates(&candidates, &votes, &UnopposedStatus::default());
        assert_eq!(results.len(), 2);

        let chair = &results[0];
        assert_eq!(chair.position, "Chair");
        assert_eq!(chair.total_votes, 4);
        let order: Vec<i32> = chair.candidates.iter().map(|c| c.candidate_id).collect();
        // Ben 3, Dee 1, Ana 0
        assert_eq!(order, vec![2, 4, 1]);
        assert_eq!(chair.candidates[0].percentage, 75.0);

        let treasurer = &results[1];
        assert_eq!(treasurer.candidates[0].votes, 1);
        assert_eq!(treasurer.candidates[0].percentage, 100.0);
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let candidates = vec![
            candidate(7, "Secretary", "Eve"),
            candidate(8, "Secretary", "Fay"),
            candidate(9, "Secretary", "Gus"),
        ];
        let votes = vec![vote_for(1, 9), vote_for(2, 8), vote_for(3, 7)];

        let results = tally_candidates(&candidates, &votes, &UnopposedStatus::default());
        let order: Vec<i32> = results[0].candidates.iter().map(|c| c.candidate_id).collect();
        assert_eq!(order, vec![7, 8, 9]);
    }

    #[test]
    fn test_unopposed_marks_only_when_election_wide() {
        let candidates = vec![candidate(1, "Chair", "Ana"), candidate(2, "Treasurer", "Ben")];
        let unopposed = UnopposedStatus {
            election_wide: true,
            uncontested_positions: vec!["Chair".into(), "Treasurer".into()],
        };
        let results = tally_candidates(&candidates, &[], &unopposed);
        assert!(results.iter().all(|p| p.candidates[0].is_unopposed));
        assert!(results.iter().all(|p| p.uncontested));

        let per_position_only = UnopposedStatus {
            election_wide: false,
            uncontested_positions: vec!["Treasurer".into()],
        };
        let results = tally_candidates(&candidates, &[], &per_position_only);
        assert!(results.iter().all(|p| !p.candidates[0].is_unopposed));
        assert!(!results[0].uncontested);
        assert!(results[1].uncontested);
    }

    #[test]
    fn test_initiative_tally() {
        let initiatives = vec![initiative(10, "Raise dues", 1), initiative(11, "New bylaws", 2)];
        let votes = vec![
            initiative_vote(1, 10, VoteValue::Yes),
            initiative_vote(2, 10, VoteValue::Yes),
            initiative_vote(3, 10, VoteValue::No),
            initiative_vote(1, 11, VoteValue::Abstain),
            // Candidate votes are ignored
            vote_for(1, 99),
        ];

        let results = tally_initiatives(&initiatives, &votes);
        assert_eq!(results[0].votes, VoteCounts { yes: 2, no: 1, abstain: 0 });
        assert_eq!(results[0].total_votes, 3);
        assert_eq!(results[0].percentages.yes, 66.67);
        assert_eq!(results[1].percentages.abstain, 100.0);
    }

    #[test]
    fn test_summary_uses_stored_type() {
        let e = crate::election::test_support::election("board", at(1, 0), at(5, 0));
        let summary = ElectionSummary::from(&e);
        assert_eq!(summary.election_type, "board");
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "board");
        assert!(json.get("startDate").is_some());
    }
}
