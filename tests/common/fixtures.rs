//! Test fixtures for election data
#![allow(clippy::needless_update)]

use chrono::{Duration, NaiveDateTime, Utc};
use guildhall::orm::members::MemberStatus;
use guildhall::orm::vote_sessions::SessionType;
use guildhall::orm::votes::VoteValue;
use guildhall::orm::{
    candidates, elections, feature_flags, initiatives, members, vote_confirmations, votes,
};

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// An election whose general window runs from `start` to `end`.
pub fn election(id: i32, kind: &str, start: NaiveDateTime, end: NaiveDateTime) -> elections::Model {
    elections::Model {
        id,
        title: format!("Test election {}", id),
        description: None,
        type_: kind.to_string(),
        status: "voting".to_string(),
        start_date: start,
        end_date: end,
        nomination_start: None,
        nomination_end: None,
        candidate_voting_start: None,
        candidate_voting_end: None,
        enable_separate_voting_periods: None,
        show_unopposed_status: None,
        created_at: start - Duration::days(30),
    }
}

/// Voting opened yesterday and closes in a week.
pub fn open_election(id: i32, kind: &str) -> elections::Model {
    election(id, kind, now() - Duration::days(1), now() + Duration::days(7))
}

/// Voting has not started; nominations are open around `now()`.
pub fn nominating_election(id: i32) -> elections::Model {
    let mut e = election(id, "board", now() + Duration::days(14), now() + Duration::days(21));
    e.nomination_start = Some(now() - Duration::days(2));
    e.nomination_end = Some(now() + Duration::days(5));
    e
}

pub fn member(user_id: i32) -> members::Model {
    members::Model {
        id: user_id,
        user_id,
        full_name: format!("Member {}", user_id),
        email: Some(format!("member{}@example.org", user_id)),
        status: MemberStatus::Active,
        joined_at: now() - Duration::days(365),
        expires_at: None,
    }
}

pub fn lapsed_member(user_id: i32) -> members::Model {
    members::Model {
        status: MemberStatus::Lapsed,
        ..member(user_id)
    }
}

pub fn candidate(id: i32, election_id: i32, position: &str) -> candidates::Model {
    candidates::Model {
        id,
        election_id,
        user_id: 500 + id,
        position: position.to_string(),
        full_name: format!("Candidate {}", id),
        bio: None,
        manifesto: None,
        photo_url: None,
        created_at: now() - Duration::days(10),
    }
}

pub fn candidate_vote(
    id: i32,
    user_id: i32,
    election_id: i32,
    c: &candidates::Model,
) -> votes::Model {
    votes::Model {
        id,
        user_id,
        election_id,
        candidate_id: Some(c.id),
        initiative_id: None,
        position: Some(c.position.clone()),
        vote_value: None::<VoteValue>,
        voted_at: now(),
    }
}

pub fn confirmation(
    user_id: i32,
    election_id: i32,
    session_type: SessionType,
    code: &str,
) -> vote_confirmations::Model {
    vote_confirmations::Model {
        id: 1,
        user_id,
        election_id,
        session_type,
        confirmation_code: code.to_string(),
        created_at: now(),
    }
}

pub fn flag(key: &str, enabled: bool) -> feature_flags::Model {
    feature_flags::Model {
        key: key.to_string(),
        enabled,
        description: None,
        updated_at: now(),
    }
}

pub fn initiative(id: i32, election_id: i32, ballot_order: i32) -> initiatives::Model {
    initiatives::Model {
        id,
        election_id,
        title: format!("Initiative {}", id),
        description: None,
        ballot_order,
    }
}

pub fn initiative_vote(
    id: i32,
    user_id: i32,
    election_id: i32,
    initiative_id: i32,
    value: VoteValue,
) -> votes::Model {
    votes::Model {
        id,
        user_id,
        election_id,
        candidate_id: None,
        initiative_id: Some(initiative_id),
        position: None,
        vote_value: Some(value),
        voted_at: now(),
    }
}

/// Voting closed yesterday.
pub fn finished_election(id: i32, kind: &str) -> elections::Model {
    election(id, kind, now() - Duration::days(10), now() - Duration::days(1))
}
