mod common;

use chrono::Duration;
use common::database::mock_db;
use common::fixtures::{election, now};
use guildhall::election::unopposed::{
    compute_unopposed_status, compute_unopposed_status_or_default,
};
use guildhall::election::VotingConfig;
use sea_orm::Value;
use std::collections::BTreeMap;

fn count_row(position: &str, n: i64) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("position", Value::String(Some(Box::new(position.to_string())))),
        ("candidate_count", Value::BigInt(Some(n))),
    ])
}

fn finished_board_election() -> guildhall::orm::elections::Model {
    election(1, "board", now() - Duration::days(10), now() - Duration::days(1))
}

#[actix_rt::test]
async fn test_every_position_uncontested() {
    let e = finished_board_election();
    let config = VotingConfig::from_election(&e).unwrap();
    let db = mock_db()
        .append_query_results(vec![vec![count_row("Chair", 1), count_row("Treasurer", 1)]])
        .into_connection();

    let status = compute_unopposed_status(&db, &e, &config, now()).await.unwrap();
    assert!(status.election_wide);
    assert_eq!(status.uncontested_positions, vec!["Chair", "Treasurer"]);
}

#[actix_rt::test]
async fn test_one_contested_position_clears_election_wide_flag() {
    let e = finished_board_election();
    let config = VotingConfig::from_election(&e).unwrap();
    let db = mock_db()
        .append_query_results(vec![vec![count_row("Chair", 2), count_row("Treasurer", 1)]])
        .into_connection();

    let status = compute_unopposed_status(&db, &e, &config, now()).await.unwrap();
    assert!(!status.election_wide);
    assert!(status.is_position_uncontested("Treasurer"));
    assert!(!status.is_position_uncontested("Chair"));
}

#[actix_rt::test]
async fn test_no_query_while_voting_is_open() {
    let e = election(1, "board", now() - Duration::days(1), now() + Duration::days(3));
    let config = VotingConfig::from_election(&e).unwrap();
    // No results appended: a query here would fail
    let db = mock_db().into_connection();

    let status = compute_unopposed_status(&db, &e, &config, now()).await.unwrap();
    assert!(!status.election_wide);
}

#[actix_rt::test]
async fn test_lookup_failure_reads_as_not_unopposed() {
    let e = finished_board_election();
    let config = VotingConfig::from_election(&e).unwrap();
    let db = mock_db().into_connection();

    let status = compute_unopposed_status_or_default(&db, &e, &config, now()).await;
    assert!(!status.election_wide);
    assert!(status.uncontested_positions.is_empty());
}
