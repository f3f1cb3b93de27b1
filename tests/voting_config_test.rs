mod common;

use chrono::Duration;
use common::database::{mock_db, no_rows};
use common::fixtures::{election, now, open_election};
use guildhall::election::voting_config::VotingConfigError;
use guildhall::election::{
    load_voting_config, load_voting_config_or_default, ElectionType, VotingConfig,
};

#[actix_rt::test]
async fn test_leadership_defaults_to_separate_periods() {
    let db = mock_db()
        .append_query_results(vec![vec![open_election(1, "leadership")]])
        .into_connection();

    let config = load_voting_config(&db, 1).await.unwrap();
    assert!(config.enable_separate_voting_periods);
    assert!(config.show_unopposed_status);
    assert_eq!(config.election_type, Some(ElectionType::Leadership));
}

#[actix_rt::test]
async fn test_persisted_values_win_over_type_defaults() {
    let mut e = open_election(2, "board");
    e.show_unopposed_status = Some(false);
    e.enable_separate_voting_periods = Some(false);
    e.candidate_voting_end = Some(now() + Duration::days(2));
    let db = mock_db().append_query_results(vec![vec![e]]).into_connection();

    let config = load_voting_config(&db, 2).await.unwrap();
    assert!(!config.enable_separate_voting_periods);
    assert!(!config.show_unopposed_status);
    assert!(config.candidate_voting_end.is_some());
}

#[actix_rt::test]
async fn test_initiative_elections_share_one_period() {
    let db = mock_db()
        .append_query_results(vec![vec![open_election(3, "initiative")]])
        .into_connection();

    let config = load_voting_config(&db, 3).await.unwrap();
    assert!(!config.enable_separate_voting_periods);
}

#[actix_rt::test]
async fn test_missing_election_is_reported() {
    let db = mock_db()
        .append_query_results::<guildhall::orm::elections::Model>(vec![Vec::new()])
        .into_connection();

    let err = load_voting_config(&db, 404).await.unwrap_err();
    assert!(matches!(err, VotingConfigError::NotFound(404)));
}

#[actix_rt::test]
async fn test_unknown_type_degrades_to_safe_default() {
    let e = election(5, "referendum", now(), now() + Duration::days(1));
    let db = mock_db().append_query_results(vec![vec![e]]).into_connection();

    assert_eq!(
        load_voting_config_or_default(&db, 5).await,
        VotingConfig::safe_default()
    );
}

#[actix_rt::test]
async fn test_missing_election_degrades_to_safe_default() {
    let db = mock_db().append_query_results(no_rows()).into_connection();

    let config = load_voting_config_or_default(&db, 6).await;
    assert_eq!(config, VotingConfig::safe_default());
    assert!(!config.enable_separate_voting_periods);
    assert!(config.show_unopposed_status);
}
