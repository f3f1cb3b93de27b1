mod common;

use common::database::{mock_db, scalar};
use common::fixtures::{
    candidate, candidate_vote, finished_election, initiative, initiative_vote, now,
};
use guildhall::election::results::load_election_results;
use guildhall::orm::votes::VoteValue;

#[actix_rt::test]
async fn test_results_with_statistics() {
    let election = finished_election(1, "board");
    let chair = candidate(1, 1, "Chair");
    let treasurer = candidate(2, 1, "Treasurer");

    // candidates, initiatives, votes, distinct voters, then three counts
    let db = mock_db()
        .append_query_results(vec![vec![chair.clone(), treasurer.clone()]])
        .append_query_results(vec![vec![initiative(10, 1, 1)]])
        .append_query_results(vec![vec![
            candidate_vote(1, 7, 1, &chair),
            candidate_vote(2, 8, 1, &chair),
            candidate_vote(3, 7, 1, &treasurer),
            initiative_vote(4, 7, 1, 10, VoteValue::Yes),
            initiative_vote(5, 8, 1, 10, VoteValue::No),
        ]])
        .append_query_results(scalar("count", 2))
        .append_query_results(scalar("num_items", 2))
        .append_query_results(scalar("num_items", 2))
        .append_query_results(scalar("num_items", 6))
        .into_connection();

    let results = load_election_results(&db, &election, now()).await.unwrap();

    assert!(results.unopposed.election_wide);
    assert_eq!(results.positions, vec!["Chair", "Treasurer"]);

    let chair_result = &results.candidate_results[0];
    assert_eq!(chair_result.total_votes, 2);
    assert_eq!(chair_result.candidates[0].percentage, 100.0);
    assert!(chair_result.candidates[0].is_unopposed);

    let dues = &results.initiative_results[0];
    assert_eq!(dues.total_votes, 2);
    assert_eq!(dues.percentages.yes, 50.0);

    assert_eq!(results.statistics.total_voters, 2);
    assert_eq!(results.statistics.candidate_ballots, 2);
    assert_eq!(results.statistics.initiative_ballots, 2);
    assert_eq!(results.statistics.eligible_members, 6);
    assert_eq!(results.statistics.turnout_percentage, 33.33);
}

#[actix_rt::test]
async fn test_results_propagate_database_errors() {
    let db = mock_db().into_connection();
    let election = finished_election(1, "board");
    assert!(load_election_results(&db, &election, now()).await.is_err());
}
