mod common;

use actix_web::http::StatusCode;
use actix_web::ResponseError;
use common::database::{mock_db, no_rows, returned_id};
use common::fixtures::{member, nominating_election, now, open_election};
use guildhall::election::nomination::{submit_nomination, NominationRequest};
use guildhall::election::ElectionError;

fn nomination() -> NominationRequest {
    NominationRequest {
        position: "Treasurer".to_string(),
        full_name: "Ana Ruiz".to_string(),
        bio: Some("Ten years keeping the tenants' books.".to_string()),
        manifesto: None,
        photo_url: None,
    }
}

#[actix_rt::test]
async fn test_nomination_returns_candidate_id() {
    let db = mock_db()
        .append_query_results(vec![vec![nominating_election(3)]])
        .append_query_results(vec![vec![member(21)]])
        .append_query_results(returned_id(42))
        .into_connection();

    let id = submit_nomination(&db, 21, 3, nomination(), now()).await.unwrap();
    assert_eq!(id, 42);
}

#[actix_rt::test]
async fn test_duplicate_nomination_detected_by_insert() {
    // Election, member, then the conditional insert. No existence query.
    let db = mock_db()
        .append_query_results(vec![vec![nominating_election(3)]])
        .append_query_results(vec![vec![member(21)]])
        .append_query_results(no_rows())
        .into_connection();

    let err = submit_nomination(&db, 21, 3, nomination(), now())
        .await
        .unwrap_err();
    assert!(matches!(err, ElectionError::AlreadyNominated));
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn test_nominations_closed_without_window() {
    // open_election has no nomination bounds
    let db = mock_db()
        .append_query_results(vec![vec![open_election(4, "board")]])
        .into_connection();

    let err = submit_nomination(&db, 21, 4, nomination(), now())
        .await
        .unwrap_err();
    assert!(matches!(err, ElectionError::NominationsClosed));
}

#[actix_rt::test]
async fn test_invalid_nomination_never_reaches_database() {
    let db = mock_db().into_connection();
    let request = NominationRequest {
        full_name: "  ".to_string(),
        ..nomination()
    };

    let err = submit_nomination(&db, 21, 3, request, now()).await.unwrap_err();
    assert!(matches!(err, ElectionError::InvalidNomination(_)));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_non_member_cannot_nominate() {
    let db = mock_db()
        .append_query_results(vec![vec![nominating_election(3)]])
        .append_query_results(no_rows())
        .into_connection();

    let err = submit_nomination(&db, 21, 3, nomination(), now())
        .await
        .unwrap_err();
    assert!(matches!(err, ElectionError::NotEligible));
}
