//! Mock database helpers
//!
//! Integration tests run against SeaORM's `MockDatabase`. Query results are
//! consumed in the order they are appended, one batch per query the code
//! under test issues.

use sea_orm::{DatabaseBackend, MockDatabase, Value};
use std::collections::BTreeMap;

pub type Row = BTreeMap<&'static str, Value>;

/// A Postgres-flavoured mock, so inserts read back their RETURNING rows.
pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// A query that returns nothing.
pub fn no_rows() -> Vec<Vec<Row>> {
    vec![Vec::new()]
}

/// A single `id` column, as returned by `INSERT ... RETURNING id`.
pub fn returned_id(id: i32) -> Vec<Vec<Row>> {
    vec![vec![BTreeMap::from([("id", Value::Int(Some(id)))])]]
}

/// A single-column integer row, for `COUNT(*)` style queries.
pub fn scalar(column: &'static str, n: i64) -> Vec<Vec<Row>> {
    vec![vec![BTreeMap::from([(column, Value::BigInt(Some(n)))])]]
}
