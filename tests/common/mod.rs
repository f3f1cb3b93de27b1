#![allow(dead_code)]

pub mod database;
pub mod fixtures;

use actix_web::web::Data;
use guildhall::config::FeatureFlagStore;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Everything the server registers, with a mock connection and the given flags.
pub fn app_state(
    db: DatabaseConnection,
    flags: FeatureFlagStore,
) -> impl FnOnce(&mut actix_web::web::ServiceConfig) {
    guildhall::web::mount(Data::new(db), Data::new(Arc::new(flags)))
}
