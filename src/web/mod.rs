pub mod ballot;
pub mod confirmations;
pub mod elections;
pub mod error;
pub mod nominations;

use crate::config::FeatureFlagStore;
use actix_web::web::{Data, ServiceConfig};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared state and every route, as the server mounts them.
pub fn mount(
    db: Data<DatabaseConnection>,
    flags: Data<Arc<FeatureFlagStore>>,
) -> impl FnOnce(&mut ServiceConfig) {
    move |conf: &mut ServiceConfig| {
        conf.app_data(db).app_data(flags);
        configure(conf);
    }
}

/// Configures the web app by adding services from each web file.
///
/// @see https://docs.rs/actix-web/4/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    // Route resolution stops at the first match.
    elections::configure(conf);
    ballot::configure(conf);
    nominations::configure(conf);
    confirmations::configure(conf);
}
