//! Guildhall: elections for a membership nonprofit.
//!
//! Nomination, ballot casting, confirmation receipts and results, served
//! over actix-web with a Postgres store behind SeaORM.

pub mod app_config;
pub mod config;
pub mod constants;
pub mod db;
pub mod election;
pub mod middleware;
pub mod orm;
pub mod web;
