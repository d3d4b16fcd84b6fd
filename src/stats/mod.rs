//! Stat aggregation and derived records: season/career totals, milestones
//! and streaks.

pub mod aggregator;
pub mod handlers;
pub mod milestones;
pub mod service;
pub mod streaks;

mod errors;
pub mod models;

pub use errors::StatsError;
pub use models::*;
pub use service::StatsService;
