pub mod catalog;
mod errors;
pub mod handlers;
pub mod service;
pub mod types;

pub use errors::TrackerError;
pub use service::TrackerService;
