pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod views;

pub use handlers::ReportState;
pub use services::{GeocodingService, ReportStore, SubmissionService};
