mod report;

pub use report::{Location, NewReport, Photo, Report, ReportStatus};
