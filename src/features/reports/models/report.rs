use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Lifecycle of a report; only `PendingReview -> Resolved` is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReportStatus {
    #[serde(rename = "Pending Review")]
    PendingReview,
    #[serde(rename = "Resolved")]
    Resolved,
}

impl ReportStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::PendingReview => "Pending Review",
            ReportStatus::Resolved => "Resolved",
        }
    }

    /// Whether a report in this status may be moved to `next`.
    /// Staying in the same status is not a transition.
    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (ReportStatus::PendingReview, ReportStatus::Resolved)
        )
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Point picked on the map, kept exactly as submitted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    #[serde(deserialize_with = "coordinate")]
    pub lat: String,
    #[serde(deserialize_with = "coordinate")]
    pub lng: String,
}

impl Location {
    pub fn new(lat: impl Into<String>, lng: impl Into<String>) -> Self {
        Self {
            lat: lat.into(),
            lng: lng.into(),
        }
    }

    /// "19.0760, 72.8777" when both coordinates parse, `None` otherwise
    pub fn display(&self) -> Option<String> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lng = self.lng.trim().parse::<f64>().ok()?;
        Some(format!("{:.4}, {:.4}", lat, lng))
    }
}

/// Older collections stored coordinates as JSON numbers
fn coordinate<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Coordinate {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Coordinate::deserialize(deserializer)? {
        Coordinate::Text(s) => s,
        Coordinate::Number(n) => n.to_string(),
    })
}

/// A citizen report as persisted in the report collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    /// Creation time in milliseconds since the epoch; unique key
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    pub description: String,
    pub location: Location,
    /// Human readable creation time, e.g. "10/19/2026, 1:48:05 PM"
    pub date: String,
    pub status: ReportStatus,
    /// `data:` URL of the first photo, or a placeholder URL
    pub image: String,
}

impl Report {
    /// Date part of `date` (everything before the first comma)
    pub fn date_label(&self) -> &str {
        self.date.split(',').next().unwrap_or_default()
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReportStatus::PendingReview
    }
}

/// Data for creating a new report; id, date and status are assigned by the store
#[derive(Debug, Clone)]
pub struct NewReport {
    pub name: String,
    pub pincode: Option<String>,
    pub description: String,
    pub location: Location,
    pub image: String,
}

impl NewReport {
    pub fn into_report<Tz: TimeZone>(self, id: i64, created_at: &DateTime<Tz>) -> Report
    where
        Tz::Offset: std::fmt::Display,
    {
        Report {
            id,
            name: self.name,
            pincode: self.pincode,
            description: self.description,
            location: self.location,
            date: format_report_date(created_at),
            status: ReportStatus::PendingReview,
            image: self.image,
        }
    }
}

/// `M/D/YYYY, h:mm:ss AM`
pub fn format_report_date<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string()
}

/// An uploaded photo as received from the report form
#[derive(Debug, Clone)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn sample() -> Report {
        Report {
            id: 1_760_000_000_000,
            name: "Pothole on SV Road".to_string(),
            pincode: Some("400050".to_string()),
            description: "Deep pothole near the bus stop".to_string(),
            location: Location::new("19.0596", "72.8295"),
            date: "10/19/2026, 1:48:05 PM".to_string(),
            status: ReportStatus::PendingReview,
            image: "data:image/png;base64,iVBORw0KGgo=".to_string(),
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ReportStatus::PendingReview).unwrap(),
            "\"Pending Review\""
        );
        assert_eq!(
            serde_json::from_str::<ReportStatus>("\"Resolved\"").unwrap(),
            ReportStatus::Resolved
        );
        assert!(serde_json::from_str::<ReportStatus>("\"resolved\"").is_err());
    }

    #[test]
    fn test_status_transitions() {
        assert!(ReportStatus::PendingReview.can_transition_to(ReportStatus::Resolved));
        assert!(!ReportStatus::Resolved.can_transition_to(ReportStatus::PendingReview));
        assert!(!ReportStatus::Resolved.can_transition_to(ReportStatus::Resolved));
        assert!(!ReportStatus::PendingReview.can_transition_to(ReportStatus::PendingReview));
    }

    #[test]
    fn test_location_accepts_numbers() {
        let location: Location =
            serde_json::from_str(r#"{"lat": 19.076, "lng": "72.8777"}"#).unwrap();
        assert_eq!(location, Location::new("19.076", "72.8777"));
        assert_eq!(location.display().as_deref(), Some("19.0760, 72.8777"));
    }

    #[test]
    fn test_location_display_requires_numbers() {
        assert_eq!(Location::new("", "72.8").display(), None);
    }

    #[test]
    fn test_missing_pincode_is_omitted() {
        let mut report = sample();
        report.pincode = None;

        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("pincode").is_none());

        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn test_date_label() {
        assert_eq!(sample().date_label(), "10/19/2026");

        let mut report = sample();
        report.date = "no comma".to_string();
        assert_eq!(report.date_label(), "no comma");
    }

    #[test]
    fn test_into_report_starts_pending() {
        let at = FixedOffset::east_opt(5 * 3600 + 1800)
            .unwrap()
            .with_ymd_and_hms(2026, 10, 19, 13, 48, 5)
            .unwrap();
        let report = NewReport {
            name: "Broken streetlight".to_string(),
            pincode: None,
            description: String::new(),
            location: Location::new("19.1", "72.9"),
            image: "https://example.org/x.png".to_string(),
        }
        .into_report(42, &at);

        assert_eq!(report.id, 42);
        assert_eq!(report.status, ReportStatus::PendingReview);
        assert_eq!(report.date, "10/19/2026, 1:48:05 PM");
    }
}
