//! Text the incident view renders, kept free of any UI toolkit.

use crate::form::{Draft, Field};
use crate::model::{Incident, IncidentStatus, IncidentType, Timestamp};
use crate::pagination::Pagination;

pub const HEADING: &str = "Incident Management";
pub const LOADING: &str = "Loading incidents...";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this incident?";
pub const UNASSIGNED: &str = "Unassigned";

pub const COLUMNS: [&str; 10] = [
    "ID",
    "Title",
    "Type",
    "Status",
    "Reporter",
    "Handler",
    "Detail",
    "Create Time",
    "Update Time",
    "Actions",
];

pub fn modal_title(draft: &Draft) -> &'static str {
    if draft.is_editing() {
        "Modify Incident"
    } else {
        "Report New Incident"
    }
}

pub fn submit_label(draft: &Draft) -> &'static str {
    if draft.is_editing() {
        "Update"
    } else {
        "Submit"
    }
}

pub fn field_label(field: Field) -> &'static str {
    match field {
        Field::Title => "Title",
        Field::Type => "Type",
        Field::Status => "Status",
        Field::Reporter => "Reporter",
        Field::Handler => "Handler",
        Field::Detail => "Detail",
    }
}

/// Placeholder entry plus every selectable value for an enum-backed field.
pub fn options(field: Field) -> Option<(&'static str, Vec<&'static str>)> {
    match field {
        Field::Type => Some((
            "Select Type",
            IncidentType::ALL.iter().map(|t| t.as_str()).collect(),
        )),
        Field::Status => Some((
            "Select status",
            IncidentStatus::ALL.iter().map(|s| s.as_str()).collect(),
        )),
        _ => None,
    }
}

pub fn handler_display(handler: Option<&str>) -> &str {
    match handler {
        Some(h) if !h.is_empty() => h,
        _ => UNASSIGNED,
    }
}

pub fn format_timestamp(ts: Option<&Timestamp>) -> String {
    ts.map(|t| t.to_local().format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

pub fn total_label(pagination: &Pagination) -> String {
    format!("Total Incidents: {}", pagination.total_elements)
}

/// One table row, already formatted for display.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IncidentRow {
    pub id: i64,
    pub cells: [String; 9],
}

impl From<&Incident> for IncidentRow {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id,
            cells: [
                incident.id.to_string(),
                incident.title.clone(),
                incident.kind.to_string(),
                incident.status.to_string(),
                incident.reporter.clone(),
                handler_display(incident.handler.as_deref()).to_string(),
                incident.detail.clone(),
                format_timestamp(incident.create_time.as_ref()),
                format_timestamp(incident.update_time.as_ref()),
            ],
        }
    }
}
