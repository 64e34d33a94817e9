//! Completeness and range checks on raw form input.
//!
//! Validation is advisory: it returns every problem found rather than
//! stopping at the first, and never touches loaded resources.

use crate::types::property::PropertyInput;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

/// Smallest accepted floor area in square metres
pub const MIN_FLOOR_AREA_SQM: f64 = 30.0;
/// Largest accepted floor area in square metres
pub const MAX_FLOOR_AREA_SQM: f64 = 200.0;
/// Earliest lease commencement year in the resale data
pub const MIN_LEASE_YEAR: i32 = 1966;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingField,
    OutOfRange,
}

/// One validation failure with its user-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub kind: IssueKind,
    pub field: &'static str,
    pub message: String,
}

impl ValidationIssue {
    fn missing(field: &'static str) -> Self {
        Self {
            kind: IssueKind::MissingField,
            field,
            message: format!("Missing required field: {field}"),
        }
    }

    fn out_of_range(field: &'static str, message: &str) -> Self {
        Self {
            kind: IssueKind::OutOfRange,
            field,
            message: message.to_string(),
        }
    }
}

/// Calendar year on the local clock
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Validate against the local calendar year
pub fn validate_inputs(input: &PropertyInput) -> Vec<ValidationIssue> {
    validate_inputs_for_year(input, current_year())
}

/// Validate a raw record, treating `current_year` as the latest lease year.
///
/// Missing fields are reported in form order, followed by range violations
/// for the fields that are present.
pub fn validate_inputs_for_year(input: &PropertyInput, current_year: i32) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    let present = [
        ("town", input.town.is_some()),
        ("flat_type", input.flat_type.is_some()),
        ("storey_range", input.storey_range.is_some()),
        ("floor_area_sqm", input.floor_area_sqm.is_some()),
        ("flat_model", input.flat_model.is_some()),
        ("lease_commence_date", input.lease_commence_date.is_some()),
    ];
    for (field, is_present) in present {
        if !is_present {
            issues.push(ValidationIssue::missing(field));
        }
    }

    if let Some(area) = input.floor_area_sqm {
        // NaN fails the range check
        if !(MIN_FLOOR_AREA_SQM..=MAX_FLOOR_AREA_SQM).contains(&area) {
            issues.push(ValidationIssue::out_of_range(
                "floor_area_sqm",
                "Floor area must be between 30 and 200 sqm",
            ));
        }
    }

    if let Some(year) = input.lease_commence_date {
        if !(MIN_LEASE_YEAR..=current_year).contains(&year) {
            issues.push(ValidationIssue::out_of_range(
                "lease_commence_date",
                "Lease commence year must be between 1966 and current year",
            ));
        }
    }

    issues
}
