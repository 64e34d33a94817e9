//! Feature extraction for resale price model inference.
//!
//! This module turns property records into the feature vector the scaler and
//! model were fitted on. Column order is part of the artifact contract: the
//! six form fields in form order, then remaining lease, then floor area in
//! square feet.

use crate::error::ResourceError;
use crate::models::scaler::ScalerState;
use crate::types::property::PropertyRecord;
use crate::validation::current_year;

/// Length of a lease on an HDB flat
pub const LEASE_TERM_YEARS: i32 = 99;

/// Square feet per square metre
pub const SQFT_PER_SQM: f64 = 10.764;

/// Number of model input columns
pub const FEATURE_COUNT: usize = 8;

/// Column names in training order
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "town",
    "flat_type",
    "storey_range",
    "floor_area_sqm",
    "flat_model",
    "lease_commence_date",
    "remaining_lease",
    "floor_area_sqft",
];

/// Year that the remaining-lease column is computed against.
///
/// `CurrentYear` reads the clock on every call, so the same record yields a
/// different vector once the calendar year rolls over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeaseReference {
    #[default]
    CurrentYear,
    Fixed(i32),
}

impl LeaseReference {
    pub fn from_config(year: Option<i32>) -> Self {
        year.map(LeaseReference::Fixed).unwrap_or_default()
    }

    /// Concrete year for a computation happening now
    pub fn resolve(&self) -> i32 {
        match self {
            LeaseReference::CurrentYear => current_year(),
            LeaseReference::Fixed(year) => *year,
        }
    }
}

/// Years left on the lease; negative once the term has run out.
///
/// Saturates at the `i32` bounds for years no validated record can hold.
pub fn remaining_lease_years(lease_commence_year: i32, reference_year: i32) -> i32 {
    LEASE_TERM_YEARS.saturating_sub(reference_year.saturating_sub(lease_commence_year))
}

/// Remaining lease for display, never below zero
pub fn calculate_remaining_lease(lease_commence_year: i32) -> i32 {
    calculate_remaining_lease_for_year(lease_commence_year, current_year())
}

pub fn calculate_remaining_lease_for_year(lease_commence_year: i32, current_year: i32) -> i32 {
    remaining_lease_years(lease_commence_year, current_year).max(0)
}

pub fn floor_area_sqft(floor_area_sqm: f64) -> f64 {
    floor_area_sqm * SQFT_PER_SQM
}

/// Feature extractor that transforms property records into model input.
///
/// Features are produced in the exact order the artifacts expect.
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    lease_reference: LeaseReference,
}

impl FeatureExtractor {
    /// Create an extractor that computes remaining lease against the current year.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_lease_reference(lease_reference: LeaseReference) -> Self {
        Self { lease_reference }
    }

    pub fn lease_reference(&self) -> LeaseReference {
        self.lease_reference
    }

    /// Unscaled features for `record` with remaining lease taken at `reference_year`.
    pub fn extract(&self, record: &PropertyRecord, reference_year: i32) -> [f64; FEATURE_COUNT] {
        [
            record.town.code() as f64,
            record.flat_type.code() as f64,
            record.storey_range.code() as f64,
            record.floor_area_sqm,
            record.flat_model.code() as f64,
            record.lease_commence_date as f64,
            remaining_lease_years(record.lease_commence_date, reference_year) as f64,
            floor_area_sqft(record.floor_area_sqm),
        ]
    }

    /// Scaled features, resolving the reference year now.
    pub fn preprocess(
        &self,
        record: &PropertyRecord,
        scaler: &ScalerState,
    ) -> Result<Vec<f64>, ResourceError> {
        self.preprocess_for_year(record, self.lease_reference.resolve(), scaler)
    }

    pub fn preprocess_for_year(
        &self,
        record: &PropertyRecord,
        reference_year: i32,
        scaler: &ScalerState,
    ) -> Result<Vec<f64>, ResourceError> {
        let raw = self.extract(record, reference_year);
        scaler.transform(&raw)
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    /// Get feature names in training order.
    pub fn feature_names(&self) -> &'static [&'static str] {
        &FEATURE_NAMES
    }
}
