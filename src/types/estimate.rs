//! Price estimate data structures

use crate::types::property::PropertyRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Central Singapore, used when a town has no entry in the postal table
    pub const SINGAPORE: Coordinates = Coordinates {
        latitude: 1.3521,
        longitude: 103.8198,
    };

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// As a `[lat, lon]` pair, the layout used by the postal table
    pub fn to_array(self) -> [f64; 2] {
        [self.latitude, self.longitude]
    }
}

/// Result of one successful form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceEstimate {
    /// Estimated resale price in SGD
    pub price: f64,

    /// The record the estimate was computed for
    pub record: PropertyRecord,

    /// Remaining lease in whole years, clamped at zero
    pub remaining_lease: i32,

    /// Year the remaining lease was computed against
    pub reference_year: i32,

    /// Town location for the map view
    pub coordinates: Coordinates,

    /// When the estimate was produced
    pub timestamp: DateTime<Utc>,
}

impl PriceEstimate {
    pub fn new(
        price: f64,
        record: PropertyRecord,
        remaining_lease: i32,
        reference_year: i32,
        coordinates: Coordinates,
    ) -> Self {
        Self {
            price,
            record,
            remaining_lease,
            reference_year,
            coordinates,
            timestamp: Utc::now(),
        }
    }
}
