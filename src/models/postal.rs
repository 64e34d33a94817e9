//! Town → coordinate lookup used to centre the map view

use crate::types::estimate::Coordinates;
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Immutable town coordinate table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostalLookup {
    towns: HashMap<String, Coordinates>,
}

impl PostalLookup {
    pub fn new(towns: HashMap<String, Coordinates>) -> Self {
        Self { towns }
    }

    /// Parse the postal table document.
    ///
    /// The document must be a JSON object. Entries without a usable
    /// `coordinates` pair are skipped so those towns fall back to the default.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let document: Value = serde_json::from_str(text).map_err(|e| e.to_string())?;
        let entries = document
            .as_object()
            .ok_or_else(|| "postal table must be a JSON object".to_string())?;

        let mut towns = HashMap::with_capacity(entries.len());
        for (town, entry) in entries {
            match entry.get("coordinates").and_then(parse_pair) {
                Some(coordinates) => {
                    towns.insert(town.clone(), coordinates);
                }
                None => {
                    warn!(town = %town, "Postal entry has no usable coordinates, using default");
                }
            }
        }

        Ok(Self { towns })
    }

    pub fn len(&self) -> usize {
        self.towns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.towns.is_empty()
    }

    pub fn get(&self, town: &str) -> Option<Coordinates> {
        self.towns.get(town).copied()
    }
}

fn parse_pair(value: &Value) -> Option<Coordinates> {
    match value.as_array()?.as_slice() {
        [lat, lon] => Some(Coordinates::new(lat.as_f64()?, lon.as_f64()?)),
        _ => None,
    }
}

/// Coordinates for `town`, or central Singapore when it is not in the table
pub fn get_town_coordinates(town: &str, postal: &PostalLookup) -> Coordinates {
    postal.get(town).unwrap_or(Coordinates::SINGAPORE)
}
