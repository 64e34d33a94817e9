//! Type definitions for the price predictor

pub mod estimate;
pub mod property;

pub use estimate::{Coordinates, PriceEstimate};
pub use property::{FlatModel, FlatType, PropertyInput, PropertyRecord, StoreyRange, Town};
