//! Price inference: validate, preprocess, predict

use crate::error::{InputError, PredictorError, Result};
use crate::feature_extractor::{calculate_remaining_lease_for_year, FeatureExtractor};
use crate::models::loader::ResourceBundle;
use crate::models::postal::get_town_coordinates;
use crate::types::estimate::{Coordinates, PriceEstimate};
use crate::types::property::{PropertyInput, PropertyRecord};
use crate::validation::{current_year, validate_inputs_for_year};
use std::time::Instant;
use tracing::debug;

/// Price predictor over a loaded resource bundle.
///
/// Holds only a shared reference, so any number of predictors can read the
/// same bundle.
#[derive(Debug, Clone)]
pub struct PricePredictor<'a> {
    resources: &'a ResourceBundle,
    extractor: FeatureExtractor,
}

impl<'a> PricePredictor<'a> {
    pub fn new(resources: &'a ResourceBundle, extractor: FeatureExtractor) -> Self {
        Self {
            resources,
            extractor,
        }
    }

    /// Scaled feature vector for `record`, remaining lease taken at `reference_year`
    pub fn preprocess_for_year(&self, record: &PropertyRecord, reference_year: i32) -> Result<Vec<f64>> {
        let features =
            self.extractor
                .preprocess_for_year(record, reference_year, self.resources.scaler())?;
        Ok(features)
    }

    /// Scaled feature vector using the configured lease reference
    pub fn preprocess(&self, record: &PropertyRecord) -> Result<Vec<f64>> {
        self.preprocess_for_year(record, self.extractor.lease_reference().resolve())
    }

    /// Estimated price for an already-typed record
    pub fn predict(&self, record: &PropertyRecord) -> Result<f64> {
        self.predict_for_year(record, self.extractor.lease_reference().resolve())
    }

    fn predict_for_year(&self, record: &PropertyRecord, reference_year: i32) -> Result<f64> {
        let start = Instant::now();
        let features = self.preprocess_for_year(record, reference_year)?;
        let price = self.resources.model().predict(&features)?;

        debug!(
            town = %record.town,
            flat_type = %record.flat_type,
            reference_year = reference_year,
            price = price,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Prediction complete"
        );

        Ok(price)
    }

    /// Check and type a raw form submission
    pub fn validate(&self, input: &PropertyInput) -> Result<PropertyRecord> {
        let issues = validate_inputs_for_year(input, current_year());
        if !issues.is_empty() {
            return Err(PredictorError::Input(InputError::Invalid(issues)));
        }
        Ok(PropertyRecord::try_from(input)?)
    }

    /// Full submit path: validate, preprocess, predict, and attach display data
    pub fn estimate(&self, input: &PropertyInput) -> Result<PriceEstimate> {
        let record = self.validate(input)?;
        let reference_year = self.extractor.lease_reference().resolve();
        let price = self.predict_for_year(&record, reference_year)?;
        let remaining_lease =
            calculate_remaining_lease_for_year(record.lease_commence_date, reference_year);
        let coordinates = self.coordinates(record.town.as_str());

        Ok(PriceEstimate::new(
            price,
            record,
            remaining_lease,
            reference_year,
            coordinates,
        ))
    }

    /// Map position for a town
    pub fn coordinates(&self, town: &str) -> Coordinates {
        get_town_coordinates(town, self.resources.postal())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::{LeaseReference, FEATURE_NAMES};
    use crate::models::fixture_path;
    use crate::models::loader::load_price_model;
    use crate::models::postal::PostalLookup;
    use crate::models::scaler::ScalerState;
    use crate::types::property::{FlatModel, FlatType, StoreyRange, Town};
    use std::collections::HashMap;

    /// Identity scaler and a single split on floor area at 100 sqm
    fn bundle() -> ResourceBundle {
        let scaler = ScalerState::standard(
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            vec![0.0; 8],
            vec![1.0; 8],
        )
        .unwrap();
        let model = load_price_model(fixture_path("floor_area_split.onnx"), 1).unwrap();

        let mut towns = HashMap::new();
        towns.insert("BEDOK".to_string(), Coordinates::new(1.3236, 103.9273));

        ResourceBundle::new(model, scaler, PostalLookup::new(towns)).unwrap()
    }

    fn bedok_input() -> PropertyInput {
        PropertyInput {
            town: Some("BEDOK".to_string()),
            flat_type: Some("5 ROOM".to_string()),
            storey_range: Some("07 TO 09".to_string()),
            floor_area_sqm: Some(125.0),
            flat_model: Some("Improved".to_string()),
            lease_commence_date: Some(1985),
        }
    }

    #[test]
    fn test_predict_record() {
        let bundle = bundle();
        let predictor = PricePredictor::new(&bundle, FeatureExtractor::new());
        let record = PropertyRecord::new(
            Town::AngMoKio,
            FlatType::FourRoom,
            StoreyRange::S10To12,
            90.0,
            FlatModel::ModelA,
            1990,
        );

        assert_eq!(predictor.predict(&record).unwrap(), 350_000.0);
    }

    #[test]
    fn test_estimate_from_input() {
        let bundle = bundle();
        let predictor = PricePredictor::new(
            &bundle,
            FeatureExtractor::with_lease_reference(LeaseReference::Fixed(2025)),
        );

        let estimate = predictor.estimate(&bedok_input()).unwrap();
        assert_eq!(estimate.price, 480_000.0);
        assert_eq!(estimate.remaining_lease, 59);
        assert_eq!(estimate.reference_year, 2025);
        assert_eq!(estimate.coordinates, Coordinates::new(1.3236, 103.9273));
        assert_eq!(estimate.record.town, Town::Bedok);
    }

    #[test]
    fn test_invalid_input_fails_before_prediction() {
        let bundle = bundle();
        let predictor = PricePredictor::new(&bundle, FeatureExtractor::new());
        let input = PropertyInput {
            town: None,
            floor_area_sqm: Some(25.0),
            ..bedok_input()
        };

        match predictor.estimate(&input) {
            Err(PredictorError::Input(InputError::Invalid(issues))) => assert_eq!(issues.len(), 2),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_category_is_input_error() {
        let bundle = bundle();
        let predictor = PricePredictor::new(&bundle, FeatureExtractor::new());
        let input = PropertyInput {
            flat_model: Some("Penthouse".to_string()),
            ..bedok_input()
        };

        assert!(matches!(
            predictor.estimate(&input),
            Err(PredictorError::Input(InputError::UnknownCategory {
                field: "flat_model",
                ..
            }))
        ));
    }

    #[test]
    fn test_unknown_town_uses_default_coordinates() {
        let bundle = bundle();
        let predictor = PricePredictor::new(&bundle, FeatureExtractor::new());
        let input = PropertyInput {
            town: Some("YISHUN".to_string()),
            ..bedok_input()
        };

        let estimate = predictor.estimate(&input).unwrap();
        assert_eq!(estimate.coordinates, Coordinates::SINGAPORE);
    }

    #[test]
    fn test_preprocess_length() {
        let bundle = bundle();
        let predictor = PricePredictor::new(&bundle, FeatureExtractor::new());
        let record = PropertyRecord::try_from(&bedok_input()).unwrap();

        let features = predictor.preprocess(&record).unwrap();
        assert_eq!(features.len(), 8);
        assert_eq!(features[3], 125.0);
    }
}
