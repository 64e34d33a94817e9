//! ONNX Runtime price regressor

use crate::error::ResourceError;
use ort::session::Session;
use ort::value::Tensor;
use std::fmt;
use std::sync::RwLock;

/// Metadata key holding the comma-separated training column names
pub const FEATURE_NAMES_KEY: &str = "feature_names";

/// Gradient-boosted regressor exported to ONNX
pub struct PriceModel {
    /// ONNX Runtime session (run needs exclusive access)
    session: RwLock<Session>,
    input_name: String,
    output_name: String,
    /// Declared input width; `None` when the graph leaves it symbolic
    num_feature: Option<usize>,
    feature_names: Option<Vec<String>>,
}

impl PriceModel {
    /// Wrap a session, reading its input/output layout and column names
    pub fn from_session(session: Session) -> Result<Self, String> {
        let input = session
            .inputs
            .first()
            .ok_or_else(|| "model declares no inputs".to_string())?;
        let input_name = input.name.clone();
        let num_feature = input
            .input_type
            .tensor_shape()
            .and_then(|shape| shape.last().copied())
            .filter(|&width| width > 0)
            .map(|width| width as usize);

        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| "model declares no outputs".to_string())?;

        let feature_names = session
            .metadata()
            .and_then(|metadata| metadata.custom(FEATURE_NAMES_KEY))
            .map_err(|e| format!("unreadable model metadata: {e}"))?
            .map(|names| names.split(',').map(|s| s.trim().to_string()).collect());

        Ok(Self {
            session: RwLock::new(session),
            input_name,
            output_name,
            num_feature,
            feature_names,
        })
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    pub fn num_feature(&self) -> Option<usize> {
        self.num_feature
    }

    pub fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    /// Check the declared input width and, when recorded, the column names
    pub fn check_columns(&self, expected: &[&str]) -> Result<(), ResourceError> {
        if let Some(width) = self.num_feature {
            if width != expected.len() {
                return Err(ResourceError::ShapeMismatch {
                    stage: "model",
                    expected: expected.len(),
                    actual: width,
                });
            }
        }

        let Some(names) = &self.feature_names else {
            return Ok(());
        };
        if names.len() != expected.len() {
            return Err(ResourceError::ShapeMismatch {
                stage: "model",
                expected: expected.len(),
                actual: names.len(),
            });
        }
        match names
            .iter()
            .zip(expected)
            .position(|(found, wanted)| found != wanted)
        {
            Some(index) => Err(ResourceError::ColumnOrder {
                stage: "model",
                index,
                expected: expected[index].to_string(),
                found: names[index].clone(),
            }),
            None => Ok(()),
        }
    }

    /// Score one scaled feature vector
    pub fn predict(&self, features: &[f64]) -> Result<f64, ResourceError> {
        if let Some(width) = self.num_feature {
            if features.len() != width {
                return Err(ResourceError::ShapeMismatch {
                    stage: "model",
                    expected: width,
                    actual: features.len(),
                });
            }
        }

        // Shape [1, num_features], f32 as the trees were trained
        let input: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let shape = vec![1_i64, input.len() as i64];
        let input_tensor = Tensor::from_array((shape, input)).map_err(inference_error)?;

        let mut session = self
            .session
            .write()
            .map_err(|e| ResourceError::Inference(format!("lock error: {e}")))?;
        let outputs = session
            .run(ort::inputs![&self.input_name => input_tensor])
            .map_err(inference_error)?;

        let output = outputs.get(self.output_name.as_str()).ok_or_else(|| {
            ResourceError::Inference(format!("output '{}' missing", self.output_name))
        })?;
        let (_, data) = output.try_extract_tensor::<f32>().map_err(inference_error)?;
        let price = data
            .first()
            .copied()
            .ok_or_else(|| ResourceError::Inference("empty output tensor".to_string()))?;

        Ok(f64::from(price))
    }
}

impl fmt::Debug for PriceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceModel")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("num_feature", &self.num_feature)
            .field("feature_names", &self.feature_names)
            .finish_non_exhaustive()
    }
}

fn inference_error(e: impl fmt::Display) -> ResourceError {
    ResourceError::Inference(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::FEATURE_NAMES;
    use crate::models::fixture_path;
    use crate::models::loader::load_price_model;

    fn fixture(name: &str) -> PriceModel {
        load_price_model(fixture_path(name), 1).unwrap()
    }

    #[test]
    fn test_reads_layout() {
        let model = fixture("two_trees.onnx");
        assert_eq!(model.input_name(), "input");
        assert_eq!(model.output_name(), "variable");
        assert_eq!(model.num_feature(), Some(8));
        assert_eq!(model.feature_names().map(|n| n.len()), Some(8));
        model.check_columns(&FEATURE_NAMES).unwrap();
    }

    #[test]
    fn test_predict_sums_trees_onto_base() {
        let model = fixture("two_trees.onnx");
        let mut features = [0.0; 8];
        features[3] = 1.25;
        features[6] = -0.5;
        assert_eq!(model.predict(&features).unwrap(), 515_000.0);

        features[3] = -1.0;
        assert_eq!(model.predict(&features).unwrap(), 415_000.0);
    }

    #[test]
    fn test_threshold_is_strict_less_than() {
        let model = fixture("floor_area_split.onnx");
        let mut features = [0.0; 8];
        features[3] = 100.0;
        assert_eq!(model.predict(&features).unwrap(), 480_000.0);

        features[3] = 99.5;
        assert_eq!(model.predict(&features).unwrap(), 350_000.0);
    }

    #[test]
    fn test_wrong_width_vector() {
        let model = fixture("two_trees.onnx");
        assert!(matches!(
            model.predict(&[1.0; 6]),
            Err(ResourceError::ShapeMismatch {
                stage: "model",
                expected: 8,
                actual: 6
            })
        ));
    }

    #[test]
    fn test_narrow_model_rejected() {
        let model = fixture("narrow.onnx");
        assert!(matches!(
            model.check_columns(&FEATURE_NAMES),
            Err(ResourceError::ShapeMismatch {
                stage: "model",
                expected: 8,
                actual: 5
            })
        ));
    }

    #[test]
    fn test_column_order_from_metadata() {
        let model = fixture("swapped_names.onnx");
        match model.check_columns(&FEATURE_NAMES) {
            Err(ResourceError::ColumnOrder {
                stage,
                index,
                found,
                ..
            }) => {
                assert_eq!(stage, "model");
                assert_eq!(index, 0);
                assert_eq!(found, "flat_type");
            }
            other => panic!("expected column order error, got {other:?}"),
        }
    }

    #[test]
    fn test_names_optional() {
        let model = fixture("constant.onnx");
        assert!(model.feature_names().is_none());
        model.check_columns(&FEATURE_NAMES).unwrap();
        assert_eq!(model.predict(&[3.0; 8]).unwrap(), 325_000.0);
    }
}
