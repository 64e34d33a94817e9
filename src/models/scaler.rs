//! Fitted per-column feature scaler
//!
//! Reads the JSON export of a fitted scikit-learn `StandardScaler`
//! (`mean_`, `scale_`) or `MinMaxScaler` (`min_`, `scale_`):
//!
//! ```json
//! {"kind": "standard", "feature_names": ["town", ...], "mean": [...], "scale": [...]}
//! ```

use crate::error::ResourceError;
use serde::{Deserialize, Serialize};

/// Per-column transform parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerTransform {
    /// `(x - mean) / scale`
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// `x * scale + min`
    MinMax { min: Vec<f64>, scale: Vec<f64> },
}

/// Immutable fitted scaler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    /// Column names the scaler was fitted on, when the export includes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_names: Option<Vec<String>>,

    #[serde(flatten)]
    pub transform: ScalerTransform,
}

impl ScalerState {
    /// Standardization scaler
    pub fn standard(
        feature_names: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, String> {
        let state = Self {
            feature_names: Some(feature_names),
            transform: ScalerTransform::Standard { mean, scale },
        };
        state.validate()?;
        Ok(state)
    }

    /// Min-max scaler
    pub fn min_max(
        feature_names: Vec<String>,
        min: Vec<f64>,
        scale: Vec<f64>,
    ) -> Result<Self, String> {
        let state = Self {
            feature_names: Some(feature_names),
            transform: ScalerTransform::MinMax { min, scale },
        };
        state.validate()?;
        Ok(state)
    }

    /// Parse and validate a scaler export
    pub fn from_json(text: &str) -> Result<Self, String> {
        let state: Self = serde_json::from_str(text).map_err(|e| e.to_string())?;
        state.validate()?;
        Ok(state)
    }

    /// Number of columns the scaler was fitted on
    pub fn width(&self) -> usize {
        match &self.transform {
            ScalerTransform::Standard { scale, .. } | ScalerTransform::MinMax { scale, .. } => {
                scale.len()
            }
        }
    }

    /// Check parameter vectors agree with each other
    pub fn validate(&self) -> Result<(), String> {
        let (offset, scale, offset_name) = match &self.transform {
            ScalerTransform::Standard { mean, scale } => (mean, scale, "mean"),
            ScalerTransform::MinMax { min, scale } => (min, scale, "min"),
        };

        if scale.is_empty() {
            return Err("scaler has no columns".to_string());
        }
        if offset.len() != scale.len() {
            return Err(format!(
                "{} has {} values but scale has {}",
                offset_name,
                offset.len(),
                scale.len()
            ));
        }
        if let Some(names) = &self.feature_names {
            if names.len() != scale.len() {
                return Err(format!(
                    "{} feature names for {} columns",
                    names.len(),
                    scale.len()
                ));
            }
        }
        if let Some(i) = offset.iter().position(|v| !v.is_finite()) {
            return Err(format!("{offset_name}[{i}] is not finite"));
        }
        match &self.transform {
            // Division by scale: zero would produce infinities
            ScalerTransform::Standard { scale, .. } => {
                if let Some(i) = scale.iter().position(|v| !v.is_finite() || *v == 0.0) {
                    return Err(format!("scale[{i}] must be finite and non-zero"));
                }
            }
            ScalerTransform::MinMax { scale, .. } => {
                if let Some(i) = scale.iter().position(|v| !v.is_finite()) {
                    return Err(format!("scale[{i}] is not finite"));
                }
            }
        }

        Ok(())
    }

    /// Verify the scaler was fitted on exactly `expected`, in order
    pub fn check_columns(&self, expected: &[&str]) -> Result<(), ResourceError> {
        if self.width() != expected.len() {
            return Err(ResourceError::ShapeMismatch {
                stage: "scaler",
                expected: expected.len(),
                actual: self.width(),
            });
        }

        if let Some(names) = &self.feature_names {
            for (index, (found, want)) in names.iter().zip(expected).enumerate() {
                if found != want {
                    return Err(ResourceError::ColumnOrder {
                        stage: "scaler",
                        index,
                        expected: want.to_string(),
                        found: found.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Apply the per-column transform to one feature vector
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, ResourceError> {
        if features.len() != self.width() {
            return Err(ResourceError::ShapeMismatch {
                stage: "scaler",
                expected: self.width(),
                actual: features.len(),
            });
        }

        let scaled: Vec<f64> = match &self.transform {
            ScalerTransform::Standard { mean, scale } => features
                .iter()
                .zip(mean.iter().zip(scale))
                .map(|(x, (m, s))| (x - m) / s)
                .collect(),
            ScalerTransform::MinMax { min, scale } => features
                .iter()
                .zip(min.iter().zip(scale))
                .map(|(x, (m, s))| x * s + m)
                .collect(),
        };

        Ok(scaled)
    }
}
