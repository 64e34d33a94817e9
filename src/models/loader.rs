//! Artifact loader for the ONNX model, scaler and postal table

use crate::config::ArtifactsConfig;
use crate::error::ResourceError;
use crate::feature_extractor::FEATURE_NAMES;
use crate::models::postal::PostalLookup;
use crate::models::regressor::PriceModel;
use crate::models::scaler::ScalerState;
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything a prediction needs, loaded once and shared read-only
#[derive(Debug)]
pub struct ResourceBundle {
    model: PriceModel,
    scaler: ScalerState,
    postal: PostalLookup,
}

impl ResourceBundle {
    /// Assemble a bundle, checking the scaler and model agree on the columns
    pub fn new(
        model: PriceModel,
        scaler: ScalerState,
        postal: PostalLookup,
    ) -> Result<Self, ResourceError> {
        scaler.check_columns(&FEATURE_NAMES)?;
        model.check_columns(&FEATURE_NAMES)?;
        Ok(Self {
            model,
            scaler,
            postal,
        })
    }

    /// Load all three artifacts from the configured paths
    pub fn load(artifacts: &ArtifactsConfig) -> Result<Self, ResourceError> {
        ResourceLoader::new(artifacts).load_all()
    }

    pub fn model(&self) -> &PriceModel {
        &self.model
    }

    pub fn scaler(&self) -> &ScalerState {
        &self.scaler
    }

    pub fn postal(&self) -> &PostalLookup {
        &self.postal
    }
}

/// Open an ONNX model file as a [`PriceModel`]
pub fn load_price_model<P: AsRef<Path>>(
    path: P,
    onnx_threads: usize,
) -> Result<PriceModel, ResourceError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ResourceError::Missing {
            artifact: "model",
            path: path.to_path_buf(),
        });
    }
    let corrupt = |reason: String| ResourceError::Corrupt {
        artifact: "model",
        path: path.to_path_buf(),
        reason,
    };

    let session = Session::builder()
        .map_err(|e| corrupt(e.to_string()))?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .map_err(|e| corrupt(e.to_string()))?
        .with_intra_threads(onnx_threads)
        .map_err(|e| corrupt(e.to_string()))?
        .commit_from_file(path)
        .map_err(|e| corrupt(e.to_string()))?;

    PriceModel::from_session(session).map_err(corrupt)
}

/// Loader for the serialized artifacts
pub struct ResourceLoader {
    model_path: PathBuf,
    scaler_path: PathBuf,
    postal_data_path: PathBuf,
    onnx_threads: usize,
}

impl ResourceLoader {
    pub fn new(artifacts: &ArtifactsConfig) -> Self {
        Self::with_paths(
            &artifacts.model_path,
            &artifacts.scaler_path,
            &artifacts.postal_data_path,
        )
        .with_threads(artifacts.onnx_threads)
    }

    /// Loader over explicit paths, single-threaded inference
    pub fn with_paths<P: AsRef<Path>>(model: P, scaler: P, postal_data: P) -> Self {
        Self {
            model_path: model.as_ref().to_path_buf(),
            scaler_path: scaler.as_ref().to_path_buf(),
            postal_data_path: postal_data.as_ref().to_path_buf(),
            onnx_threads: 1,
        }
    }

    /// Set the ONNX Runtime intra-op thread count
    pub fn with_threads(mut self, onnx_threads: usize) -> Self {
        self.onnx_threads = onnx_threads.max(1);
        self
    }

    /// Load the ONNX regressor
    pub fn load_model(&self) -> Result<PriceModel, ResourceError> {
        let path = &self.model_path;
        info!(path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let model = load_price_model(path, self.onnx_threads)?;

        info!(
            input = %model.input_name(),
            output = %model.output_name(),
            num_feature = ?model.num_feature(),
            named_columns = model.feature_names().is_some(),
            "Model loaded successfully"
        );
        Ok(model)
    }

    /// Load the fitted scaler export
    pub fn load_scaler(&self) -> Result<ScalerState, ResourceError> {
        let path = &self.scaler_path;
        info!(path = %path.display(), "Loading scaler");

        let text = read_artifact("scaler", path)?;
        let scaler = ScalerState::from_json(&text).map_err(|reason| ResourceError::Corrupt {
            artifact: "scaler",
            path: path.clone(),
            reason,
        })?;

        info!(columns = scaler.width(), "Scaler loaded successfully");
        Ok(scaler)
    }

    /// Load the town coordinate table
    pub fn load_postal(&self) -> Result<PostalLookup, ResourceError> {
        let path = &self.postal_data_path;
        info!(path = %path.display(), "Loading postal data");

        let text = read_artifact("postal data", path)?;
        let postal = PostalLookup::from_json(&text).map_err(|reason| ResourceError::Corrupt {
            artifact: "postal data",
            path: path.clone(),
            reason,
        })?;

        info!(towns = postal.len(), "Postal data loaded successfully");
        Ok(postal)
    }

    /// Load every artifact; any failure fails the whole load
    pub fn load_all(&self) -> Result<ResourceBundle, ResourceError> {
        let model = self.load_model()?;
        let scaler = self.load_scaler()?;
        let postal = self.load_postal()?;
        ResourceBundle::new(model, scaler, postal)
    }
}

fn read_artifact(artifact: &'static str, path: &Path) -> Result<String, ResourceError> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ResourceError::Missing {
                artifact,
                path: path.to_path_buf(),
            }
        } else {
            ResourceError::Unreadable {
                artifact,
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixture_path;
    use std::fs;
    use tempfile::TempDir;

    const MODEL: &str = "two_trees.onnx";

    const SCALER: &str = r#"{
        "kind": "standard",
        "mean": [12, 2.5, 3, 95, 3, 1992, 65, 1022.6],
        "scale": [7.5, 1, 2.4, 24, 4.1, 12, 12, 258.3]
    }"#;

    const POSTAL: &str = r#"{"BEDOK": {"coordinates": [1.3236, 103.9273]}}"#;

    fn write_artifacts(dir: &TempDir, model: &str, scaler: &str, postal: &str) -> ResourceLoader {
        let model_path = dir.path().join("model.onnx");
        let scaler_path = dir.path().join("scaler.json");
        let postal_path = dir.path().join("postal_data.json");
        fs::copy(fixture_path(model), &model_path).unwrap();
        fs::write(&scaler_path, scaler).unwrap();
        fs::write(&postal_path, postal).unwrap();
        ResourceLoader::with_paths(model_path, scaler_path, postal_path)
    }

    #[test]
    fn test_load_all() {
        let dir = TempDir::new().unwrap();
        let bundle = write_artifacts(&dir, MODEL, SCALER, POSTAL).load_all().unwrap();

        assert_eq!(bundle.model().num_feature(), Some(8));
        assert_eq!(bundle.scaler().width(), 8);
        assert_eq!(bundle.postal().len(), 1);
    }

    #[test]
    fn test_missing_model_file() {
        let dir = TempDir::new().unwrap();
        let loader = write_artifacts(&dir, MODEL, SCALER, POSTAL);
        fs::remove_file(dir.path().join("model.onnx")).unwrap();

        match loader.load_all() {
            Err(ResourceError::Missing { artifact, .. }) => assert_eq!(artifact, "model"),
            other => panic!("expected missing model, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_scaler_file() {
        let dir = TempDir::new().unwrap();
        let loader = write_artifacts(&dir, MODEL, "{\"kind\": ", POSTAL);

        let err = loader.load_all().unwrap_err();
        assert!(matches!(
            err,
            ResourceError::Corrupt {
                artifact: "scaler",
                ..
            }
        ));
        assert!(err.to_string().contains("scaler.json"));
    }

    #[test]
    fn test_scaler_width_must_match_features() {
        let dir = TempDir::new().unwrap();
        let narrow = r#"{"kind": "standard", "mean": [0, 0], "scale": [1, 1]}"#;
        let err = write_artifacts(&dir, MODEL, narrow, POSTAL)
            .load_all()
            .unwrap_err();

        assert!(matches!(
            err,
            ResourceError::ShapeMismatch {
                stage: "scaler",
                expected: 8,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_scaler_column_order_checked() {
        let dir = TempDir::new().unwrap();
        let swapped = r#"{
            "kind": "standard",
            "feature_names": ["flat_type", "town", "storey_range", "floor_area_sqm",
                              "flat_model", "lease_commence_date", "remaining_lease",
                              "floor_area_sqft"],
            "mean": [0, 0, 0, 0, 0, 0, 0, 0],
            "scale": [1, 1, 1, 1, 1, 1, 1, 1]
        }"#;
        let err = write_artifacts(&dir, MODEL, swapped, POSTAL)
            .load_all()
            .unwrap_err();

        assert!(matches!(err, ResourceError::ColumnOrder { index: 0, .. }));
    }

    #[test]
    fn test_corrupt_model_file() {
        let dir = TempDir::new().unwrap();
        let loader = write_artifacts(&dir, MODEL, SCALER, POSTAL);
        fs::write(dir.path().join("model.onnx"), b"not an onnx graph").unwrap();

        let err = loader.load_all().unwrap_err();
        assert!(matches!(err, ResourceError::Corrupt { artifact: "model", .. }));
        assert!(err.to_string().contains("model.onnx"));
    }

    #[test]
    fn test_model_width_must_match_features() {
        let dir = TempDir::new().unwrap();
        let err = write_artifacts(&dir, "narrow.onnx", SCALER, POSTAL)
            .load_all()
            .unwrap_err();

        assert!(matches!(
            err,
            ResourceError::ShapeMismatch {
                stage: "model",
                expected: 8,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_threads_from_config() {
        let artifacts = ArtifactsConfig {
            onnx_threads: 0,
            ..ArtifactsConfig::default()
        };
        assert_eq!(ResourceLoader::new(&artifacts).onnx_threads, 1);
    }
}
