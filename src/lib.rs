//! HDB Resale Price Predictor Library
//!
//! Estimates Singapore public-housing resale prices from a handful of
//! property attributes. A pre-trained XGBoost model served through ONNX
//! Runtime, a fitted feature scaler and a town coordinate table are loaded
//! once at start-up.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod models;
pub mod report;
pub mod session;
pub mod types;
pub mod validation;

pub use config::AppConfig;
pub use error::{InputError, PredictorError, ResourceError};
pub use feature_extractor::{calculate_remaining_lease, FeatureExtractor, LeaseReference};
pub use models::{get_town_coordinates, PricePredictor, ResourceBundle};
pub use report::format_currency;
pub use session::{FormEvent, FormOutcome, FormSession};
pub use types::{PriceEstimate, PropertyInput, PropertyRecord};
pub use validation::validate_inputs;
