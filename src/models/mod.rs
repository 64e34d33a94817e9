//! Model artifacts and inference components

pub mod inference;
pub mod loader;
pub mod postal;
pub mod regressor;
pub mod scaler;

pub use inference::PricePredictor;
pub use loader::{load_price_model, ResourceBundle, ResourceLoader};
pub use postal::{get_town_coordinates, PostalLookup};
pub use regressor::PriceModel;
pub use scaler::ScalerState;

#[cfg(test)]
pub(crate) fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}
