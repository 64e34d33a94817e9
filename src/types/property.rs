//! Property record data structures for HDB resale price estimation

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Declares a closed categorical set.
///
/// Variant order is the ordinal encoding fed to the model, so it must follow
/// the order the artifacts were fitted with.
macro_rules! category {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// Every value in encoding order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Form field this category belongs to
            pub const FIELD: &'static str = $field;

            /// Label as it appears in the resale data
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Ordinal position in [`Self::ALL`]
            pub fn code(&self) -> usize {
                *self as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = InputError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    other => Err(InputError::UnknownCategory {
                        field: $field,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

category! {
    /// HDB town
    Town, "town" {
        AngMoKio => "ANG MO KIO",
        Bedok => "BEDOK",
        Bishan => "BISHAN",
        BukitBatok => "BUKIT BATOK",
        BukitMerah => "BUKIT MERAH",
        BukitPanjang => "BUKIT PANJANG",
        BukitTimah => "BUKIT TIMAH",
        CentralArea => "CENTRAL AREA",
        ChoaChuKang => "CHOA CHU KANG",
        Clementi => "CLEMENTI",
        Geylang => "GEYLANG",
        Hougang => "HOUGANG",
        JurongEast => "JURONG EAST",
        JurongWest => "JURONG WEST",
        KallangWhampoa => "KALLANG/WHAMPOA",
        MarineParade => "MARINE PARADE",
        PasirRis => "PASIR RIS",
        Punggol => "PUNGGOL",
        Queenstown => "QUEENSTOWN",
        Sembawang => "SEMBAWANG",
        Sengkang => "SENGKANG",
        Serangoon => "SERANGOON",
        Tampines => "TAMPINES",
        ToaPayoh => "TOA PAYOH",
        Woodlands => "WOODLANDS",
        Yishun => "YISHUN",
    }
}

category! {
    /// Flat type (room count class)
    FlatType, "flat_type" {
        TwoRoom => "2 ROOM",
        ThreeRoom => "3 ROOM",
        FourRoom => "4 ROOM",
        FiveRoom => "5 ROOM",
        Executive => "EXECUTIVE",
        MultiGeneration => "MULTI-GENERATION",
    }
}

category! {
    /// Storey band of the unit
    StoreyRange, "storey_range" {
        S01To03 => "01 TO 03",
        S04To06 => "04 TO 06",
        S07To09 => "07 TO 09",
        S10To12 => "10 TO 12",
        S13To15 => "13 TO 15",
        S16To18 => "16 TO 18",
        S19To21 => "19 TO 21",
        S22To24 => "22 TO 24",
        S25To27 => "25 TO 27",
        S28To30 => "28 TO 30",
        S31To33 => "31 TO 33",
        S34To36 => "34 TO 36",
        S37To39 => "37 TO 39",
        S40To42 => "40 TO 42",
        S43To45 => "43 TO 45",
        S46To48 => "46 TO 48",
        S49To51 => "49 TO 51",
    }
}

category! {
    /// Flat model (design generation)
    FlatModel, "flat_model" {
        Improved => "Improved",
        NewGeneration => "New Generation",
        ModelA => "Model A",
        Standard => "Standard",
        Simplified => "Simplified",
        PremiumApartment => "Premium Apartment",
        Maisonette => "Maisonette",
        Apartment => "Apartment",
        ModelA2 => "Model A2",
        Dbss => "DBSS",
        Terrace => "Terrace",
        AdjoinedFlat => "Adjoined flat",
        ModelAMaisonette => "Model A-Maisonette",
        TypeS1 => "Type S1",
        TypeS2 => "Type S2",
        ImprovedMaisonette => "Improved-Maisonette",
        MultiGeneration => "Multi Generation",
        PremiumMaisonette => "Premium Maisonette",
        TwoRoom => "2-room",
        ThreeGen => "3Gen",
    }
}

/// Raw form state; any field may be missing until validated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    #[serde(default)]
    pub town: Option<String>,

    #[serde(default)]
    pub flat_type: Option<String>,

    #[serde(default)]
    pub storey_range: Option<String>,

    /// Floor area in square metres
    #[serde(default)]
    pub floor_area_sqm: Option<f64>,

    #[serde(default)]
    pub flat_model: Option<String>,

    /// Year the 99-year lease commenced
    #[serde(default)]
    pub lease_commence_date: Option<i32>,
}

impl PropertyInput {
    /// Form with the widget defaults: first option of every list, 100 sqm, 1990
    pub fn form_defaults() -> Self {
        Self {
            town: Some(Town::ALL[0].to_string()),
            flat_type: Some(FlatType::ALL[0].to_string()),
            storey_range: Some(StoreyRange::ALL[0].to_string()),
            floor_area_sqm: Some(100.0),
            flat_model: Some(FlatModel::ALL[0].to_string()),
            lease_commence_date: Some(1990),
        }
    }
}

impl From<&PropertyRecord> for PropertyInput {
    fn from(record: &PropertyRecord) -> Self {
        Self {
            town: Some(record.town.to_string()),
            flat_type: Some(record.flat_type.to_string()),
            storey_range: Some(record.storey_range.to_string()),
            floor_area_sqm: Some(record.floor_area_sqm),
            flat_model: Some(record.flat_model.to_string()),
            lease_commence_date: Some(record.lease_commence_date),
        }
    }
}

/// A complete property record with every categorical resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub town: Town,
    pub flat_type: FlatType,
    pub storey_range: StoreyRange,
    pub floor_area_sqm: f64,
    pub flat_model: FlatModel,
    pub lease_commence_date: i32,
}

impl PropertyRecord {
    pub fn new(
        town: Town,
        flat_type: FlatType,
        storey_range: StoreyRange,
        floor_area_sqm: f64,
        flat_model: FlatModel,
        lease_commence_date: i32,
    ) -> Self {
        Self {
            town,
            flat_type,
            storey_range,
            floor_area_sqm,
            flat_model,
            lease_commence_date,
        }
    }
}

impl TryFrom<&PropertyInput> for PropertyRecord {
    type Error = InputError;

    fn try_from(input: &PropertyInput) -> Result<Self, Self::Error> {
        fn required<T: Clone>(value: &Option<T>, field: &str) -> Result<T, InputError> {
            value
                .clone()
                .ok_or_else(|| InputError::Malformed(format!("missing required field: {field}")))
        }

        Ok(Self {
            town: required(&input.town, "town")?.parse()?,
            flat_type: required(&input.flat_type, "flat_type")?.parse()?,
            storey_range: required(&input.storey_range, "storey_range")?.parse()?,
            floor_area_sqm: required(&input.floor_area_sqm, "floor_area_sqm")?,
            flat_model: required(&input.flat_model, "flat_model")?.parse()?,
            lease_commence_date: required(&input.lease_commence_date, "lease_commence_date")?,
        })
    }
}
