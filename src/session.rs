//! Event-driven property form.
//!
//! Field edits only update form state; the validate → preprocess → predict
//! dispatch runs on submit and nowhere else.

use crate::error::{InputError, PredictorError};
use crate::models::inference::PricePredictor;
use crate::types::estimate::PriceEstimate;
use crate::types::property::PropertyInput;
use std::fmt;
use std::str::FromStr;

/// An editable form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Town,
    FlatType,
    StoreyRange,
    FloorAreaSqm,
    FlatModel,
    LeaseCommenceDate,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::Town,
        FormField::FlatType,
        FormField::StoreyRange,
        FormField::FloorAreaSqm,
        FormField::FlatModel,
        FormField::LeaseCommenceDate,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Town => "town",
            FormField::FlatType => "flat_type",
            FormField::StoreyRange => "storey_range",
            FormField::FloorAreaSqm => "floor_area_sqm",
            FormField::FlatModel => "flat_model",
            FormField::LeaseCommenceDate => "lease_commence_date",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormField {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| InputError::Malformed(format!("unknown field '{s}'")))
    }
}

/// Something the user did to the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Set { field: FormField, value: String },
    Reset,
    /// Replace the whole form, as when a saved record is loaded
    Load(PropertyInput),
    Submit,
}

impl FormEvent {
    /// Parse one command line.
    ///
    /// Accepts `submit`, `reset`, `set <field> <value>`, `<field>=<value>`,
    /// or a JSON object, which loads and submits in one step (returned as
    /// two events).
    pub fn parse(line: &str) -> Result<Vec<FormEvent>, InputError> {
        let line = line.trim();

        if line.starts_with('{') {
            let input: PropertyInput = serde_json::from_str(line)
                .map_err(|e| InputError::Malformed(e.to_string()))?;
            return Ok(vec![FormEvent::Load(input), FormEvent::Submit]);
        }

        match line {
            "submit" => return Ok(vec![FormEvent::Submit]),
            "reset" => return Ok(vec![FormEvent::Reset]),
            _ => {}
        }

        let (field, value) = if let Some(rest) = line.strip_prefix("set ") {
            rest.trim_start()
                .split_once(char::is_whitespace)
                .ok_or_else(|| {
                    InputError::Malformed(format!("expected 'set <field> <value>', got '{line}'"))
                })?
        } else if let Some(pair) = line.split_once('=') {
            pair
        } else {
            return Err(InputError::Malformed(format!("unrecognised command '{line}'")));
        };

        Ok(vec![FormEvent::Set {
            field: field.trim().parse()?,
            value: value.trim().to_string(),
        }])
    }
}

/// Result of handling one event
#[derive(Debug)]
pub enum FormOutcome {
    /// Form state changed; nothing was predicted
    Updated,
    Estimated(PriceEstimate),
    Rejected(PredictorError),
}

/// Form state plus the predictor it submits to
#[derive(Debug)]
pub struct FormSession<'a> {
    predictor: PricePredictor<'a>,
    form: PropertyInput,
    submissions: u64,
    rejections: u64,
}

impl<'a> FormSession<'a> {
    /// New session with the form at its defaults
    pub fn new(predictor: PricePredictor<'a>) -> Self {
        Self {
            predictor,
            form: PropertyInput::form_defaults(),
            submissions: 0,
            rejections: 0,
        }
    }

    pub fn form(&self) -> &PropertyInput {
        &self.form
    }

    pub fn submissions(&self) -> u64 {
        self.submissions
    }

    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    pub fn handle(&mut self, event: FormEvent) -> FormOutcome {
        match event {
            FormEvent::Set { field, value } => match self.set_field(field, &value) {
                Ok(()) => FormOutcome::Updated,
                Err(e) => FormOutcome::Rejected(e.into()),
            },
            FormEvent::Reset => {
                self.form = PropertyInput::form_defaults();
                FormOutcome::Updated
            }
            FormEvent::Load(input) => {
                self.form = input;
                FormOutcome::Updated
            }
            FormEvent::Submit => self.submit(),
        }
    }

    fn submit(&mut self) -> FormOutcome {
        self.submissions += 1;
        match self.predictor.estimate(&self.form) {
            Ok(estimate) => FormOutcome::Estimated(estimate),
            Err(e) => {
                self.rejections += 1;
                FormOutcome::Rejected(e)
            }
        }
    }

    fn set_field(&mut self, field: FormField, value: &str) -> Result<(), InputError> {
        let text = Some(value.to_string());
        match field {
            FormField::Town => self.form.town = text,
            FormField::FlatType => self.form.flat_type = text,
            FormField::StoreyRange => self.form.storey_range = text,
            FormField::FlatModel => self.form.flat_model = text,
            FormField::FloorAreaSqm => {
                let area = value.parse::<f64>().map_err(|_| {
                    InputError::Malformed(format!("floor_area_sqm must be a number, got '{value}'"))
                })?;
                self.form.floor_area_sqm = Some(area);
            }
            FormField::LeaseCommenceDate => {
                let year = value.parse::<i32>().map_err(|_| {
                    InputError::Malformed(format!(
                        "lease_commence_date must be a whole year, got '{value}'"
                    ))
                })?;
                self.form.lease_commence_date = Some(year);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_extractor::{FeatureExtractor, FEATURE_NAMES};
    use crate::models::fixture_path;
    use crate::models::loader::{load_price_model, ResourceBundle};
    use crate::models::postal::PostalLookup;
    use crate::models::scaler::ScalerState;
    use crate::types::property::Town;

    fn bundle() -> ResourceBundle {
        let scaler = ScalerState::standard(
            FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            vec![0.0; 8],
            vec![1.0; 8],
        )
        .unwrap();
        let model = load_price_model(fixture_path("constant.onnx"), 1).unwrap();
        ResourceBundle::new(model, scaler, PostalLookup::default()).unwrap()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(FormEvent::parse("submit").unwrap(), vec![FormEvent::Submit]);
        assert_eq!(FormEvent::parse("  reset ").unwrap(), vec![FormEvent::Reset]);
        assert_eq!(
            FormEvent::parse("set town ANG MO KIO").unwrap(),
            vec![FormEvent::Set {
                field: FormField::Town,
                value: "ANG MO KIO".to_string()
            }]
        );
        assert_eq!(
            FormEvent::parse("floor_area_sqm=105").unwrap(),
            vec![FormEvent::Set {
                field: FormField::FloorAreaSqm,
                value: "105".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_json_loads_and_submits() {
        let events = FormEvent::parse(r#"{"town": "BEDOK", "floor_area_sqm": 125}"#).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], FormEvent::Load(input) if input.town.as_deref() == Some("BEDOK")));
        assert_eq!(events[1], FormEvent::Submit);
    }

    #[test]
    fn test_parse_errors() {
        assert!(FormEvent::parse("predict please").is_err());
        assert!(FormEvent::parse("set colour blue").is_err());
        assert!(FormEvent::parse("set town").is_err());
        assert!(FormEvent::parse(r#"{"town": 5}"#).is_err());
    }

    #[test]
    fn test_defaults_submit_successfully() {
        let bundle = bundle();
        let mut session = FormSession::new(PricePredictor::new(&bundle, FeatureExtractor::new()));

        match session.handle(FormEvent::Submit) {
            FormOutcome::Estimated(estimate) => {
                assert_eq!(estimate.price, 325_000.0);
                assert_eq!(estimate.record.town, Town::AngMoKio);
            }
            other => panic!("expected estimate, got {other:?}"),
        }
        assert_eq!(session.submissions(), 1);
        assert_eq!(session.rejections(), 0);
    }

    #[test]
    fn test_edits_do_not_predict() {
        let bundle = bundle();
        let mut session = FormSession::new(PricePredictor::new(&bundle, FeatureExtractor::new()));

        let outcome = session.handle(FormEvent::Set {
            field: FormField::FloorAreaSqm,
            value: "25".to_string(),
        });
        assert!(matches!(outcome, FormOutcome::Updated));
        assert_eq!(session.submissions(), 0);
        assert_eq!(session.form().floor_area_sqm, Some(25.0));

        assert!(matches!(session.handle(FormEvent::Submit), FormOutcome::Rejected(_)));
        assert_eq!(session.rejections(), 1);

        session.handle(FormEvent::Reset);
        assert_eq!(session.form(), &PropertyInput::form_defaults());
    }

    #[test]
    fn test_non_numeric_area_is_rejected() {
        let bundle = bundle();
        let mut session = FormSession::new(PricePredictor::new(&bundle, FeatureExtractor::new()));

        let outcome = session.handle(FormEvent::Set {
            field: FormField::LeaseCommenceDate,
            value: "nineteen ninety".to_string(),
        });
        assert!(matches!(
            outcome,
            FormOutcome::Rejected(PredictorError::Input(InputError::Malformed(_)))
        ));
        assert_eq!(session.form().lease_commence_date, Some(1990));
    }
}
