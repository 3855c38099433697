//! Patient risk-factor form data: raw input, field schema, validation.
//!
//! The 13 predictor fields follow the classic UCI heart-disease feature set.
//! While the operator is editing, every field is held as a display string;
//! coercion to typed values happens only at validation time.

use serde::{Deserialize, Serialize};

/// Identifier for one of the 13 form fields.
///
/// The discriminant doubles as the storage index for [`PatientInput`] and
/// [`FieldErrors`], so the order here is load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Age,
    Sex,
    Cp,
    Trestbps,
    Chol,
    Fbs,
    Restecg,
    Thalach,
    Exang,
    Oldpeak,
    Slope,
    Ca,
    Thal,
}

/// Number of form fields.
pub const FIELD_COUNT: usize = 13;

/// Declared domain of a form field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Whole number within an inclusive range.
    Int { min: i64, max: i64 },
    /// Decimal within an inclusive range, restricted to multiples of `step`.
    Decimal { min: f64, max: f64, step: f64 },
    /// One of a fixed set of string codes.
    Choice { codes: &'static [&'static str] },
}

impl FieldId {
    /// All fields in form order.
    pub const ALL: [FieldId; FIELD_COUNT] = [
        FieldId::Age,
        FieldId::Sex,
        FieldId::Cp,
        FieldId::Trestbps,
        FieldId::Chol,
        FieldId::Fbs,
        FieldId::Restecg,
        FieldId::Thalach,
        FieldId::Exang,
        FieldId::Oldpeak,
        FieldId::Slope,
        FieldId::Ca,
        FieldId::Thal,
    ];

    #[must_use]
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Wire key, as sent to the prediction endpoint.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::Cp => "cp",
            Self::Trestbps => "trestbps",
            Self::Chol => "chol",
            Self::Fbs => "fbs",
            Self::Restecg => "restecg",
            Self::Thalach => "thalach",
            Self::Exang => "exang",
            Self::Oldpeak => "oldpeak",
            Self::Slope => "slope",
            Self::Ca => "ca",
            Self::Thal => "thal",
        }
    }

    /// Human-readable label for form display and error messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::Cp => "Chest Pain Type",
            Self::Trestbps => "Resting Blood Pressure",
            Self::Chol => "Cholesterol",
            Self::Fbs => "Fasting Blood Sugar > 120",
            Self::Restecg => "Resting ECG",
            Self::Thalach => "Max Heart Rate",
            Self::Exang => "Exercise Induced Angina",
            Self::Oldpeak => "ST Depression (oldpeak)",
            Self::Slope => "ST Segment Slope",
            Self::Ca => "Major Vessels Colored",
            Self::Thal => "Thalassemia",
        }
    }

    /// Short hint shown while the field is empty.
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Self::Age => "years (18-100)",
            Self::Sex => "0=male, 1=female",
            Self::Cp => "0=typical, 1=atypical, 2=non-anginal, 3=asymptomatic",
            Self::Trestbps => "mmHg (90-200)",
            Self::Chol => "mg/dL (120-570)",
            Self::Fbs => "0=no, 1=yes",
            Self::Restecg => "0=normal, 1=ST-T abnormality, 2=LV hypertrophy",
            Self::Thalach => "bpm (60-220)",
            Self::Exang => "0=no, 1=yes",
            Self::Oldpeak => "0-5, steps of 0.1",
            Self::Slope => "0=upsloping, 1=flat, 2=downsloping",
            Self::Ca => "vessels (0-3)",
            Self::Thal => "0=normal, 1=fixed defect, 2=reversible defect",
        }
    }

    /// Declared domain for this field.
    #[must_use]
    pub fn kind(self) -> FieldKind {
        match self {
            Self::Age => FieldKind::Int { min: 18, max: 100 },
            Self::Trestbps => FieldKind::Int { min: 90, max: 200 },
            Self::Chol => FieldKind::Int { min: 120, max: 570 },
            Self::Thalach => FieldKind::Int { min: 60, max: 220 },
            Self::Oldpeak => FieldKind::Decimal {
                min: 0.0,
                max: 5.0,
                step: 0.1,
            },
            Self::Sex | Self::Fbs | Self::Exang => FieldKind::Choice {
                codes: &["0", "1"],
            },
            Self::Restecg | Self::Slope | Self::Thal => FieldKind::Choice {
                codes: &["0", "1", "2"],
            },
            Self::Cp | Self::Ca => FieldKind::Choice {
                codes: &["0", "1", "2", "3"],
            },
        }
    }
}

/// One optional error message per known field.
///
/// A structured record rather than an open map: there is no way to record an
/// error for a field the form does not have.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    slots: [Option<String>; FIELD_COUNT],
}

impl FieldErrors {
    /// Error message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: FieldId) -> Option<&str> {
        self.slots[field.index()].as_deref()
    }

    /// Record a message for `field`. The first violation wins; later calls
    /// for the same field are ignored.
    pub fn record(&mut self, field: FieldId, message: String) {
        let slot = &mut self.slots[field.index()];
        if slot.is_none() {
            *slot = Some(message);
        }
    }

    /// Clear the error for a single field, leaving the others untouched.
    pub fn clear(&mut self, field: FieldId) {
        self.slots[field.index()] = None;
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of fields currently carrying an error.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Iterate over `(field, message)` pairs in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldId, &str)> + '_ {
        FieldId::ALL
            .iter()
            .filter_map(|&id| self.get(id).map(|msg| (id, msg)))
    }
}

/// The form's working data: every field held as a raw display string.
///
/// Numeric fields default to empty; enum fields default to their first code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientInput {
    values: [String; FIELD_COUNT],
}

impl Default for PatientInput {
    fn default() -> Self {
        let mut values: [String; FIELD_COUNT] = Default::default();
        for id in FieldId::ALL {
            if let FieldKind::Choice { codes } = id.kind() {
                values[id.index()] = codes[0].to_string();
            }
        }
        Self { values }
    }
}

impl PatientInput {
    /// Current raw value of `field`.
    #[must_use]
    pub fn get(&self, field: FieldId) -> &str {
        &self.values[field.index()]
    }

    /// Store a raw string for `field`.
    pub fn set(&mut self, field: FieldId, raw: impl Into<String>) {
        self.values[field.index()] = raw.into();
    }

    /// Mutable access to the raw buffer, for in-place editing.
    pub(crate) fn value_mut(&mut self, field: FieldId) -> &mut String {
        &mut self.values[field.index()]
    }

    /// Coerce and validate every field against its declared domain.
    ///
    /// Validation does not short-circuit: every violated field is collected,
    /// with a single message per field (the first violation wins).
    ///
    /// # Errors
    /// Returns the per-field error record when any field is out of domain.
    pub fn validate(&self) -> Result<TypedPatientInput, FieldErrors> {
        let mut errors = FieldErrors::default();

        let age = self.int_field(FieldId::Age, &mut errors);
        let sex = self.choice_field(FieldId::Sex, &mut errors);
        let cp = self.choice_field(FieldId::Cp, &mut errors);
        let trestbps = self.int_field(FieldId::Trestbps, &mut errors);
        let chol = self.int_field(FieldId::Chol, &mut errors);
        let fbs = self.choice_field(FieldId::Fbs, &mut errors);
        let restecg = self.choice_field(FieldId::Restecg, &mut errors);
        let thalach = self.int_field(FieldId::Thalach, &mut errors);
        let exang = self.choice_field(FieldId::Exang, &mut errors);
        let oldpeak = self.decimal_field(FieldId::Oldpeak, &mut errors);
        let slope = self.choice_field(FieldId::Slope, &mut errors);
        let ca = self.choice_field(FieldId::Ca, &mut errors);
        let thal = self.choice_field(FieldId::Thal, &mut errors);

        if errors.is_empty() {
            Ok(TypedPatientInput {
                age,
                sex,
                cp,
                trestbps,
                chol,
                fbs,
                restecg,
                thalach,
                exang,
                oldpeak,
                slope,
                ca,
                thal,
            })
        } else {
            Err(errors)
        }
    }

    // The field helpers record a message on failure and return a placeholder;
    // placeholders are only ever used when `errors` stays empty.

    fn int_field(&self, field: FieldId, errors: &mut FieldErrors) -> u32 {
        let FieldKind::Int { min, max } = field.kind() else {
            errors.record(field, format!("{} is not a numeric field", field.label()));
            return 0;
        };
        let raw = self.get(field).trim();
        let Ok(value) = raw.parse::<i64>() else {
            errors.record(field, format!("{} must be a whole number", field.label()));
            return 0;
        };
        if value < min || value > max {
            errors.record(
                field,
                format!("{} must be between {} and {}", field.label(), min, max),
            );
            return 0;
        }
        value as u32
    }

    fn decimal_field(&self, field: FieldId, errors: &mut FieldErrors) -> f64 {
        let FieldKind::Decimal { min, max, step } = field.kind() else {
            errors.record(field, format!("{} is not a decimal field", field.label()));
            return 0.0;
        };
        let raw = self.get(field).trim();
        let Ok(value) = raw.parse::<f64>() else {
            errors.record(field, format!("{} must be a number", field.label()));
            return 0.0;
        };
        if !value.is_finite() || value < min || value > max {
            errors.record(
                field,
                format!("{} must be between {} and {}", field.label(), min, max),
            );
            return 0.0;
        }
        // Multiple-of check with float tolerance.
        let steps = value / step;
        if (steps - steps.round()).abs() > 1e-6 {
            errors.record(
                field,
                format!("{} must be a multiple of {}", field.label(), step),
            );
            return 0.0;
        }
        value
    }

    fn choice_field(&self, field: FieldId, errors: &mut FieldErrors) -> String {
        let FieldKind::Choice { codes } = field.kind() else {
            errors.record(field, format!("{} is not a choice field", field.label()));
            return String::new();
        };
        let raw = self.get(field);
        if codes.contains(&raw) {
            raw.to_string()
        } else {
            errors.record(
                field,
                format!("{} must be one of {}", field.label(), codes.join(", ")),
            );
            String::new()
        }
    }
}

/// Fully coerced patient record, ready to serialize to the wire.
///
/// Numeric fields are JSON numbers; enum fields stay as their string code,
/// matching what the prediction endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedPatientInput {
    pub age: u32,
    pub sex: String,
    pub cp: String,
    pub trestbps: u32,
    pub chol: u32,
    pub fbs: String,
    pub restecg: String,
    pub thalach: u32,
    pub exang: String,
    pub oldpeak: f64,
    pub slope: String,
    pub ca: String,
    pub thal: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> PatientInput {
        let mut input = PatientInput::default();
        input.set(FieldId::Age, "57");
        input.set(FieldId::Sex, "1");
        input.set(FieldId::Cp, "2");
        input.set(FieldId::Trestbps, "130");
        input.set(FieldId::Chol, "236");
        input.set(FieldId::Fbs, "0");
        input.set(FieldId::Restecg, "1");
        input.set(FieldId::Thalach, "174");
        input.set(FieldId::Exang, "0");
        input.set(FieldId::Oldpeak, "1.4");
        input.set(FieldId::Slope, "1");
        input.set(FieldId::Ca, "0");
        input.set(FieldId::Thal, "2");
        input
    }

    #[test]
    fn valid_input_is_coerced() {
        let typed = valid_input().validate().expect("should validate");
        assert_eq!(typed.age, 57);
        assert_eq!(typed.trestbps, 130);
        assert_eq!(typed.chol, 236);
        assert_eq!(typed.thalach, 174);
        assert!((typed.oldpeak - 1.4).abs() < 1e-9);
        // Enum fields keep their string codes.
        assert_eq!(typed.sex, "1");
        assert_eq!(typed.cp, "2");
        assert_eq!(typed.thal, "2");
    }

    #[test]
    fn age_below_domain_names_age() {
        let mut input = valid_input();
        input.set(FieldId::Age, "17");
        let errors = input.validate().expect_err("should reject");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(FieldId::Age),
            Some("Age must be between 18 and 100")
        );
        assert!(errors.get(FieldId::Chol).is_none());
    }

    #[test]
    fn every_field_rejects_out_of_domain_values() {
        let bad: [(FieldId, &str); 13] = [
            (FieldId::Age, "101"),
            (FieldId::Sex, "2"),
            (FieldId::Cp, "4"),
            (FieldId::Trestbps, "89"),
            (FieldId::Chol, "571"),
            (FieldId::Fbs, "yes"),
            (FieldId::Restecg, "3"),
            (FieldId::Thalach, "59"),
            (FieldId::Exang, "-1"),
            (FieldId::Oldpeak, "5.1"),
            (FieldId::Slope, "3"),
            (FieldId::Ca, "4"),
            (FieldId::Thal, "3"),
        ];
        for (field, value) in bad {
            let mut input = valid_input();
            input.set(field, value);
            let errors = input.validate().expect_err("should reject");
            assert_eq!(errors.len(), 1, "{} should be the only error", field.name());
            assert!(
                errors.get(field).is_some(),
                "{} should carry an error",
                field.name()
            );
        }
    }

    #[test]
    fn violations_are_collected_not_short_circuited() {
        let mut input = valid_input();
        input.set(FieldId::Age, "17");
        input.set(FieldId::Chol, "50");
        input.set(FieldId::Thal, "9");
        let errors = input.validate().expect_err("should reject");
        assert_eq!(errors.len(), 3);
        assert!(errors.get(FieldId::Age).is_some());
        assert!(errors.get(FieldId::Chol).is_some());
        assert!(errors.get(FieldId::Thal).is_some());
    }

    #[test]
    fn unparseable_number_wins_over_range() {
        let mut input = valid_input();
        input.set(FieldId::Age, "abc");
        let errors = input.validate().expect_err("should reject");
        assert_eq!(errors.get(FieldId::Age), Some("Age must be a whole number"));
    }

    #[test]
    fn integer_fields_reject_decimals() {
        let mut input = valid_input();
        input.set(FieldId::Trestbps, "130.5");
        let errors = input.validate().expect_err("should reject");
        assert!(errors.get(FieldId::Trestbps).is_some());
    }

    #[test]
    fn oldpeak_enforces_step() {
        let mut input = valid_input();
        input.set(FieldId::Oldpeak, "1.45");
        let errors = input.validate().expect_err("should reject");
        assert_eq!(
            errors.get(FieldId::Oldpeak),
            Some("ST Depression (oldpeak) must be a multiple of 0.1")
        );

        let mut input = valid_input();
        input.set(FieldId::Oldpeak, "2.3");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn empty_numeric_fields_are_rejected() {
        let errors = PatientInput::default()
            .validate()
            .expect_err("should reject");
        // The five numeric fields start empty; the enum fields default to "0".
        assert_eq!(errors.len(), 5);
        for field in [
            FieldId::Age,
            FieldId::Trestbps,
            FieldId::Chol,
            FieldId::Thalach,
            FieldId::Oldpeak,
        ] {
            assert!(errors.get(field).is_some());
        }
    }

    #[test]
    fn defaults_are_empty_numerics_and_first_codes() {
        let input = PatientInput::default();
        assert_eq!(input.get(FieldId::Age), "");
        assert_eq!(input.get(FieldId::Oldpeak), "");
        assert_eq!(input.get(FieldId::Sex), "0");
        assert_eq!(input.get(FieldId::Cp), "0");
    }

    #[test]
    fn wire_serialization_uses_numbers_and_code_strings() {
        let typed = valid_input().validate().expect("should validate");
        let json = serde_json::to_value(&typed).expect("should serialize");
        assert_eq!(json["age"], serde_json::json!(57));
        assert_eq!(json["oldpeak"], serde_json::json!(1.4));
        assert_eq!(json["sex"], serde_json::json!("1"));
        assert_eq!(json["ca"], serde_json::json!("0"));
        // All 13 wire keys present.
        let obj = json.as_object().expect("object");
        assert_eq!(obj.len(), 13);
        for id in FieldId::ALL {
            assert!(obj.contains_key(id.name()), "missing key {}", id.name());
        }
    }

    #[test]
    fn field_errors_clear_is_per_field() {
        let mut errors = FieldErrors::default();
        errors.record(FieldId::Age, "bad age".into());
        errors.record(FieldId::Chol, "bad chol".into());
        errors.clear(FieldId::Age);
        assert!(errors.get(FieldId::Age).is_none());
        assert_eq!(errors.get(FieldId::Chol), Some("bad chol"));
    }

    #[test]
    fn first_violation_wins_per_field() {
        let mut errors = FieldErrors::default();
        errors.record(FieldId::Age, "first".into());
        errors.record(FieldId::Age, "second".into());
        assert_eq!(errors.get(FieldId::Age), Some("first"));
    }
}
