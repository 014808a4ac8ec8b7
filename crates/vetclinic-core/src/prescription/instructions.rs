//! Display text derived from a line item: name, instructions, quantity.

use crate::models::{Choice, MedicationRecord, PharmaceuticalForm, Selection};

/// Printed in place of a medication with neither name nor concentration.
pub const UNNAMED_MEDICATION: &str = "Medicamento sem nome";

/// Resolve the name shown on the header line of a medication block.
///
/// Both parts present → "name concentration"; otherwise whichever is
/// present; otherwise [`UNNAMED_MEDICATION`].
pub fn display_name(name: &str, concentration: &str) -> String {
    match (name.trim(), concentration.trim()) {
        ("", "") => UNNAMED_MEDICATION.to_string(),
        (name, "") => name.to_string(),
        ("", concentration) => concentration.to_string(),
        (name, concentration) => format!("{} {}", name, concentration),
    }
}

/// Parse a typed dose: "1", "2.5", "0,5", "1/2" or "1 1/2". Trailing text
/// after the number is ignored ("2 comprimidos" → 2).
pub fn parse_dose(dose: &str) -> Option<f64> {
    let mut tokens = dose.split_whitespace();
    let first = parse_number(tokens.next()?)?;

    // Mixed number: "1 1/2"
    let value = match tokens.next() {
        Some(next) if next.contains('/') => first + parse_number(next)?,
        _ => first,
    };

    (value > 0.0 && value.is_finite()).then_some(value)
}

fn parse_number(token: &str) -> Option<f64> {
    if let Some((num, den)) = token.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }
    token.replace(',', ".").parse().ok()
}

/// Format a quantity to at most two decimals with a decimal comma,
/// dropping a zero fraction.
fn format_amount(value: f64) -> String {
    let text = format!("{:.2}", value);
    text.trim_end_matches('0')
        .trim_end_matches('.')
        .replace('.', ",")
}

/// Dose with its administration unit, e.g. "1 comprimido", "2 gotas".
fn dose_with_unit(record: &MedicationRecord) -> Option<String> {
    let dose = record.dose.trim();
    if dose.is_empty() {
        return None;
    }

    let unit = match &record.form {
        Some(Selection::Predefined(form)) => {
            let (singular, plural) = form.unit();
            match parse_dose(dose) {
                Some(value) if value > 1.0 => plural.to_string(),
                _ => singular.to_string(),
            }
        }
        Some(Selection::Custom(text)) => text.trim().to_lowercase(),
        None => String::new(),
    };

    Some(if unit.is_empty() {
        dose.to_string()
    } else {
        format!("{} {}", dose, unit)
    })
}

/// Build the automatic instruction text for a line item.
///
/// Unfilled fields are left out; a record with nothing filled in yields "".
pub fn generate_instructions(record: &MedicationRecord) -> String {
    let parts: Vec<String> = [
        dose_with_unit(record),
        record.frequency.as_ref().map(Selection::label),
        record.period.as_ref().map(Selection::label),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect();

    if parts.is_empty() {
        return String::new();
    }

    let verb = match record.form {
        Some(Selection::Predefined(PharmaceuticalForm::Ointment)) => "Aplicar",
        _ => "Administrar",
    };

    format!("{} {}.", verb, parts.join(", "))
}

/// Total quantity to dispense, e.g. "14 comprimidos".
///
/// Computed only when dose is numeric, frequency and period are predefined
/// and finite, and the form has a countable unit. A single dose ignores the
/// period. Otherwise returns "".
pub fn compute_quantity(record: &MedicationRecord) -> String {
    let Some(Selection::Predefined(form)) = &record.form else {
        return String::new();
    };
    if !form.is_countable() {
        return String::new();
    }
    let Some(dose) = parse_dose(&record.dose) else {
        return String::new();
    };
    let Some(frequency) = record.frequency.as_ref().and_then(Selection::predefined) else {
        return String::new();
    };

    let administrations = match frequency.per_day() {
        None => 1,
        Some(per_day) => {
            let days = record
                .period
                .as_ref()
                .and_then(Selection::predefined)
                .and_then(|period| period.days());
            match days {
                Some(days) => per_day * days,
                None => return String::new(),
            }
        }
    };

    let mut total = dose * f64::from(administrations);
    if form.is_discrete() {
        total = total.ceil();
    }

    let (singular, plural) = form.unit();
    let unit = if total > 1.0 { plural } else { singular };
    format!("{} {}", format_amount(total), unit)
}

/// Form label as printed, "" when unset.
pub fn form_label(record: &MedicationRecord) -> String {
    match &record.form {
        Some(Selection::Predefined(form)) => form.label().to_string(),
        Some(Selection::Custom(text)) => text.trim().to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Frequency, Period};

    fn record(dose: &str, form: PharmaceuticalForm, frequency: Frequency, period: Period) -> MedicationRecord {
        let mut record = MedicationRecord::new();
        record.dose = dose.into();
        record.form = Some(form.into());
        record.frequency = Some(frequency.into());
        record.period = Some(period.into());
        record
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("Carprofeno", "75mg"), "Carprofeno 75mg");
        assert_eq!(display_name("", "100mg/ml"), "100mg/ml");
        assert_eq!(display_name("Dipirona", "  "), "Dipirona");
        assert_eq!(display_name(" ", ""), "Medicamento sem nome");
        assert_eq!(display_name("  Meloxicam ", " 0,2% "), "Meloxicam 0,2%");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(20.0), "20");
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(7.5), "7,5");
        assert_eq!(format_amount(0.25), "0,25");
        assert_eq!(format_amount(1.999), "2");
        assert_eq!(format_amount(2.0000001), "2");
    }

    #[test]
    fn test_parse_dose() {
        assert_eq!(parse_dose("1"), Some(1.0));
        assert_eq!(parse_dose("0,5"), Some(0.5));
        assert_eq!(parse_dose("2.5 ml"), Some(2.5));
        assert_eq!(parse_dose("1/2"), Some(0.5));
        assert_eq!(parse_dose("1 1/2"), Some(1.5));
        assert_eq!(parse_dose("meio"), None);
        assert_eq!(parse_dose("1/0"), None);
        assert_eq!(parse_dose(""), None);
        assert_eq!(parse_dose("0"), None);
    }

    #[test]
    fn test_instructions_full() {
        let r = record("2", PharmaceuticalForm::Tablet, Frequency::Every8Hours, Period::Days5);
        assert_eq!(
            generate_instructions(&r),
            "Administrar 2 comprimidos, a cada 8 horas, durante 5 dias."
        );
    }

    #[test]
    fn test_instructions_drop_missing_parts() {
        let mut r = MedicationRecord::new();
        assert_eq!(generate_instructions(&r), "");

        r.frequency = Some(Frequency::Every24Hours.into());
        assert_eq!(generate_instructions(&r), "Administrar a cada 24 horas.");

        r.dose = "1/2".into();
        r.form = Some(Selection::Custom("Sachê".into()));
        assert_eq!(generate_instructions(&r), "Administrar 1/2 sachê, a cada 24 horas.");
    }

    #[test]
    fn test_instructions_ointment_uses_apply() {
        let r = record("1", PharmaceuticalForm::Ointment, Frequency::Every12Hours, Period::Days10);
        assert_eq!(
            generate_instructions(&r),
            "Aplicar 1 aplicação, a cada 12 horas, durante 10 dias."
        );
    }

    #[test]
    fn test_quantity_tablets() {
        let r = record("1", PharmaceuticalForm::Tablet, Frequency::Every12Hours, Period::Days7);
        assert_eq!(compute_quantity(&r), "14 comprimidos");
    }

    #[test]
    fn test_quantity_rounds_up_discrete_units() {
        let r = record("1/2", PharmaceuticalForm::Tablet, Frequency::Every8Hours, Period::Days5);
        assert_eq!(compute_quantity(&r), "8 comprimidos");
    }

    #[test]
    fn test_quantity_keeps_fraction_for_liquids() {
        let r = record("0,25", PharmaceuticalForm::OralSolution, Frequency::Every24Hours, Period::Days3);
        assert_eq!(compute_quantity(&r), "0,75 ml");
    }

    #[test]
    fn test_quantity_single_dose_ignores_period() {
        let r = record("1", PharmaceuticalForm::Capsule, Frequency::SingleDose, Period::Continuous);
        assert_eq!(compute_quantity(&r), "1 cápsula");
    }

    #[test]
    fn test_quantity_unknown_cases() {
        let continuous = record("1", PharmaceuticalForm::Tablet, Frequency::Every12Hours, Period::Continuous);
        assert_eq!(compute_quantity(&continuous), "");

        let ointment = record("1", PharmaceuticalForm::Ointment, Frequency::Every12Hours, Period::Days7);
        assert_eq!(compute_quantity(&ointment), "");

        let mut custom = record("1", PharmaceuticalForm::Tablet, Frequency::Every12Hours, Period::Days7);
        custom.frequency = Some(Selection::Custom("a cada 36 horas".into()));
        assert_eq!(compute_quantity(&custom), "");

        let text_dose = record("meio", PharmaceuticalForm::Tablet, Frequency::Every12Hours, Period::Days7);
        assert_eq!(compute_quantity(&text_dose), "");
    }
}
