use crate::{
    error::{coefficient_error, AppError},
    keys::{CoefficientKey, KEY_COUNT},
    types::{CoefficientVector, CtrPrediction},
};

/// Turns resolved coefficient strings into a numeric vector, position by position.
///
/// An absent value means the request carried a categorical value the model was
/// never trained on, so it is reported as `InvalidCoefficient` like a bad number.
pub fn convert_coefficients(
    keys: &[CoefficientKey; KEY_COUNT],
    values: Vec<Option<String>>,
) -> Result<CoefficientVector, AppError> {
    if values.len() != KEY_COUNT {
        return Err(AppError::Unexpected(format!(
            "expected {} resolved coefficients, got {}",
            KEY_COUNT,
            values.len()
        )));
    }

    let mut coefficients = [0.0; KEY_COUNT];
    for ((slot, key), value) in coefficients.iter_mut().zip(keys).zip(values) {
        let raw = value.ok_or_else(|| coefficient_error(&format!("no coefficient for {}", key)))?;
        *slot = parse_coefficient(key, &raw)?;
    }

    Ok(CoefficientVector(coefficients))
}

fn parse_coefficient(key: &CoefficientKey, raw: &str) -> Result<f64, AppError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| coefficient_error(&format!("{} is not numeric: {:?}", key, raw)))?;

    if !value.is_finite() {
        return Err(coefficient_error(&format!("{} is not finite: {}", key, raw)));
    }
    Ok(value)
}

/// Logistic regression over an additive log-odds model.
pub fn calculate_ctr(coefficients: &CoefficientVector) -> CtrPrediction {
    CtrPrediction::new(sigmoid(coefficients.log_odds()))
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
