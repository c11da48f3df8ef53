use crate::entities::backtest_result::BacktestResult;
use crate::errors::LoadError;
use crate::services::timestamps::parse_timestamp;

/// Decodes a response body and runs the shape check on it.
///
/// serde enforces presence and primitive types; `validate_result` covers what
/// the type system cannot.
pub fn decode_result(body: &str) -> Result<BacktestResult, LoadError> {
    let result: BacktestResult =
        serde_json::from_str(body).map_err(|err| LoadError::Parse(err.to_string()))?;
    validate_result(&result)?;
    Ok(result)
}

pub fn validate_result(result: &BacktestResult) -> Result<(), LoadError> {
    for (name, value) in result.metrics.fields() {
        if !value.is_finite() {
            return Err(LoadError::Parse(format!(
                "metrics.{name} is not finite: {value}"
            )));
        }
    }

    let mut previous = None;
    for (idx, point) in result.equity_curve.iter().enumerate() {
        if !point.equity.is_finite() {
            return Err(LoadError::Parse(format!(
                "equity_curve[{idx}].equity is not finite: {}",
                point.equity
            )));
        }
        let parsed = parse_timestamp(&point.datetime).ok_or_else(|| {
            LoadError::Parse(format!(
                "equity_curve[{idx}].datetime is not ISO-8601: {:?}",
                point.datetime
            ))
        })?;
        let key = parsed.ordering_key();
        if let Some(prev) = previous {
            if key < prev {
                return Err(LoadError::Parse(format!(
                    "equity_curve[{idx}].datetime {} precedes the previous point",
                    point.datetime
                )));
            }
        }
        previous = Some(key);
    }

    Ok(())
}
