//! Typed per-operation parameters.
//!
//! Parameters arrive as multipart text fields. A field that is absent takes
//! the documented default; a field that is present must hold a number, and
//! an empty value is rejected rather than silently defaulted. Values are not
//! range checked: out-of-bounds geometry or times surface as engine failures.

use std::collections::HashMap;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

/// Default trim start (seconds)
pub const DEFAULT_TRIM_START_SECS: f64 = 0.0;
/// Default trim length (seconds)
pub const DEFAULT_TRIM_DURATION_SECS: f64 = 5.0;

/// Default crop geometry (portrait 1080x1920 at the origin)
pub const DEFAULT_CROP_WIDTH: i64 = 1080;
pub const DEFAULT_CROP_HEIGHT: i64 = 1920;
pub const DEFAULT_CROP_X: i64 = 0;
pub const DEFAULT_CROP_Y: i64 = 0;

/// Parameters for a trim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrimParams {
    /// Seek position in seconds
    pub start_time: f64,
    /// Length of the cut in seconds
    pub duration: f64,
}

impl Default for TrimParams {
    fn default() -> Self {
        Self {
            start_time: DEFAULT_TRIM_START_SECS,
            duration: DEFAULT_TRIM_DURATION_SECS,
        }
    }
}

impl TrimParams {
    pub fn from_fields(fields: &HashMap<String, String>) -> ValidationResult<Self> {
        Ok(Self {
            start_time: parse_decimal(fields, "startTime", DEFAULT_TRIM_START_SECS)?,
            duration: parse_decimal(fields, "duration", DEFAULT_TRIM_DURATION_SECS)?,
        })
    }
}

/// Parameters for a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CropParams {
    pub w: i64,
    pub h: i64,
    pub x: i64,
    pub y: i64,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            w: DEFAULT_CROP_WIDTH,
            h: DEFAULT_CROP_HEIGHT,
            x: DEFAULT_CROP_X,
            y: DEFAULT_CROP_Y,
        }
    }
}

impl CropParams {
    pub fn from_fields(fields: &HashMap<String, String>) -> ValidationResult<Self> {
        Ok(Self {
            w: parse_field(fields, "w", DEFAULT_CROP_WIDTH)?,
            h: parse_field(fields, "h", DEFAULT_CROP_HEIGHT)?,
            x: parse_field(fields, "x", DEFAULT_CROP_X)?,
            y: parse_field(fields, "y", DEFAULT_CROP_Y)?,
        })
    }
}

fn parse_field<T: FromStr>(
    fields: &HashMap<String, String>,
    name: &str,
    default: T,
) -> ValidationResult<T> {
    let Some(raw) = fields.get(name) else {
        return Ok(default);
    };

    let value = raw.trim();
    if value.is_empty() {
        return Err(ValidationError::EmptyParameter(name.to_string()));
    }

    value.parse().map_err(|_| ValidationError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// `f64::from_str` accepts "inf" and "NaN"; neither is a usable time.
fn parse_decimal(
    fields: &HashMap<String, String>,
    name: &str,
    default: f64,
) -> ValidationResult<f64> {
    let value: f64 = parse_field(fields, name, default)?;
    if !value.is_finite() {
        return Err(ValidationError::InvalidParameter {
            name: name.to_string(),
            value: fields.get(name).cloned().unwrap_or_default(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_trim_defaults_when_absent() {
        let params = TrimParams::from_fields(&HashMap::new()).unwrap();
        assert_eq!(params, TrimParams::default());
        assert_eq!(params.start_time, 0.0);
        assert_eq!(params.duration, 5.0);
    }

    #[test]
    fn test_trim_parses_decimals() {
        let params =
            TrimParams::from_fields(&fields(&[("startTime", "1.5"), ("duration", " 12 ")])).unwrap();
        assert_eq!(params.start_time, 1.5);
        assert_eq!(params.duration, 12.0);
    }

    #[test]
    fn test_empty_field_is_rejected() {
        let err = TrimParams::from_fields(&fields(&[("duration", "")])).unwrap_err();
        assert_eq!(err, ValidationError::EmptyParameter("duration".to_string()));
    }

    #[test]
    fn test_non_numeric_is_rejected() {
        let err = CropParams::from_fields(&fields(&[("w", "iw/2")])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidParameter { ref name, .. } if name == "w"));

        let err = TrimParams::from_fields(&fields(&[("startTime", "inf")])).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidParameter { .. }));
    }

    #[test]
    fn test_crop_partial_fields() {
        let params = CropParams::from_fields(&fields(&[("x", "40"), ("y", "-10")])).unwrap();
        assert_eq!(
            params,
            CropParams {
                w: 1080,
                h: 1920,
                x: 40,
                y: -10
            }
        );
    }
}
