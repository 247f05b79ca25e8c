//! Culture-invariant coercions from [`Value`] to concrete types.
//!
//! Numbers parse with `.` as the decimal separator, booleans accept only
//! `true`/`false` (ASCII case-insensitive), and date-times accept ISO 8601
//! forms with or without a time component. Null and missing values never
//! coerce.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use uuid::Uuid;

use crate::error::{ModelError, Result};
use crate::value::Value;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

impl Value {
    fn conversion_error(&self, to: &'static str) -> ModelError {
        ModelError::Conversion {
            from: self.type_name(),
            to,
            value: self.to_string(),
        }
    }

    pub fn to_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            Self::Int(value) => Ok(*value != 0),
            Self::Float(value) => Ok(*value != 0.0),
            Self::Decimal(value) => Ok(!value.is_zero()),
            Self::Text(text) => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(self.conversion_error("bool"))
                }
            }
            _ => Err(self.conversion_error("bool")),
        }
    }

    pub fn to_i64(&self) -> Result<i64> {
        self.integral("i64")
    }

    pub fn to_i32(&self) -> Result<i32> {
        let wide = self.integral("i32")?;
        i32::try_from(wide).map_err(|_| self.conversion_error("i32"))
    }

    pub fn to_i16(&self) -> Result<i16> {
        let wide = self.integral("i16")?;
        i16::try_from(wide).map_err(|_| self.conversion_error("i16"))
    }

    /// Shared integer path: floats and decimals round half to even.
    fn integral(&self, to: &'static str) -> Result<i64> {
        match self {
            Self::Int(value) => Ok(*value),
            Self::Bool(value) => Ok(i64::from(*value)),
            Self::Float(value) => {
                let rounded = value.round_ties_even();
                if rounded.is_finite() && rounded >= i64::MIN as f64 && rounded < i64::MAX as f64 {
                    Ok(rounded as i64)
                } else {
                    Err(self.conversion_error(to))
                }
            }
            Self::Decimal(value) => value
                .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointNearestEven)
                .to_i64()
                .ok_or_else(|| self.conversion_error(to)),
            Self::Text(text) => text
                .trim()
                .parse::<i64>()
                .map_err(|_| self.conversion_error(to)),
            _ => Err(self.conversion_error(to)),
        }
    }

    pub fn to_f64(&self) -> Result<f64> {
        match self {
            Self::Float(value) => Ok(*value),
            Self::Int(value) => Ok(*value as f64),
            Self::Bool(value) => Ok(if *value { 1.0 } else { 0.0 }),
            Self::Decimal(value) => value.to_f64().ok_or_else(|| self.conversion_error("f64")),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| self.conversion_error("f64")),
            _ => Err(self.conversion_error("f64")),
        }
    }

    pub fn to_f32(&self) -> Result<f32> {
        let wide = self.to_f64().map_err(|_| self.conversion_error("f32"))?;
        let narrow = wide as f32;
        if wide.is_finite() && !narrow.is_finite() {
            return Err(self.conversion_error("f32"));
        }
        Ok(narrow)
    }

    pub fn to_decimal(&self) -> Result<Decimal> {
        match self {
            Self::Decimal(value) => Ok(*value),
            Self::Int(value) => Ok(Decimal::from(*value)),
            Self::Bool(value) => Ok(Decimal::from(i64::from(*value))),
            Self::Float(value) => {
                Decimal::from_f64(*value).ok_or_else(|| self.conversion_error("decimal"))
            }
            Self::Text(text) => {
                let trimmed = text.trim();
                Decimal::from_str(trimmed)
                    .or_else(|_| Decimal::from_scientific(trimmed))
                    .map_err(|_| self.conversion_error("decimal"))
            }
            _ => Err(self.conversion_error("decimal")),
        }
    }

    pub fn to_datetime(&self) -> Result<NaiveDateTime> {
        match self {
            Self::DateTime(value) => Ok(*value),
            Self::Text(text) => {
                parse_datetime(text.trim()).ok_or_else(|| self.conversion_error("datetime"))
            }
            _ => Err(self.conversion_error("datetime")),
        }
    }

    pub fn to_guid(&self) -> Result<Uuid> {
        match self {
            Self::Guid(value) => Ok(*value),
            Self::Text(text) => {
                Uuid::parse_str(text.trim()).map_err(|_| self.conversion_error("guid"))
            }
            Self::Bytes(bytes) => {
                Uuid::from_slice(bytes).map_err(|_| self.conversion_error("guid"))
            }
            _ => Err(self.conversion_error("guid")),
        }
    }

    pub fn to_char(&self) -> Result<char> {
        if let Self::Text(text) = self {
            let mut chars = text.chars();
            if let (Some(ch), None) = (chars.next(), chars.next()) {
                return Ok(ch);
            }
        }
        Err(self.conversion_error("char"))
    }

    /// Render any non-null value as text.
    pub fn to_text(&self) -> Result<String> {
        match self {
            Self::Null | Self::Missing => Err(self.conversion_error("text")),
            Self::Text(text) => Ok(text.clone()),
            other => Ok(other.to_string()),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::Bytes(bytes) => Ok(bytes.clone()),
            Self::Guid(value) => Ok(value.as_bytes().to_vec()),
            _ => Err(self.conversion_error("bytes")),
        }
    }
}

/// Parse an ISO 8601 date or date-time without a zone offset.
///
/// Offsets are accepted and dropped after converting to UTC.
pub(crate) fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(value) = chrono::DateTime::parse_from_rfc3339(text) {
        return Some(value.naive_utc());
    }
    for format in DATETIME_FORMATS {
        if let Ok(value) = NaiveDateTime::parse_from_str(text, format) {
            return Some(value);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

impl Value {
    /// Infer a typed value from raw token text.
    ///
    /// Empty text becomes [`Value::Missing`]; anything that is not a
    /// boolean, integer, finite float, ISO date-time or GUID stays text.
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return Self::Int(value);
        }
        if let Ok(value) = trimmed.parse::<f64>()
            && value.is_finite()
            && trimmed.bytes().any(|b| b.is_ascii_digit())
        {
            return Self::Float(value);
        }
        if let Some(value) = parse_datetime(trimmed) {
            return Self::DateTime(value);
        }
        if trimmed.len() == 36
            && let Ok(value) = Uuid::parse_str(trimmed)
        {
            return Self::Guid(value);
        }
        Self::Text(text.to_string())
    }
}
