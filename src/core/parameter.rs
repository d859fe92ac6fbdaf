//! Parameter system for block configuration
//!
//! This module defines the literal values a placed block carries, the schema
//! each block kind declares for them, and the lenient numeric reading the
//! interpreter applies. Malformed input never produces an error: it degrades
//! to the caller-supplied default.

use serde::{Deserialize, Serialize};

/// Parameter schema entry of a block definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name (e.g. "steps", "sec")
    pub name: String,
    /// Value a freshly dropped block starts with
    pub default_value: ParameterValue,
    /// How the host should render the input field
    pub input_kind: InputKind,
    /// Placeholder text for an empty input
    pub placeholder: String,
}

impl ParameterSpec {
    /// Numeric parameter with a default
    pub fn number(name: &str, default: i64) -> Self {
        Self {
            name: name.to_string(),
            default_value: ParameterValue::Integer(default),
            input_kind: InputKind::Number,
            placeholder: name.to_string(),
        }
    }

    /// Free-text parameter with a default
    pub fn text(name: &str, default: &str) -> Self {
        Self {
            name: name.to_string(),
            default_value: ParameterValue::String(default.to_string()),
            input_kind: InputKind::Text,
            placeholder: name.to_string(),
        }
    }

    /// Override the placeholder text
    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }
}

/// Input widget kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Text input field
    Text,
    /// Numeric input field
    Number,
}

/// Literal parameter value
///
/// Hosts hand back whatever the user typed, so numbers frequently arrive as
/// strings. Reading a value as a number never fails; see [`ParameterValue::as_integer_or`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Integer number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// String value
    String(String),
}

impl ParameterValue {
    /// Try to read as an integer
    ///
    /// Strings are read with the leading-integer rule: optional whitespace,
    /// optional sign, then as many digits as are present. `"12abc"` is 12,
    /// `"3.7"` is 3, `"abc"` and `""` are `None`. Floats truncate toward zero.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParameterValue::Integer(i) => Some(*i),
            ParameterValue::Number(n) if n.is_finite() => Some(n.trunc() as i64),
            ParameterValue::Number(_) => None,
            ParameterValue::String(s) => parse_leading_integer(s),
        }
    }

    /// Read as an integer, falling back to `default` for missing or malformed input
    pub fn as_integer_or(&self, default: i64) -> i64 {
        self.as_integer().unwrap_or(default)
    }

    /// Render the value as display text
    pub fn to_text(&self) -> String {
        match self {
            ParameterValue::Integer(i) => i.to_string(),
            ParameterValue::Number(n) => n.to_string(),
            ParameterValue::String(s) => s.clone(),
        }
    }

    /// Whether the value is an empty string
    pub fn is_blank(&self) -> bool {
        matches!(self, ParameterValue::String(s) if s.is_empty())
    }
}

impl From<String> for ParameterValue {
    fn from(s: String) -> Self {
        ParameterValue::String(s)
    }
}

impl From<&str> for ParameterValue {
    fn from(s: &str) -> Self {
        ParameterValue::String(s.to_string())
    }
}

impl From<f64> for ParameterValue {
    fn from(n: f64) -> Self {
        ParameterValue::Number(n)
    }
}

impl From<i64> for ParameterValue {
    fn from(i: i64) -> Self {
        ParameterValue::Integer(i)
    }
}

impl From<i32> for ParameterValue {
    fn from(i: i32) -> Self {
        ParameterValue::Integer(i as i64)
    }
}

/// Integer parameter at `index`, or `default` when absent or malformed
pub fn integer_at(params: &[ParameterValue], index: usize, default: i64) -> i64 {
    params
        .get(index)
        .map_or(default, |value| value.as_integer_or(default))
}

/// Text parameter at `index`, or `default` when absent or blank
pub fn text_at(params: &[ParameterValue], index: usize, default: &str) -> String {
    match params.get(index) {
        Some(value) if !value.is_blank() => value.to_text(),
        _ => default.to_string(),
    }
}

fn parse_leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    // Saturate on overflow rather than rejecting very long digit runs.
    let magnitude = rest[..digits_len]
        .bytes()
        .fold(0i128, |acc, d| acc.saturating_mul(10).saturating_add(i128::from(d - b'0')));
    let value = if negative { -magnitude } else { magnitude };

    Some(value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
}
