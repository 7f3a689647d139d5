//! Raw attribute values carried by snapshot records.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One raw attribute value.
///
/// Values compare with a total order so that sorting a column never depends
/// on `NaN` handling: integers and floats compare numerically (floats via
/// IEEE-754 total ordering), and every numeric value orders before any text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value, if it has one.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    /// Text view of the value, if it is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Float(a), Self::Float(b)) => cmp_floats(*a, *b),
            (Self::Int(a), Self::Float(b)) => cmp_int_float(*a, *b),
            (Self::Float(a), Self::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Text(_), _) => Ordering::Greater,
            (_, Self::Text(_)) => Ordering::Less,
        }
    }
}

/// -1 below every number, 1 above every number, 0 for numbers.
fn nan_rank(v: f64) -> i8 {
    match (v.is_nan(), v.is_sign_negative()) {
        (false, _) => 0,
        (true, true) => -1,
        (true, false) => 1,
    }
}

/// Numeric order with `-0.0 == 0.0`; NaN sits at the end matching its sign.
fn cmp_floats(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| nan_rank(a).cmp(&nan_rank(b)))
}

/// Exact comparison of an integer against a float, without rounding the
/// integer through `f64`.
#[allow(clippy::cast_possible_truncation)]
fn cmp_int_float(i: i64, f: f64) -> Ordering {
    // 2^63 as f64; every float in [-2^63, 2^63) truncates into i64 exactly.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if f.is_nan() {
        return 0.cmp(&nan_rank(f));
    }
    if f >= BOUND {
        return Ordering::Less;
    }
    if f < -BOUND {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    match i.cmp(&(whole as i64)) {
        Ordering::Equal if f > whole => Ordering::Less,
        Ordering::Equal if f < whole => Ordering::Greater,
        ord => ord,
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_and_floats_compare_numerically() {
        assert!(Value::Int(2) > Value::Float(1.5));
        assert!(Value::Float(2.5) > Value::Int(2));
        assert_eq!(Value::Int(3), Value::Float(3.0));
    }

    #[test]
    fn numbers_order_before_text() {
        assert!(Value::Text("a".into()) > Value::Int(i64::MAX));
        assert!(Value::Float(f64::INFINITY) < Value::Text(String::new()));
    }

    #[test]
    fn nan_has_a_stable_position() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan.cmp(&nan), Ordering::Equal);
        assert!(nan > Value::Float(f64::INFINITY));
    }

    #[test]
    fn large_integers_compare_exactly_against_floats() {
        let two_53 = 9_007_199_254_740_992_i64;
        let float = Value::Float(two_53 as f64);
        assert_eq!(Value::Int(two_53), float);
        assert!(Value::Int(two_53 + 1) > float);
        assert!(float < Value::Int(two_53 + 1));
        assert!(Value::Int(i64::MAX) < Value::Float(9.3e18));
        assert!(Value::Int(i64::MIN) > Value::Float(-9.3e18));
        assert!(Value::Int(-2) > Value::Float(-2.5));
        assert!(Value::Int(2) < Value::Float(2.5));
    }

    #[test]
    fn signed_zeros_are_equal_for_both_variants() {
        assert_eq!(Value::Float(-0.0), Value::Float(0.0));
        assert_eq!(Value::Int(0), Value::Float(-0.0));
        assert!(Value::Int(0) < Value::Float(f64::NAN));
        assert!(Value::Int(0) > Value::Float(-f64::NAN));
    }

    #[test]
    fn deserializes_untagged_json() {
        let v: Vec<Value> = serde_json::from_str(r#"[5, 2.5, "select 1"]"#).unwrap();
        assert!(matches!(v[0], Value::Int(5)));
        assert!(matches!(v[1], Value::Float(f) if (f - 2.5).abs() < f64::EPSILON));
        assert_eq!(v[2].as_text(), Some("select 1"));
    }

    #[test]
    fn display_uses_raw_form() {
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::from("Q42").to_string(), "Q42");
    }
}
