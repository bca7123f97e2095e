//! Typed reads from a JSON tuning object.
//!
//! Numeric and boolean helpers never fail: a missing key or a value of the
//! wrong type yields the default. Name-valued options go through
//! [`param_choice`], which rejects strings outside the accepted set so a typo
//! in a palette or boundary name is reported instead of silently ignored.

use serde_json::Value;

use crate::error::EngineError;

/// `params[name]` as `f64`, or `default`. Integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params
        .get(name)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

/// Like [`param_f64`], then clamped to `[min, max]`.
pub fn param_f64_within(params: &Value, name: &str, default: f64, min: f64, max: f64) -> f64 {
    param_f64(params, name, default).clamp(min, max)
}

/// `params[name]` as a non-negative integer, or `default`.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .map(|v| usize::try_from(v).unwrap_or(usize::MAX))
        .unwrap_or(default)
}

/// `params[name]` as `bool`, or `default`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// `params[name]` as a string borrowed from the JSON, if present.
pub fn param_str<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(Value::as_str)
}

/// `params[name]` if it is one of `choices`, `default` if absent.
///
/// A string outside `choices` is an [`EngineError::UnknownOption`].
pub fn param_choice<'a>(
    params: &'a Value,
    name: &str,
    choices: &[&str],
    default: &'a str,
) -> Result<&'a str, EngineError> {
    match param_str(params, name) {
        None => Ok(default),
        Some(v) if choices.contains(&v) => Ok(v),
        Some(v) => Err(EngineError::UnknownOption {
            name: name.to_string(),
            value: v.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn f64_reads_floats_and_integers() {
        let p = json!({"speed": 1.5, "radius": 100});
        assert_eq!(param_f64(&p, "speed", 0.0), 1.5);
        assert_eq!(param_f64(&p, "radius", 0.0), 100.0);
    }

    #[test]
    fn f64_falls_back_on_missing_or_wrong_type() {
        let p = json!({"speed": "fast", "gone": null});
        assert_eq!(param_f64(&p, "speed", 2.0), 2.0);
        assert_eq!(param_f64(&p, "gone", 3.0), 3.0);
        assert_eq!(param_f64(&p, "absent", 4.0), 4.0);
        assert_eq!(param_f64(&json!([1, 2]), "speed", 5.0), 5.0);
    }

    #[test]
    fn f64_within_clamps() {
        let p = json!({"speed": 50.0, "slow": -1.0});
        assert_eq!(param_f64_within(&p, "speed", 1.0, 0.0, 10.0), 10.0);
        assert_eq!(param_f64_within(&p, "slow", 1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn usize_rejects_negative_and_fractional() {
        let p = json!({"count": 120, "neg": -3, "frac": 2.5});
        assert_eq!(param_usize(&p, "count", 0), 120);
        assert_eq!(param_usize(&p, "neg", 7), 7);
        assert_eq!(param_usize(&p, "frac", 9), 9);
    }

    #[test]
    fn bool_reads_only_booleans() {
        let p = json!({"connections": false, "glow": 1});
        assert!(!param_bool(&p, "connections", true));
        assert!(param_bool(&p, "glow", true));
    }

    #[test]
    fn choice_accepts_listed_values() {
        let p = json!({"boundary": "clamp"});
        assert_eq!(
            param_choice(&p, "boundary", &["wrap", "clamp"], "wrap").unwrap(),
            "clamp"
        );
        assert_eq!(
            param_choice(&json!({}), "boundary", &["wrap", "clamp"], "wrap").unwrap(),
            "wrap"
        );
    }

    #[test]
    fn choice_rejects_unlisted_values() {
        let p = json!({"boundary": "bounce"});
        let err = param_choice(&p, "boundary", &["wrap", "clamp"], "wrap").unwrap_err();
        assert!(matches!(err, EngineError::UnknownOption { .. }));
    }
}
