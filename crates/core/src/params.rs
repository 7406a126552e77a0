//! Typed lookups into a JSON params object.
//!
//! Engine tunables arrive as a loose `serde_json::Value`. Every helper here
//! falls back to the supplied default when the key is missing or has the
//! wrong type, so a partially specified config is always usable.

use serde_json::Value;

/// Reads `params[name]` as `f64`. Integers are widened.
///
/// Non-finite values cannot appear in JSON, so the result is always finite
/// when `default` is.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Reads `params[name]` as `f64` and clamps it into `[min, max]`.
pub fn param_f64_in(params: &Value, name: &str, default: f64, min: f64, max: f64) -> f64 {
    param_f64(params, name, default).clamp(min, max)
}

/// Reads `params[name]` as a non-negative integer.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// Reads a boolean param, or `default` when missing or not a bool.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// Reads a string param, or `default` when missing or not a string.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -- param_f64 --

    #[test]
    fn param_f64_reads_float_and_integer() {
        let params = json!({"radius": 250.5, "count": 300});
        assert_eq!(param_f64(&params, "radius", 0.0), 250.5);
        assert_eq!(param_f64(&params, "count", 0.0), 300.0);
    }

    #[test]
    fn param_f64_falls_back_on_missing_or_wrong_type() {
        let params = json!({"radius": "wide", "damping": null});
        assert_eq!(param_f64(&params, "radius", 150.0), 150.0);
        assert_eq!(param_f64(&params, "damping", 0.94), 0.94);
        assert_eq!(param_f64(&params, "absent", 6.0), 6.0);
    }

    #[test]
    fn param_f64_on_non_object_returns_default() {
        assert_eq!(param_f64(&json!([1, 2, 3]), "radius", 7.0), 7.0);
    }

    #[test]
    fn param_f64_in_clamps_both_ends() {
        let params = json!({"low": -3.0, "high": 9.0, "mid": 0.4});
        assert_eq!(param_f64_in(&params, "low", 0.5, 0.0, 1.0), 0.0);
        assert_eq!(param_f64_in(&params, "high", 0.5, 0.0, 1.0), 1.0);
        assert_eq!(param_f64_in(&params, "mid", 0.5, 0.0, 1.0), 0.4);
        assert_eq!(param_f64_in(&params, "absent", 0.5, 0.0, 1.0), 0.5);
    }

    // -- param_usize --

    #[test]
    fn param_usize_reads_non_negative_integer() {
        assert_eq!(param_usize(&json!({"count": 42}), "count", 0), 42);
    }

    #[test]
    fn param_usize_rejects_float_negative_and_string() {
        let params = json!({"a": 2.5, "b": -1, "c": "many"});
        assert_eq!(param_usize(&params, "a", 9), 9);
        assert_eq!(param_usize(&params, "b", 9), 9);
        assert_eq!(param_usize(&params, "c", 9), 9);
    }

    // -- param_bool / param_string --

    #[test]
    fn param_bool_reads_and_falls_back() {
        let params = json!({"follow_mouse": false, "pulsating": 1});
        assert!(!param_bool(&params, "follow_mouse", true));
        assert!(param_bool(&params, "pulsating", true));
        assert!(!param_bool(&params, "absent", false));
    }

    #[test]
    fn param_string_reads_and_falls_back() {
        let params = json!({"origin": "left", "color": 3});
        assert_eq!(param_string(&params, "origin", "top-center"), "left");
        assert_eq!(param_string(&params, "color", "#ffffff"), "#ffffff");
        assert_eq!(param_string(&json!({"origin": ""}), "origin", "x"), "");
    }
}
