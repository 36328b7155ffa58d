// Validation utilities
// Author: Gabriel Demetrios Lafis

use serde_json::Value as JsonValue;

/// Validate that a config value is a boolean
pub fn validate_bool(value: &JsonValue, name: &str) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| format!("'{}' must be a boolean, got {}", name, value))
}

/// Validate that a config value is a non-negative integer
pub fn validate_count(value: &JsonValue, name: &str) -> Result<usize, String> {
    // Rejects floats such as 0.0 as well as negative integers
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| format!("'{}' must be a non-negative integer, got {}", name, value))
}

/// Validate that a row index is in range
pub fn validate_index(index: usize, len: usize, name: &str) -> Result<(), String> {
    if index >= len {
        Err(format!(
            "'{}' {} is out of range for {} rows",
            name, index, len
        ))
    } else {
        Ok(())
    }
}

/// Validate that a sequence has the expected length
pub fn validate_len(actual: usize, expected: usize, name: &str) -> Result<(), String> {
    if actual != expected {
        Err(format!(
            "'{}' has {} values, expected {}",
            name, actual, expected
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_bool() {
        assert_eq!(validate_bool(&json!(false), "flag"), Ok(false));
        assert!(validate_bool(&json!(0), "flag").is_err());
        assert!(validate_bool(&json!("true"), "flag").is_err());
    }

    #[test]
    fn test_validate_count() {
        assert_eq!(validate_count(&json!(42), "rows"), Ok(42));
        assert!(validate_count(&json!(0.0), "rows").is_err());
        assert!(validate_count(&json!(-1), "rows").is_err());
    }

    #[test]
    fn test_validate_index_and_len() {
        assert!(validate_index(2, 3, "row").is_ok());
        assert!(validate_index(3, 3, "row").is_err());
        assert!(validate_len(2, 2, "values").is_ok());
        assert_eq!(
            validate_len(1, 2, "values"),
            Err("'values' has 1 values, expected 2".to_string())
        );
    }
}
