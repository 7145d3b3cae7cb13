//! String length and pattern evaluation. Non-strings pass.

use serde_json::Value;

use super::{fail, SizeBound};
use crate::error::ValidationError;
use crate::path::JsonPath;
use crate::pattern::EcmaRegex;

pub(super) fn check_length(
    path: &str,
    bound: SizeBound,
    limit: usize,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::String(s) = value else {
        return Ok(());
    };
    // Length counts Unicode scalar values, not bytes.
    let len = s.chars().count();
    match bound {
        SizeBound::Min if len < limit => fail(
            path,
            "minLength",
            location,
            format!("Shorter than minLength {}", limit),
        ),
        SizeBound::Max if len > limit => fail(
            path,
            "maxLength",
            location,
            format!("Longer than maxLength {}", limit),
        ),
        _ => Ok(()),
    }
}

pub(super) fn check_pattern(
    path: &str,
    regex: &EcmaRegex,
    value: &Value,
    location: &JsonPath,
) -> Result<(), ValidationError> {
    let Value::String(s) = value else {
        return Ok(());
    };
    match regex.is_match(s) {
        Ok(true) => Ok(()),
        Ok(false) => fail(
            path,
            "pattern",
            location,
            format!("Does not match pattern '{}'", regex.as_str()),
        ),
        Err(e) => fail(
            path,
            "pattern",
            location,
            format!("Could not evaluate pattern '{}': {}", regex.as_str(), e),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::CheckNode;
    use serde_json::json;

    fn length(bound: SizeBound, limit: usize) -> CheckNode {
        CheckNode::Length {
            path: "root/length".to_string(),
            bound,
            limit,
        }
    }

    #[test]
    fn test_min_length() {
        let node = length(SizeBound::Min, 2);
        assert!(node.evaluate(&json!("ab"), &JsonPath::root()).is_ok());
        let error = node.evaluate(&json!("a"), &JsonPath::root()).unwrap_err();
        assert_eq!(error.reason, "Shorter than minLength 2");
        assert_eq!(error.keyword, "minLength");
    }

    #[test]
    fn test_max_length() {
        let node = length(SizeBound::Max, 4);
        assert!(node.evaluate(&json!(""), &JsonPath::root()).is_ok());
        assert!(node.evaluate(&json!("abcd"), &JsonPath::root()).is_ok());
        let error = node.evaluate(&json!("abcde"), &JsonPath::root()).unwrap_err();
        assert_eq!(error.reason, "Longer than maxLength 4");
    }

    #[test]
    fn test_length_counts_characters() {
        // "日本語" is 3 characters but 9 bytes
        let node = length(SizeBound::Max, 3);
        assert!(node.evaluate(&json!("日本語"), &JsonPath::root()).is_ok());

        let node = length(SizeBound::Min, 3);
        assert!(node.evaluate(&json!("🎉🎊"), &JsonPath::root()).is_err());
    }

    #[test]
    fn test_length_ignores_non_strings() {
        let node = length(SizeBound::Min, 10);
        assert!(node.evaluate(&json!(42), &JsonPath::root()).is_ok());
        assert!(node.evaluate(&json!(["a"]), &JsonPath::root()).is_ok());
    }

    #[test]
    fn test_pattern() {
        let node = CheckNode::Pattern {
            path: "root/pattern".to_string(),
            regex: EcmaRegex::new("^a.*z$").unwrap(),
        };
        assert!(node.evaluate(&json!("abz"), &JsonPath::root()).is_ok());
        assert!(node.evaluate(&json!(7), &JsonPath::root()).is_ok());

        let error = node.evaluate(&json!("xyz"), &JsonPath::root()).unwrap_err();
        assert_eq!(error.reason, "Does not match pattern '^a.*z$'");
        assert_eq!(error.path, "root/pattern");
    }

    #[test]
    fn test_pattern_step_limit_rejects() {
        let node = CheckNode::Pattern {
            path: "root/pattern".to_string(),
            regex: EcmaRegex::with_limits(r"^(a|a)+\1$", 1 << 20, 100).unwrap(),
        };
        assert!(node.evaluate(&json!("aa"), &JsonPath::root()).is_ok());

        let text = format!("{}b", "a".repeat(40));
        let error = node.evaluate(&json!(text), &JsonPath::root()).unwrap_err();
        assert_eq!(error.keyword, "pattern");
        assert!(error.reason.starts_with("Could not evaluate pattern"));
    }
}
