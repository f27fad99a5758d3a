use std::fmt::{self, Display};
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{ConditionError, Result};

/// Whether compiled fragments get wrapped in parentheses.
///
/// Brackets are never placed around a lone fragment, whatever the mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub enum BracketMode {
    /// Bracket every fragment.
    Always,
    /// Never bracket.
    Never,
    /// Bracket fragments recorded as compound when they were appended.
    #[default]
    Auto,
}

impl BracketMode {
    /// Resolves the mode for one fragment out of `total`.
    pub fn applies_to(self, compound: bool, total: usize) -> bool {
        if total < 2 {
            return false;
        }
        match self {
            BracketMode::Always => true,
            BracketMode::Never => false,
            BracketMode::Auto => compound,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BracketMode::Always => "always",
            BracketMode::Never => "never",
            BracketMode::Auto => "auto",
        }
    }
}

impl Display for BracketMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<bool> for BracketMode {
    fn from(value: bool) -> Self {
        if value {
            BracketMode::Always
        } else {
            BracketMode::Never
        }
    }
}

impl FromStr for BracketMode {
    type Err = ConditionError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "always" => Ok(BracketMode::Always),
            "never" => Ok(BracketMode::Never),
            "auto" => Ok(BracketMode::Auto),
            other => Err(ConditionError::invalid_bracket_mode(format!("{:?}", other))),
        }
    }
}

impl TryFrom<&str> for BracketMode {
    type Error = ConditionError;

    fn try_from(value: &str) -> Result<Self> {
        value.parse()
    }
}

impl TryFrom<Value> for BracketMode {
    type Error = ConditionError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Bool(b) => Ok(b.into()),
            Value::String(s) => s.parse(),
            other => Err(ConditionError::invalid_bracket_mode(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_lone_fragment_never_bracketed() {
        for mode in [BracketMode::Always, BracketMode::Never, BracketMode::Auto] {
            assert!(!mode.applies_to(true, 1));
        }
    }

    #[test]
    fn test_applies_to() {
        assert!(BracketMode::Always.applies_to(false, 2));
        assert!(!BracketMode::Never.applies_to(true, 2));
        assert!(BracketMode::Auto.applies_to(true, 3));
        assert!(!BracketMode::Auto.applies_to(false, 3));
    }

    #[test]
    fn test_parse() {
        assert_eq!("auto".parse::<BracketMode>().unwrap(), BracketMode::Auto);
        assert_eq!(BracketMode::try_from(json!(true)).unwrap(), BracketMode::Always);
        assert_eq!(BracketMode::try_from(json!(false)).unwrap(), BracketMode::Never);
        assert_eq!(BracketMode::try_from("never").unwrap(), BracketMode::Never);

        let err = BracketMode::try_from(Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "Unknown bracket mode null");

        let err = "something_invalid".parse::<BracketMode>().unwrap_err();
        assert_eq!(err.to_string(), r#"Unknown bracket mode "something_invalid""#);
    }

    #[test]
    fn test_boolean_strings_rejected() {
        for input in ["true", "false"] {
            assert!(BracketMode::try_from(input).unwrap_err().is_invalid_bracket_mode());
            assert!(BracketMode::try_from(json!(input)).is_err());
        }
    }

    #[test]
    fn test_default_is_auto() {
        assert_eq!(BracketMode::default(), BracketMode::Auto);
        assert_eq!(BracketMode::Auto.to_string(), "auto");
    }
}
