use serde::Deserialize;

use crate::bracket::BracketMode;

/// Construction options for a [`ConditionBuilder`](crate::ConditionBuilder).
///
/// Deserializes from configuration such as `{"brackets": "auto"}`; unknown
/// modes are rejected with the bracket mode error message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderOptions {
    #[serde(alias = "brackets")]
    pub bracket_mode: BracketMode,
}

impl BuilderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bracket_mode(mut self, bracket_mode: BracketMode) -> Self {
        self.bracket_mode = bracket_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_defaults() {
        let options: BuilderOptions = serde_json::from_value(json!({})).unwrap();
        assert_eq!(options, BuilderOptions::new());
        assert_eq!(options.bracket_mode, BracketMode::Auto);
    }

    #[test]
    fn test_deserialize() {
        let options: BuilderOptions =
            serde_json::from_value(json!({"bracket_mode": "never"})).unwrap();
        assert_eq!(options.bracket_mode, BracketMode::Never);

        let options: BuilderOptions = serde_json::from_value(json!({"brackets": true})).unwrap();
        assert_eq!(options, BuilderOptions::new().bracket_mode(BracketMode::Always));
    }

    #[test]
    fn test_deserialize_invalid_mode() {
        let err = serde_json::from_value::<BuilderOptions>(json!({"brackets": "sometimes"}))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown bracket mode"));
    }
}
