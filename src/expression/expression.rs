use std::fmt::{self, Display};

use serde_json::Value;

use crate::traits::chunk::Chunk;

/// Marker the builder writes for a bound value.
pub const PLACEHOLDER: &str = "?";

#[macro_export]
macro_rules! expr {
    ($fmt:expr $(, $arg:expr)* $(,)?) => {{
        $crate::expression::Expression::new(
            $fmt.to_string(),
            vec![
                $( serde_json::json!($arg), )*
            ]
        )
    }}
}

/// A template together with the values bound to its placeholders, in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    expression: String,
    parameters: Vec<Value>,
}

impl Chunk for Expression {
    fn render_chunk(&self) -> Expression {
        self.clone()
    }
}

impl Expression {
    pub fn new(expression: String, parameters: Vec<Value>) -> Self {
        Self {
            expression,
            parameters,
        }
    }

    pub fn empty() -> Self {
        Self {
            expression: "".to_owned(),
            parameters: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.expression.is_empty() && self.parameters.is_empty()
    }

    pub fn sql(&self) -> &str {
        &self.expression
    }

    pub fn params(&self) -> &Vec<Value> {
        &self.parameters
    }

    /// Same expression wrapped in a single pair of parentheses.
    pub fn bracketed(self) -> Self {
        Self {
            expression: format!("({})", self.expression),
            parameters: self.parameters,
        }
    }

    pub fn from_vec(vec: Vec<Expression>, delimiter: &str) -> Self {
        let expression = vec
            .iter()
            .map(|pre| pre.expression.clone())
            .collect::<Vec<String>>()
            .join(delimiter);

        let parameters = vec
            .into_iter()
            .flat_map(|pre| pre.parameters)
            .collect::<Vec<Value>>();

        Self {
            expression,
            parameters,
        }
    }

    pub fn split(self) -> (String, Vec<Value>) {
        (self.expression, self.parameters)
    }

    /// Wire form: the template followed by every bound value.
    pub fn into_vec(self) -> Vec<Value> {
        let mut result = Vec::with_capacity(self.parameters.len() + 1);
        result.push(Value::String(self.expression));
        result.extend(self.parameters);
        result
    }

    /// Number of placeholder markers in the template.
    pub fn placeholder_count(&self) -> usize {
        self.expression.matches(PLACEHOLDER).count()
    }

    /// Template with placeholders substituted by their JSON rendering.
    ///
    /// Only meant for logs and debugging, values are not escaped.
    pub fn preview(&self) -> String {
        let mut preview = String::with_capacity(self.expression.len());
        let mut params = self.parameters.iter();
        let mut rest = self.expression.as_str();

        while let Some(index) = rest.find(PLACEHOLDER) {
            preview.push_str(&rest[..index]);
            match params.next() {
                Some(param) => preview.push_str(&param.to_string()),
                None => preview.push_str(PLACEHOLDER),
            }
            rest = &rest[index + PLACEHOLDER.len()..];
        }
        preview.push_str(rest);
        preview
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.preview())
    }
}
