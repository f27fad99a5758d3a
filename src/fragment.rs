//! Fragment shapes accepted by [`ConditionBuilder::append`] and the records it stores.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::condition::ConditionBuilder;
use crate::error::{ConditionError, Result};
use crate::expression::expression::PLACEHOLDER;
use crate::traits::chunk::Chunk;

/// Positional fragment: a template followed by the values for its placeholders.
///
/// ```rust
///   builder.append(cond!("age >= ? AND age <= ?", 18, 35))?;
///   builder.append(cond!("created_at IS NULL"))?;
/// ```
#[macro_export]
macro_rules! cond {
    ($template:expr $(, $arg:expr)* $(,)?) => {{
        $crate::fragment::FragmentValue::positional(
            $template,
            vec![
                $( serde_json::json!($arg), )*
            ]
        )
    }}
}

/// One appendable value.
#[derive(Debug, Clone)]
pub enum FragmentValue {
    /// Contributes nothing.
    Empty,
    /// Raw template without values, appended verbatim.
    Text(String),
    /// Template plus the values of its placeholders. Compound when more than
    /// one value is supplied.
    Positional {
        template: String,
        arguments: Vec<Value>,
    },
    /// One `key = ?` (or `key IS NULL` for a null value) fragment per pair.
    Mapping(IndexMap<String, Value>),
    /// Another builder, appended in its compiled form.
    Nested(ConditionBuilder),
}

/// Strings consisting of whitespace only count as empty.
pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

impl FragmentValue {
    pub fn positional(template: impl Into<String>, arguments: Vec<Value>) -> Self {
        FragmentValue::Positional {
            template: template.into(),
            arguments,
        }
    }

    /// True when appending this value would leave a builder unchanged.
    ///
    /// A positional value with a blank template is empty even when it carries
    /// arguments; those are dropped along with it.
    pub fn is_empty(&self) -> bool {
        match self {
            FragmentValue::Empty => true,
            FragmentValue::Text(text) => is_blank(text),
            FragmentValue::Positional { template, .. } => is_blank(template),
            FragmentValue::Mapping(pairs) => pairs.is_empty(),
            FragmentValue::Nested(builder) => builder.is_empty(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            FragmentValue::Empty => "empty",
            FragmentValue::Text(_) => "text",
            FragmentValue::Positional { .. } => "positional",
            FragmentValue::Mapping(_) => "mapping",
            FragmentValue::Nested(_) => "nested",
        }
    }

    /// Splits the value into stored fragments and the values they bind, in order.
    pub(crate) fn into_parts(self) -> (Vec<Fragment>, Vec<Value>) {
        if self.is_empty() {
            return (vec![], vec![]);
        }

        match self {
            FragmentValue::Empty => (vec![], vec![]),
            FragmentValue::Text(text) => (vec![Fragment::new(text, false)], vec![]),
            FragmentValue::Positional {
                template,
                arguments,
            } => {
                // only the number of values hints at an inner join here
                let compound = arguments.len() > 1;
                (vec![Fragment::new(template, compound)], arguments)
            }
            FragmentValue::Mapping(pairs) => {
                let mut fragments = Vec::with_capacity(pairs.len());
                let mut arguments = vec![];
                for (key, value) in pairs {
                    if value.is_null() {
                        fragments.push(Fragment::new(format!("{} IS NULL", key), false));
                    } else {
                        fragments.push(Fragment::new(
                            format!("{} = {}", key, PLACEHOLDER),
                            false,
                        ));
                        arguments.push(value);
                    }
                }
                (fragments, arguments)
            }
            FragmentValue::Nested(builder) => {
                let compound = builder.len() > 1 || builder.arguments().len() > 1;
                let (template, arguments) = builder.render_chunk().split();
                (vec![Fragment::new(template, compound)], arguments)
            }
        }
    }
}

impl From<&str> for FragmentValue {
    fn from(text: &str) -> Self {
        FragmentValue::Text(text.to_string())
    }
}

impl From<String> for FragmentValue {
    fn from(text: String) -> Self {
        FragmentValue::Text(text)
    }
}

impl From<&String> for FragmentValue {
    fn from(text: &String) -> Self {
        FragmentValue::Text(text.clone())
    }
}

impl From<IndexMap<String, Value>> for FragmentValue {
    fn from(pairs: IndexMap<String, Value>) -> Self {
        FragmentValue::Mapping(pairs)
    }
}

impl From<Map<String, Value>> for FragmentValue {
    fn from(pairs: Map<String, Value>) -> Self {
        FragmentValue::Mapping(pairs.into_iter().collect())
    }
}

impl From<ConditionBuilder> for FragmentValue {
    fn from(builder: ConditionBuilder) -> Self {
        FragmentValue::Nested(builder)
    }
}

impl From<&ConditionBuilder> for FragmentValue {
    fn from(builder: &ConditionBuilder) -> Self {
        FragmentValue::Nested(builder.clone())
    }
}

impl<T: Into<FragmentValue>> From<Option<T>> for FragmentValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FragmentValue::Empty, Into::into)
    }
}

impl TryFrom<Value> for FragmentValue {
    type Error = ConditionError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(FragmentValue::Empty),
            Value::String(text) => Ok(FragmentValue::Text(text)),
            Value::Object(pairs) => Ok(pairs.into()),
            Value::Array(mut items) => {
                if items.is_empty() {
                    return Ok(FragmentValue::Empty);
                }
                match items.remove(0) {
                    Value::Null => Ok(FragmentValue::Empty),
                    Value::String(template) => Ok(FragmentValue::Positional {
                        template,
                        arguments: items,
                    }),
                    head => {
                        items.insert(0, head);
                        Err(ConditionError::InvalidFragmentShape(Value::Array(items)))
                    }
                }
            }
            other => Err(ConditionError::InvalidFragmentShape(other)),
        }
    }
}

/// Conversion into one of the accepted fragment shapes.
///
/// Typed values always convert. A `serde_json::Value` is checked against the
/// shapes and rejected with [`ConditionError::InvalidFragmentShape`] when it
/// matches none of them.
pub trait IntoFragmentValue {
    fn into_fragment_value(self) -> Result<FragmentValue>;
}

macro_rules! infallible_fragment_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoFragmentValue for $t {
                fn into_fragment_value(self) -> Result<FragmentValue> {
                    Ok(self.into())
                }
            }
        )*
    };
}

infallible_fragment_value!(
    &str,
    String,
    &String,
    IndexMap<String, Value>,
    Map<String, Value>,
    ConditionBuilder,
    &ConditionBuilder,
);

impl IntoFragmentValue for FragmentValue {
    fn into_fragment_value(self) -> Result<FragmentValue> {
        Ok(self)
    }
}

impl IntoFragmentValue for Value {
    fn into_fragment_value(self) -> Result<FragmentValue> {
        FragmentValue::try_from(self)
    }
}

impl<K: Into<String>, V: Into<Value>> IntoFragmentValue for Vec<(K, V)> {
    fn into_fragment_value(self) -> Result<FragmentValue> {
        Ok(FragmentValue::Mapping(
            self.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        ))
    }
}

impl<T: IntoFragmentValue> IntoFragmentValue for Option<T> {
    fn into_fragment_value(self) -> Result<FragmentValue> {
        match self {
            Some(value) => value.into_fragment_value(),
            None => Ok(FragmentValue::Empty),
        }
    }
}

/// A stored template and whether it was known to join several conditions
/// when it was appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    template: String,
    compound: bool,
}

impl Fragment {
    pub(crate) fn new(template: impl Into<String>, compound: bool) -> Self {
        Self {
            template: template.into(),
            compound,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn is_compound(&self) -> bool {
        self.compound
    }
}
