use std::fmt::{self, Display};
use std::ops::{Add, AddAssign};

use log::{debug, trace};
use serde_json::Value;

use crate::bracket::BracketMode;
use crate::error::{ConditionError, Result};
use crate::expression::Expression;
use crate::fragment::{Fragment, FragmentValue, IntoFragmentValue};
use crate::options::BuilderOptions;
use crate::traits::chunk::Chunk;

/// Accumulates condition fragments and their bound values, then compiles them
/// into a single template joined by `glue`.
///
/// ```rust
///   let mut conditions = ConditionBuilder::new(" AND ");
///   conditions.append(json!({"brand": "Nokia"}))?;
///   conditions.append(cond!("min_price >= ?", 75))?;
///
///   conditions.to_vec();  // ["brand = ? AND min_price >= ?", "Nokia", 75]
/// ```
///
/// Fragments known to join several conditions are wrapped in parentheses when
/// compiled next to other fragments, see [`BracketMode`].
#[derive(Debug, Clone)]
pub struct ConditionBuilder {
    glue: String,
    bracket_mode: BracketMode,
    fragments: Vec<Fragment>,
    arguments: Vec<Value>,
}

impl ConditionBuilder {
    pub fn new(glue: impl Into<String>) -> ConditionBuilder {
        ConditionBuilder::with_options(glue, BuilderOptions::default())
    }

    pub fn with_options(glue: impl Into<String>, options: BuilderOptions) -> ConditionBuilder {
        ConditionBuilder {
            glue: glue.into(),
            bracket_mode: options.bracket_mode,
            fragments: Vec::new(),
            arguments: Vec::new(),
        }
    }

    pub fn glue(&self) -> &str {
        &self.glue
    }

    /// Only affects later compilations, stored fragments are kept as they are.
    pub fn set_glue(&mut self, glue: impl Into<String>) -> &mut Self {
        self.glue = glue.into();
        self
    }

    pub fn bracket_mode(&self) -> BracketMode {
        self.bracket_mode
    }

    pub fn set_bracket_mode(&mut self, bracket_mode: BracketMode) -> &mut Self {
        self.bracket_mode = bracket_mode;
        self
    }

    /// Validated setter for modes coming from untyped input, such as `"auto"`
    /// or `json!(true)`. The mode is left unchanged on error.
    pub fn try_set_bracket_mode<M>(&mut self, bracket_mode: M) -> Result<&mut Self>
    where
        M: TryInto<BracketMode, Error = ConditionError>,
    {
        self.bracket_mode = bracket_mode.try_into()?;
        Ok(self)
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Number of fragments, not of bound values.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Appends a fragment, returning self for chaining.
    ///
    /// Empty or blank values are ignored. A value that fits none of the
    /// fragment shapes is rejected and the builder is left untouched.
    pub fn append(&mut self, value: impl IntoFragmentValue) -> Result<&mut Self> {
        let value = value.into_fragment_value()?;
        Ok(self.push(value))
    }

    fn push(&mut self, value: FragmentValue) -> &mut Self {
        if value.is_empty() {
            trace!("Ignoring empty {} fragment", value.kind());
            return self;
        }

        let kind = value.kind();
        let (fragments, arguments) = value.into_parts();
        self.fragments.extend(fragments);
        self.arguments.extend(arguments);
        trace!(
            "Appended {} fragment, now {} fragments and {} arguments",
            kind,
            self.fragments.len(),
            self.arguments.len()
        );
        self
    }

    /// Copy of self with the fragment appended. Self is not modified.
    pub fn plus(&self, value: impl IntoFragmentValue) -> Result<ConditionBuilder> {
        let mut copy = self.clone();
        copy.append(value)?;
        Ok(copy)
    }

    /// Appends `transform(item)` for every item, in order. Transforms may
    /// return an empty value (e.g. `None`) to skip an item.
    ///
    /// ```rust
    ///   conditions.append_each(["Nokia", "Motorola"], Some(|brand: &str| {
    ///       brand.starts_with("Moto").then(|| cond!("brand = ?", brand))
    ///   }))?;
    /// ```
    pub fn append_each<I, F, R>(&mut self, items: I, transform: Option<F>) -> Result<&mut Self>
    where
        I: IntoIterator,
        F: FnMut(I::Item) -> R,
        R: IntoFragmentValue,
    {
        let Some(mut transform) = transform else {
            return Err(ConditionError::MissingTransform);
        };

        for item in items {
            self.append(transform(item))?;
        }
        Ok(self)
    }

    /// Drops all fragments and values and resets the bracket mode. Glue stays.
    pub fn clear(&mut self) -> &mut Self {
        self.fragments.clear();
        self.arguments.clear();
        self.bracket_mode = BracketMode::default();
        self
    }

    /// Joins all fragments into one template, bracketing each one according
    /// to the bracket mode. `None` for an empty builder.
    pub fn compile(&self) -> Option<Expression> {
        if self.fragments.is_empty() {
            return None;
        }

        let total = self.fragments.len();
        let rendered = self
            .fragments
            .iter()
            .map(|fragment| {
                let template = Expression::new(fragment.template().to_string(), vec![]);
                if self.bracket_mode.applies_to(fragment.is_compound(), total) {
                    template.bracketed()
                } else {
                    template
                }
            })
            .collect::<Vec<Expression>>();

        let (template, _) = Expression::from_vec(rendered, &self.glue).split();
        let compiled = Expression::new(template, self.arguments.clone());
        debug!("Compiled condition: {}", compiled.preview());
        Some(compiled)
    }

    /// Compiled form as `[template, values...]`, or `[]` when empty.
    pub fn to_vec(&self) -> Vec<Value> {
        self.compile()
            .map(Expression::into_vec)
            .unwrap_or_default()
    }
}

impl Chunk for ConditionBuilder {
    fn render_chunk(&self) -> Expression {
        self.compile().unwrap_or_else(Expression::empty)
    }
}

impl Display for ConditionBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.compile() {
            Some(compiled) => write!(f, "{}", compiled),
            None => Ok(()),
        }
    }
}

// Operator impls take `Into<FragmentValue>`, which cannot fail; fallible input goes through `append`.
impl<F: Into<FragmentValue>> Add<F> for ConditionBuilder {
    type Output = ConditionBuilder;

    fn add(mut self, rhs: F) -> ConditionBuilder {
        self.push(rhs.into());
        self
    }
}

impl<F: Into<FragmentValue>> Add<F> for &ConditionBuilder {
    type Output = ConditionBuilder;

    fn add(self, rhs: F) -> ConditionBuilder {
        self.clone() + rhs
    }
}

impl<F: Into<FragmentValue>> AddAssign<F> for ConditionBuilder {
    fn add_assign(&mut self, rhs: F) {
        self.push(rhs.into());
    }
}

impl<F: Into<FragmentValue>> Extend<F> for ConditionBuilder {
    fn extend<T: IntoIterator<Item = F>>(&mut self, iter: T) {
        for value in iter {
            self.push(value.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::cond;

    use super::*;

    fn sc1(mode: BracketMode) -> ConditionBuilder {
        let mut r = ConditionBuilder::new(" AND ");
        r.append(cond!("is_male = ?", true))
            .unwrap()
            .append(cond!("age >= ? AND age <= ?", 18, 35))
            .unwrap()
            .set_bracket_mode(mode);
        r
    }

    #[test]
    fn test_initially_empty() {
        let r = ConditionBuilder::new(" AND ");
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.compile(), None);
        assert_eq!(r.to_vec(), Vec::<Value>::new());
        assert_eq!(r.to_string(), "");
    }

    #[test]
    fn test_single_fragment_never_bracketed() {
        for mode in [BracketMode::Always, BracketMode::Never, BracketMode::Auto] {
            let mut r =
                ConditionBuilder::with_options(" AND ", BuilderOptions::new().bracket_mode(mode));
            r.append(cond!("age < ?", 25)).unwrap();
            assert_eq!(r.to_vec(), vec![json!("age < ?"), json!(25)]);
        }
    }

    #[test]
    fn test_brackets_by_mode() {
        assert_eq!(
            sc1(BracketMode::Always).to_vec(),
            vec![json!("(is_male = ?) AND (age >= ? AND age <= ?)"), json!(true), json!(18), json!(35)]
        );
        assert_eq!(
            sc1(BracketMode::Never).to_vec(),
            vec![json!("is_male = ? AND age >= ? AND age <= ?"), json!(true), json!(18), json!(35)]
        );
        assert_eq!(
            sc1(BracketMode::Auto).to_vec(),
            vec![json!("is_male = ? AND (age >= ? AND age <= ?)"), json!(true), json!(18), json!(35)]
        );
    }

    #[test]
    fn test_compound_without_arguments_goes_undetected() {
        let mut r = ConditionBuilder::new(" AND ");
        r.append(cond!("is_male = ?", true))
            .unwrap()
            .append(cond!("age >= 18 AND age <= 35"))
            .unwrap();

        assert_eq!(
            r.to_vec(),
            vec![json!("is_male = ? AND age >= 18 AND age <= 35"), json!(true)]
        );

        r.set_bracket_mode(BracketMode::Always);
        assert_eq!(
            r.to_vec(),
            vec![json!("(is_male = ?) AND (age >= 18 AND age <= 35)"), json!(true)]
        );
    }

    #[test]
    fn test_append_returns_self_for_chaining() {
        let mut r = ConditionBuilder::new(" AND ");
        r.append(cond!("age >= ?", 18))
            .unwrap()
            .append("created_at IS NULL")
            .unwrap();

        assert_eq!(
            r.to_vec(),
            vec![json!("age >= ? AND created_at IS NULL"), json!(18)]
        );
    }

    #[test]
    fn test_failed_append_leaves_builder_untouched() {
        let mut r = ConditionBuilder::new(" AND ");
        r.append("field IS NULL").unwrap();

        let err = r.append(json!(42)).unwrap_err();
        assert!(err.is_invalid_fragment());
        assert_eq!(r.to_vec(), vec![json!("field IS NULL")]);
    }

    #[test]
    fn test_glue_affects_only_compilation() {
        let mut r = ConditionBuilder::new(" AND ");
        r.append("a IS NULL").unwrap().append("b IS NULL").unwrap();
        r.set_glue(" OR ");

        assert_eq!(r.glue(), " OR ");
        assert_eq!(r.to_vec(), vec![json!("a IS NULL OR b IS NULL")]);
        assert_eq!(r.fragments()[0].template(), "a IS NULL");
    }

    #[test]
    fn test_try_set_bracket_mode() {
        let mut r = ConditionBuilder::new(" AND ");
        r.try_set_bracket_mode("never").unwrap();
        assert_eq!(r.bracket_mode(), BracketMode::Never);

        r.try_set_bracket_mode(json!(true)).unwrap();
        assert_eq!(r.bracket_mode(), BracketMode::Always);

        assert!(r.try_set_bracket_mode(Value::Null).is_err());
        assert!(r.try_set_bracket_mode(":something_invalid").is_err());
        assert_eq!(r.bracket_mode(), BracketMode::Always);
    }

    #[test]
    fn test_try_set_bracket_mode_rejects_boolean_strings() {
        let mut r = ConditionBuilder::new(" AND ");
        r.set_bracket_mode(BracketMode::Never);

        let err = r.try_set_bracket_mode("true").unwrap_err();
        assert!(matches!(err, ConditionError::InvalidBracketMode(_)));
        assert_eq!(r.bracket_mode(), BracketMode::Never);
    }

    #[test]
    fn test_clear() {
        let mut r = ConditionBuilder::new(" OR ");
        r.append(cond!("is_male = ?", true))
            .unwrap()
            .set_bracket_mode(BracketMode::Never)
            .clear();

        assert!(r.is_empty());
        assert!(r.arguments().is_empty());
        assert_eq!(r.compile(), None);
        assert_eq!(r.bracket_mode(), BracketMode::Auto);
        assert_eq!(r.glue(), " OR ");
    }

    #[test]
    fn test_add_operators() {
        let base = ConditionBuilder::new(" AND ");
        let r = &base + cond!("age >= ?", 18) + cond!("age <= ?", 35);

        assert!(base.is_empty());
        assert_eq!(r.len(), 2);
        assert_eq!(r.arguments(), &[json!(18), json!(35)]);

        let mut r = r;
        r += "deleted_at IS NULL";
        r.extend(vec![cond!("a = ?", 1), FragmentValue::Empty]);
        assert_eq!(
            r.to_vec(),
            vec![
                json!("age >= ? AND age <= ? AND deleted_at IS NULL AND a = ?"),
                json!(18),
                json!(35),
                json!(1)
            ]
        );
    }

    #[test]
    fn test_render_chunk() {
        assert!(ConditionBuilder::new(" AND ").render_chunk().is_empty());

        let r = ConditionBuilder::new(" AND ") + cond!("name = ?", "John") + cond!("age > ?", 30);
        let (sql, params) = r.render_chunk().split();
        assert_eq!(sql, "name = ? AND age > ?");
        assert_eq!(params, vec![json!("John"), json!(30)]);
        assert_eq!(r.to_string(), r#"name = "John" AND age > 30"#);
    }
}
