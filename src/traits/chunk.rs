use std::fmt::Debug;

use crate::expression::Expression;

/// Anything that can render itself into a template plus bound values.
///
/// An `Expression` renders into itself. A `ConditionBuilder` renders into its
/// compiled form, which is how one builder is nested inside another:
///
/// ```rust
///   let age = ConditionBuilder::new(" AND ") + cond!("age >= ?", 18) + cond!("age <= ?", 35);
///
///   let (sql, params) = age.render_chunk().split();  // "age >= ? AND age <= ?", [18, 35]
/// ```
///
/// Rendering never mutates the chunk and may be repeated. An empty chunk renders
/// into `Expression::empty()`.
pub trait Chunk: Debug {
    /// Produces the template and its values, in placeholder order.
    fn render_chunk(&self) -> Expression;
}

impl<T: Chunk + ?Sized> Chunk for &T {
    fn render_chunk(&self) -> Expression {
        (**self).render_chunk()
    }
}
