pub mod expression;

pub use crate::expression::expression::Expression;
