//! Build parameterized SQL conditions from pieces.
//!
//! ```rust
//!   let mut conditions = ConditionBuilder::new(" AND ");
//!   conditions.append(json!({"brand": "Nokia"}))?;
//!   conditions.append(cond!("min_price >= ? AND max_price <= ?", 75, 300))?;
//!
//!   conditions.to_vec();  // ["brand = ? AND (min_price >= ? AND max_price <= ?)", "Nokia", 75, 300]
//! ```
pub mod bracket;
pub mod condition;
pub mod error;
pub mod expression;
pub mod fragment;
pub mod options;
pub mod prelude;
mod traits;

pub use bracket::BracketMode;
pub use condition::ConditionBuilder;
pub use error::{ConditionError, Result};
pub use expression::Expression;
pub use fragment::{Fragment, FragmentValue, IntoFragmentValue};
pub use options::BuilderOptions;
pub use traits::chunk::Chunk;
