pub use crate::bracket::BracketMode;
pub use crate::condition::ConditionBuilder;
pub use crate::cond;
pub use crate::error::{ConditionError, Result};
pub use crate::expr;
pub use crate::expression::{expression::PLACEHOLDER, Expression};
pub use crate::fragment::{Fragment, FragmentValue, IntoFragmentValue};
pub use crate::options::BuilderOptions;
pub use crate::traits::chunk::Chunk;
