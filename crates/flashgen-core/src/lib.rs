#![deny(missing_docs)]
#![doc = "Configuration tree, scalar model, and grammar codec for the flashgen sweep generator."]

pub mod errors;

mod codec;
mod tree;
mod value;

pub use errors::{ErrorInfo, GenError};
pub use tree::{ConfigTree, TreeDiff};
pub use value::{Entry, Scalar};
