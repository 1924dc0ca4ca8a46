pub mod error;
pub mod lexer;
pub mod parser;
pub mod types;

pub use error::{ParseError, ParseErrorKind};
pub use parser::parse;
pub use types::{CompareOp, FilterNode, LogicalOp};
