pub mod cursor;
pub mod errors;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use lexer::{tokenize, Lexer};
pub use parser::{parse, Parser};
