pub mod frontend;
pub mod interpreter;
