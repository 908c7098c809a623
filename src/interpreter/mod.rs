pub mod environment;
pub mod errors;
pub mod function;
pub mod interpreter;
pub mod native_function;
pub mod value;

pub use environment::Environment;
pub use errors::{RuntimeError, RuntimeResult};
pub use interpreter::Interpreter;
pub use value::Value;
