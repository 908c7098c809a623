use super::value::Value;

use std::fmt;

#[derive(Debug, PartialEq, Clone)]
pub enum RuntimeError {
    UndefinedVariable(String),
    AlreadyDeclared(String),
    ConstReassignment(String),
    NotCallable(Value),
    NotIndexable(Value),
    ArrayIndexNotNumber(Value),
    ObjectKeyNotString(Value),
    InvalidAssignmentTarget,
    UpdateNonNumber(Value),
    MissingProperty(String),
    ForTestNotBoolean(Value),
    Io(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::UndefinedVariable(name) => {
                write!(f, "Cannot resolve `{}` as it does not exist.", name)
            }
            RuntimeError::AlreadyDeclared(name) => {
                write!(f, "Cannot declare variable `{}`: already defined.", name)
            }
            RuntimeError::ConstReassignment(name) => {
                write!(f, "Cannot reassign to `{}`: declared constant.", name)
            }
            RuntimeError::NotCallable(value) => {
                write!(f, "Cannot call value that is not a function: {}.", value)
            }
            RuntimeError::NotIndexable(value) => {
                write!(f, "Cannot access properties of {}.", value)
            }
            RuntimeError::ArrayIndexNotNumber(value) => {
                write!(f, "Array expected a number as key, but got {}.", value)
            }
            RuntimeError::ObjectKeyNotString(value) => {
                write!(f, "Object expected a string as key, but got {}.", value)
            }
            RuntimeError::InvalidAssignmentTarget => {
                write!(f, "Invalid left-hand side of assignment.")
            }
            RuntimeError::UpdateNonNumber(value) => {
                write!(f, "Update expression can only update numbers, got {}.", value)
            }
            RuntimeError::MissingProperty(key) => {
                write!(f, "Cannot update missing property `{}`.", key)
            }
            RuntimeError::ForTestNotBoolean(value) => {
                write!(f, "For loop test must evaluate to a boolean, got {}.", value)
            }
            RuntimeError::Io(message) => write!(f, "Output error: {}.", message),
        }
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(e: std::io::Error) -> Self {
        RuntimeError::Io(e.to_string())
    }
}
