use super::function::ScriptFn;
use super::native_function::NativeFn;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A runtime value. Numbers, objects and arrays are shared handles:
/// cloning a Value clones the handle, so mutation through one binding
/// is visible through every alias. Update expressions rely on this for
/// numbers, member assignment for objects.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Number(Rc<Cell<f64>>),
    Boolean(bool),
    Str(String),
    Object(Rc<RefCell<HashMap<String, Value>>>),
    Array(Rc<RefCell<Vec<Value>>>),
    NativeFunc(NativeFn),
    Func(ScriptFn),
}

impl Value {
    pub fn number(n: f64) -> Self {
        Value::Number(Rc::new(Cell::new(n)))
    }

    pub fn object(properties: HashMap<String, Value>) -> Self {
        Value::Object(Rc::new(RefCell::new(properties)))
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }
}

impl PartialEq<Value> for Value {
    /// Numbers, booleans and strings compare by content; aggregates and
    /// functions compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a.get() == b.get(),
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunc(a), Value::NativeFunc(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{}", n.get()),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Object(properties) => {
                // Keys render sorted so output is stable.
                let properties = properties.borrow();
                let mut keys: Vec<_> = properties.keys().collect();
                keys.sort();

                let entries: Vec<_> = keys
                    .into_iter()
                    .map(|key| format!("{}: {}", key, properties[key]))
                    .collect();
                write!(f, "{{ {} }}", entries.join(", "))
            }
            Value::Array(elements) => {
                let elements: Vec<_> =
                    elements.borrow().iter().map(|e| e.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Value::NativeFunc(func) => write!(f, "{:?}", func),
            Value::Func(func) => write!(f, "{:?}", func),
        }
    }
}
