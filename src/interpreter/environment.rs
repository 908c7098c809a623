use super::errors::{RuntimeError, RuntimeResult};
use super::native_function::get_native_funcs;
use super::value::Value;

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// One lexical scope. Environments are shared handles into a
/// parent-linked tree: function values keep their declaration
/// environment alive, and child scopes keep their parents alive.
#[derive(Clone)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

struct EnvironmentData {
    variables: HashMap<String, Value>,
    constants: HashSet<String>,
    parent: Option<Environment>,
}

impl Environment {
    fn empty(parent: Option<Environment>) -> Self {
        let env_data = EnvironmentData {
            variables: HashMap::new(),
            constants: HashSet::new(),
            parent,
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    /// The root scope, pre-populated with `null`, `true`, `false` and
    /// the native functions. Called once per program run by the
    /// harness; there is no implicit singleton.
    pub fn global() -> Self {
        let env = Environment::empty(None);

        // Declarations into a fresh scope cannot collide.
        let _ = env.declare("null", Value::Null, true);
        let _ = env.declare("true", Value::Boolean(true), true);
        let _ = env.declare("false", Value::Boolean(false), true);
        for native_func in get_native_funcs() {
            let name = native_func.name().to_owned();
            let _ = env.declare(&name, Value::NativeFunc(native_func), true);
        }

        env
    }

    /// A child scope enclosed by `env`.
    pub fn with_enclosing(env: &Environment) -> Self {
        Environment::empty(Some(env.clone()))
    }

    /// Binds `name` in this scope. Shadowing a parent binding is fine;
    /// rebinding within the same scope is not.
    pub fn declare(&self, name: &str, value: Value, constant: bool) -> RuntimeResult<Value> {
        let mut data = self.env_ptr.borrow_mut();

        if data.variables.contains_key(name) {
            return Err(RuntimeError::AlreadyDeclared(name.to_owned()));
        }

        data.variables.insert(name.to_owned(), value.clone());
        if constant {
            data.constants.insert(name.to_owned());
        }
        Ok(value)
    }

    /// Overwrites the nearest enclosing binding of `name`.
    pub fn assign(&self, name: &str, value: Value) -> RuntimeResult<Value> {
        let env = self.resolve(name)?;
        let mut data = env.env_ptr.borrow_mut();

        if data.constants.contains(name) {
            return Err(RuntimeError::ConstReassignment(name.to_owned()));
        }

        data.variables.insert(name.to_owned(), value.clone());
        Ok(value)
    }

    /// Reads the nearest enclosing binding of `name`.
    pub fn lookup(&self, name: &str) -> RuntimeResult<Value> {
        let env = self.resolve(name)?;
        let data = env.env_ptr.borrow();
        Ok(data.variables[name].clone())
    }

    /// The nearest self-or-ancestor scope that binds `name`.
    pub fn resolve(&self, name: &str) -> RuntimeResult<Environment> {
        if self.env_ptr.borrow().variables.contains_key(name) {
            return Ok(self.clone());
        }

        match &self.env_ptr.borrow().parent {
            Some(parent) => parent.resolve(name),
            None => Err(RuntimeError::UndefinedVariable(name.to_owned())),
        }
    }
}
