use super::environment::Environment;
use crate::frontend::grammar::Stmt;

use std::fmt;
use std::rc::Rc;

pub struct ScriptFnData {
    name: String,
    parameters: Vec<String>,
    body: Vec<Stmt>,
    declaration_env: Environment,
}

/// A user-declared function value. Carries the environment it was
/// declared in; calls scope against that, not the call site.
#[derive(Clone)]
pub struct ScriptFn(Rc<ScriptFnData>);

impl ScriptFn {
    pub fn new(
        name: String,
        parameters: Vec<String>,
        body: Vec<Stmt>,
        declaration_env: Environment,
    ) -> Self {
        let data = ScriptFnData {
            name,
            parameters,
            body,
            declaration_env,
        };
        ScriptFn(Rc::new(data))
    }

    pub fn parameters(&self) -> &[String] {
        &self.0.parameters
    }

    pub fn body(&self) -> &[Stmt] {
        &self.0.body
    }

    pub fn declaration_env(&self) -> &Environment {
        &self.0.declaration_env
    }
}

impl fmt::Debug for ScriptFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<fn {}>", self.0.name)
    }
}

impl PartialEq<ScriptFn> for ScriptFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ScriptFn {}
