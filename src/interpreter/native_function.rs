use super::errors::RuntimeResult;
use super::value::Value;

use std::fmt;
use std::io::Write;
use std::rc::Rc;

type FnType = fn(Vec<Value>, &mut dyn Write) -> RuntimeResult<Value>;

pub struct NativeFnData {
    pub func: FnType,
    pub name: String,
}

#[derive(Clone)]
pub struct NativeFn(Rc<NativeFnData>);

impl NativeFn {
    fn new(name: &str, func: FnType) -> Self {
        let name = name.to_owned();
        let data = NativeFnData { func, name };
        NativeFn(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn execute(&self, args: Vec<Value>, output: &mut dyn Write) -> RuntimeResult<Value> {
        (self.0.func)(args, output)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native-fn {}>", self.0.name)
    }
}

impl PartialEq<NativeFn> for NativeFn {
    // You cannot derive Eq for function pointers in Rust. Also, LLVM
    // can combine two different functions into one that have identical
    // bodies. Wrap function pointer in Rc and compare the Rcs.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NativeFn {}

pub fn get_native_funcs() -> Vec<NativeFn> {
    vec![NativeFn::new("print", print)]
}

/// Writes its arguments space-separated on one line. Variadic.
fn print(args: Vec<Value>, output: &mut dyn Write) -> RuntimeResult<Value> {
    let rendered: Vec<_> = args.iter().map(|arg| arg.to_string()).collect();
    writeln!(output, "{}", rendered.join(" "))?;
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_writes_arguments() {
        let mut output = vec![];
        let print = get_native_funcs().into_iter().next().unwrap();

        let result = print
            .execute(
                vec![Value::number(1.0), Value::Str("hi".to_string()), Value::Null],
                &mut output,
            )
            .unwrap();

        assert_eq!(result, Value::Null);
        assert_eq!(String::from_utf8(output).unwrap(), "1 hi null\n");
    }
}
