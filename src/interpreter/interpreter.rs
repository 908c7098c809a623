use super::environment::Environment;
use super::errors::{RuntimeError, RuntimeResult};
use super::function::ScriptFn;
use super::value::Value;
use crate::frontend::grammar::{BinaryOp, Expr, ExprType, Program, Stmt, StmtType, UpdateOp};

use std::collections::HashMap;
use std::io::{self, Write};

pub struct Interpreter<W: Write> {
    output: W,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Interpreter {
            output: io::stdout(),
        }
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// An interpreter printing to the given sink. Tests capture output
    /// this way.
    pub fn with_output(output: W) -> Self {
        Interpreter { output }
    }

    /// Evaluates every top-level statement in order. The result is the
    /// value of the last statement, Null for an empty program.
    pub fn eval_program(&mut self, program: &Program, env: &Environment) -> RuntimeResult<Value> {
        let mut last = Value::Null;
        for stmt in program.body.iter() {
            last = self.eval_statement(stmt, env)?;
        }
        Ok(last)
    }

    pub fn eval_statement(&mut self, stmt: &Stmt, env: &Environment) -> RuntimeResult<Value> {
        match &stmt.stmt {
            StmtType::Expression(expr) => self.eval_expression(expr, env),
            StmtType::VarDeclaration {
                identifier,
                constant,
                value,
            } => {
                let value = match value {
                    Some(expr) => self.eval_expression(expr, env)?,
                    None => Value::Null,
                };
                env.declare(identifier, value, *constant)
            }
            StmtType::FunctionDeclaration(func_info) => {
                // The function closes over the environment it is
                // declared in, not any future call site.
                let func = ScriptFn::new(
                    func_info.name.clone(),
                    func_info.parameters.clone(),
                    func_info.body.clone(),
                    env.clone(),
                );
                env.declare(&func_info.name, Value::Func(func), true)
            }
            StmtType::For {
                init,
                test,
                update,
                body,
            } => self.eval_for(init, test, update, body, env),
        }
    }

    pub fn eval_expression(&mut self, expr: &Expr, env: &Environment) -> RuntimeResult<Value> {
        match &expr.expr {
            ExprType::NumberLiteral(n) => Ok(Value::number(*n)),
            ExprType::StringLiteral(s) => Ok(Value::Str(s.clone())),
            ExprType::Identifier(name) => env.lookup(name),
            ExprType::Binary(op, lhs, rhs) => self.eval_binary(*op, lhs, rhs, env),
            ExprType::Assignment(assignee, value) => self.eval_assignment(assignee, value, env),
            ExprType::Update(op, arg) => self.eval_update(*op, arg, env),
            ExprType::Call(callee, args) => self.eval_call(callee, args, env),
            ExprType::Member {
                object,
                property,
                computed,
            } => self.eval_member(object, property, *computed, env),
            ExprType::ObjectLiteral(properties) => {
                let mut object = HashMap::new();
                for property in properties.iter() {
                    let value = match &property.value {
                        Some(expr) => self.eval_expression(expr, env)?,
                        // Bare `{ key }` pulls a same-named variable.
                        None => env.lookup(&property.key)?,
                    };
                    object.insert(property.key.clone(), value);
                }
                Ok(Value::object(object))
            }
            ExprType::ArrayLiteral(element_exprs) => {
                let mut elements = vec![];
                for expr in element_exprs.iter() {
                    elements.push(self.eval_expression(expr, env)?);
                }
                Ok(Value::array(elements))
            }
        }
    }

    /// Number op Number and Str + Str are the only productive
    /// combinations; everything else quietly yields Null.
    fn eval_binary(
        &mut self,
        op: BinaryOp,
        lhs: &Expr,
        rhs: &Expr,
        env: &Environment,
    ) -> RuntimeResult<Value> {
        let lhs = self.eval_expression(lhs, env)?;
        let rhs = self.eval_expression(rhs, env)?;

        match (lhs, rhs) {
            (Value::Number(a), Value::Number(b)) => {
                let (a, b) = (a.get(), b.get());
                let value = match op {
                    BinaryOp::Add => Value::number(a + b),
                    BinaryOp::Subtract => Value::number(a - b),
                    BinaryOp::Multiply => Value::number(a * b),
                    BinaryOp::Divide => Value::number(a / b),
                    BinaryOp::Modulo => Value::number(a % b),
                    BinaryOp::GreaterThan => Value::Boolean(a > b),
                    BinaryOp::GreaterEq => Value::Boolean(a >= b),
                    BinaryOp::LessThan => Value::Boolean(a < b),
                    BinaryOp::LessEq => Value::Boolean(a <= b),
                    // Lexed but not part of the evaluable operator set.
                    BinaryOp::EqualTo => Value::Null,
                };
                Ok(value)
            }
            (Value::Str(a), Value::Str(b)) if op == BinaryOp::Add => Ok(Value::Str(a + &b)),
            _ => Ok(Value::Null),
        }
    }

    fn eval_assignment(
        &mut self,
        assignee: &Expr,
        value_expr: &Expr,
        env: &Environment,
    ) -> RuntimeResult<Value> {
        match &assignee.expr {
            ExprType::Identifier(name) => {
                let value = self.eval_expression(value_expr, env)?;
                env.assign(name, value)
            }
            ExprType::Member {
                object,
                property,
                computed,
            } => {
                let properties = match self.eval_expression(object, env)? {
                    Value::Object(properties) => properties,
                    other => return Err(RuntimeError::NotIndexable(other)),
                };
                let key = self.eval_object_key(property, *computed, env)?;
                let value = self.eval_expression(value_expr, env)?;

                // In-place mutation: every alias of this object sees
                // the new entry.
                properties.borrow_mut().insert(key, value.clone());
                Ok(value)
            }
            _ => Err(RuntimeError::InvalidAssignmentTarget),
        }
    }

    fn eval_member(
        &mut self,
        object: &Expr,
        property: &Expr,
        computed: bool,
        env: &Environment,
    ) -> RuntimeResult<Value> {
        match self.eval_expression(object, env)? {
            Value::Array(elements) => {
                let index = match self.eval_member_key(property, computed, env)? {
                    Value::Number(n) => n.get().trunc(),
                    other => return Err(RuntimeError::ArrayIndexNotNumber(other)),
                };

                // Out-of-range reads are Null, never an error.
                if index < 0.0 {
                    return Ok(Value::Null);
                }
                let elements = elements.borrow();
                Ok(elements.get(index as usize).cloned().unwrap_or(Value::Null))
            }
            Value::Object(properties) => {
                let key = match self.eval_member_key(property, computed, env)? {
                    Value::Str(key) => key,
                    other => return Err(RuntimeError::ObjectKeyNotString(other)),
                };
                let properties = properties.borrow();
                Ok(properties.get(&key).cloned().unwrap_or(Value::Null))
            }
            other => Err(RuntimeError::NotIndexable(other)),
        }
    }

    /// The key of a computed access is an arbitrary expression; a dot
    /// access keys on the identifier's name.
    fn eval_member_key(
        &mut self,
        property: &Expr,
        computed: bool,
        env: &Environment,
    ) -> RuntimeResult<Value> {
        if computed {
            return self.eval_expression(property, env);
        }
        match &property.expr {
            ExprType::Identifier(name) => Ok(Value::Str(name.clone())),
            // The parser only emits identifiers here, but a hand-built
            // tree must not panic the library.
            _ => {
                let value = self.eval_expression(property, env)?;
                Err(RuntimeError::ObjectKeyNotString(value))
            }
        }
    }

    /// Same as eval_member_key but narrowed to object keys.
    fn eval_object_key(
        &mut self,
        property: &Expr,
        computed: bool,
        env: &Environment,
    ) -> RuntimeResult<String> {
        match self.eval_member_key(property, computed, env)? {
            Value::Str(key) => Ok(key),
            other => Err(RuntimeError::ObjectKeyNotString(other)),
        }
    }

    /// `++`/`--` mutate the bound Number cell itself, so the change is
    /// visible through every alias of that number.
    fn eval_update(
        &mut self,
        op: UpdateOp,
        arg: &Expr,
        env: &Environment,
    ) -> RuntimeResult<Value> {
        let target = match &arg.expr {
            ExprType::Identifier(name) => env.lookup(name)?,
            ExprType::Member {
                object,
                property,
                computed,
            } => {
                let properties = match self.eval_expression(object, env)? {
                    Value::Object(properties) => properties,
                    other => return Err(RuntimeError::NotIndexable(other)),
                };
                let key = self.eval_object_key(property, *computed, env)?;

                let properties = properties.borrow();
                match properties.get(&key) {
                    Some(value) => value.clone(),
                    None => return Err(RuntimeError::MissingProperty(key)),
                }
            }
            _ => {
                let value = self.eval_expression(arg, env)?;
                return Err(RuntimeError::UpdateNonNumber(value));
            }
        };

        match target {
            Value::Number(cell) => {
                let delta = match op {
                    UpdateOp::Increment => 1.0,
                    UpdateOp::Decrement => -1.0,
                };
                cell.set(cell.get() + delta);
                Ok(Value::Number(cell))
            }
            other => Err(RuntimeError::UpdateNonNumber(other)),
        }
    }

    fn eval_call(
        &mut self,
        callee: &Expr,
        arg_exprs: &[Expr],
        env: &Environment,
    ) -> RuntimeResult<Value> {
        let callee = self.eval_expression(callee, env)?;

        let mut args = Vec::with_capacity(arg_exprs.len());
        for arg_expr in arg_exprs.iter() {
            args.push(self.eval_expression(arg_expr, env)?);
        }

        match callee {
            Value::NativeFunc(func) => func.execute(args, &mut self.output),
            Value::Func(func) => {
                // New scope enclosed by the declaration environment,
                // not the caller's.
                let scope = Environment::with_enclosing(func.declaration_env());

                for (index, parameter) in func.parameters().iter().enumerate() {
                    let arg = args.get(index).cloned().unwrap_or(Value::Null);
                    scope.declare(parameter, arg, false)?;
                }

                // Implicit return: the value of the last body statement.
                let mut result = Value::Null;
                for stmt in func.body().iter() {
                    result = self.eval_statement(stmt, &scope)?;
                }
                Ok(result)
            }
            other => Err(RuntimeError::NotCallable(other)),
        }
    }

    fn eval_for(
        &mut self,
        init: &Stmt,
        test: &Expr,
        update: &Expr,
        body: &[Stmt],
        env: &Environment,
    ) -> RuntimeResult<Value> {
        // The init clause scopes to the loop, not the enclosing block.
        let loop_env = Environment::with_enclosing(env);
        self.eval_statement(init, &loop_env)?;

        loop {
            match self.eval_expression(test, &loop_env)? {
                Value::Boolean(true) => {}
                Value::Boolean(false) => break,
                other => return Err(RuntimeError::ForTestNotBoolean(other)),
            }

            // Each pass gets a fresh environment for body declarations.
            let iteration_env = Environment::with_enclosing(&loop_env);
            for stmt in body.iter() {
                self.eval_statement(stmt, &iteration_env)?;
            }

            self.eval_expression(update, &loop_env)?;
        }

        Ok(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::parse;
    use crate::frontend::span::Span;

    fn run(source: &str) -> (RuntimeResult<Value>, String) {
        let program = parse(source).unwrap();
        let mut output = vec![];
        let env = Environment::global();
        let result = Interpreter::with_output(&mut output).eval_program(&program, &env);
        (result, String::from_utf8(output).unwrap())
    }

    fn eval(source: &str) -> Value {
        run(source).0.unwrap()
    }

    fn eval_err(source: &str) -> RuntimeError {
        run(source).0.unwrap_err()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1 + 2 * 3;"), Value::number(7.0));
        assert_eq!(eval("(1 + 2) * 3;"), Value::number(9.0));
        assert_eq!(eval("7 / 2;"), Value::number(3.5));
        assert_eq!(eval("10 % 3;"), Value::number(1.0));
        assert_eq!(eval("0 - 7 % 3;"), Value::number(-1.0));
    }

    #[test]
    fn test_comparisons_share_additive_tier() {
        assert_eq!(eval("1 + 2 < 3;"), Value::Boolean(false));
        assert_eq!(eval("2 * 3 <= 6;"), Value::Boolean(true));
        // `1 < 2 + 3` folds left: (1 < 2) + 3 mixes Boolean and Number.
        assert_eq!(eval("1 < 2 + 3;"), Value::Null);
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(eval("\"ab\" + \"cd\";"), Value::Str("abcd".to_string()));
    }

    #[test]
    fn test_mixed_type_operations_yield_null() {
        assert_eq!(eval("1 + \"x\";"), Value::Null);
        assert_eq!(eval("\"a\" - \"b\";"), Value::Null);
        assert_eq!(eval("true + 1;"), Value::Null);
    }

    #[test]
    fn test_program_result_is_last_statement() {
        assert_eq!(eval("let x = 1; x + 1;"), Value::number(2.0));
        assert_eq!(eval(""), Value::Null);
    }

    #[test]
    fn test_globals() {
        assert_eq!(eval("null;"), Value::Null);
        assert_eq!(eval("true;"), Value::Boolean(true));
        assert_eq!(eval("false;"), Value::Boolean(false));
    }

    #[test]
    fn test_redeclaration_fails() {
        assert_eq!(
            eval_err("let x = 1; let x = 2;"),
            RuntimeError::AlreadyDeclared("x".to_string())
        );
    }

    #[test]
    fn test_const_reassignment_fails() {
        assert_eq!(
            eval_err("const x = 1; x = 2;"),
            RuntimeError::ConstReassignment("x".to_string())
        );
    }

    #[test]
    fn test_assignment_targets_nearest_binding() {
        assert_eq!(
            eval("let x = 1; fn bump() { x = x + 1; } bump(); x;"),
            Value::number(2.0)
        );
    }

    #[test]
    fn test_for_loop_prints_and_scopes() {
        let (result, output) = run("for (let i = 0; i < 3; i++) { print(i); }");
        assert_eq!(result.unwrap(), Value::Null);
        assert_eq!(output, "0\n1\n2\n");

        // The loop variable does not leak into the outer scope.
        assert_eq!(
            eval_err("for (let i = 0; i < 3; i++) { i; } i;"),
            RuntimeError::UndefinedVariable("i".to_string())
        );
    }

    #[test]
    fn test_for_test_must_be_boolean() {
        assert_eq!(
            eval_err("for (let i = 0; i; i++) { i; }"),
            RuntimeError::ForTestNotBoolean(Value::number(0.0))
        );
    }

    #[test]
    fn test_functions_are_lexically_scoped() {
        let source = "
            let x = 1;
            fn readX() { x; }
            fn shadowed() { let x = 99; readX(); }
            shadowed();
        ";
        assert_eq!(eval(source), Value::number(1.0));
    }

    #[test]
    fn test_implicit_return_of_last_statement() {
        assert_eq!(eval("fn add(a, b) { a + b; } add(1, 2);"), Value::number(3.0));
        assert_eq!(eval("fn nothing() { } nothing();"), Value::Null);
    }

    #[test]
    fn test_missing_arguments_bind_null() {
        assert_eq!(eval("fn second(a, b) { b; } second(1);"), Value::Null);
    }

    #[test]
    fn test_function_declarations_are_const() {
        assert_eq!(
            eval_err("fn f() { } f = 1;"),
            RuntimeError::ConstReassignment("f".to_string())
        );
    }

    #[test]
    fn test_calling_non_function_fails() {
        assert_eq!(
            eval_err("let x = 1; x();"),
            RuntimeError::NotCallable(Value::number(1.0))
        );
    }

    #[test]
    fn test_object_literals_and_member_access() {
        assert_eq!(eval("let o = { a: 1, b: 2 }; o.a + o.b;"), Value::number(3.0));
        assert_eq!(eval("let o = { a: 1 }; o[\"a\"];"), Value::number(1.0));
        assert_eq!(eval("let o = { a: 1 }; o.missing;"), Value::Null);
        assert_eq!(eval("let x = 5; let o = { x }; o.x;"), Value::number(5.0));
    }

    #[test]
    fn test_member_assignment_is_alias_visible() {
        assert_eq!(
            eval("let a = { x: 1 }; let b = a; b.x = 2; a.x;"),
            Value::number(2.0)
        );
    }

    #[test]
    fn test_nested_member_chains() {
        assert_eq!(
            eval("let o = { inner: { n: 7 } }; o.inner.n;"),
            Value::number(7.0)
        );
        assert_eq!(
            eval("let o = { inner: { n: 7 } }; o.inner.n = 8; o.inner.n;"),
            Value::number(8.0)
        );
    }

    #[test]
    fn test_arrays() {
        assert_eq!(eval("let xs = [1, 2, 3]; xs[1];"), Value::number(2.0));
        assert_eq!(eval("let xs = [[1], [2]]; xs[1][0];"), Value::number(2.0));
    }

    #[test]
    fn test_out_of_range_array_reads_are_null() {
        assert_eq!(eval("let xs = [1, 2]; xs[5];"), Value::Null);
        assert_eq!(eval("let xs = [1, 2]; xs[0 - 1];"), Value::Null);
    }

    #[test]
    fn test_array_index_must_be_number() {
        assert_eq!(
            eval_err("let xs = [1]; xs[\"a\"];"),
            RuntimeError::ArrayIndexNotNumber(Value::Str("a".to_string()))
        );
    }

    #[test]
    fn test_object_key_must_be_string() {
        assert_eq!(
            eval_err("let o = { a: 1 }; o[1];"),
            RuntimeError::ObjectKeyNotString(Value::number(1.0))
        );
    }

    #[test]
    fn test_assignment_target_must_be_identifier_or_member() {
        assert_eq!(eval_err("1 = 2;"), RuntimeError::InvalidAssignmentTarget);
        assert_eq!(eval_err("a + b = 2;"), RuntimeError::InvalidAssignmentTarget);
    }

    #[test]
    fn test_non_identifier_dot_key_is_an_error_not_a_panic() {
        // The parser rejects `o.1`, but eval_expression is public and a
        // hand-built tree can carry any property shape.
        let object = Expr::new(ExprType::ObjectLiteral(vec![]), Span::default());
        let property = Expr::new(ExprType::NumberLiteral(1.0), Span::default());
        let access = Expr::new(
            ExprType::Member {
                object: Box::new(object),
                property: Box::new(property),
                computed: false,
            },
            Span::default(),
        );

        let env = Environment::global();
        let result = Interpreter::with_output(vec![]).eval_expression(&access, &env);
        assert_eq!(
            result,
            Err(RuntimeError::ObjectKeyNotString(Value::number(1.0)))
        );
    }

    #[test]
    fn test_indexing_non_container_fails() {
        assert_eq!(
            eval_err("let x = 1; x.y;"),
            RuntimeError::NotIndexable(Value::number(1.0))
        );
    }

    #[test]
    fn test_update_mutates_through_aliases() {
        // Numbers are shared cells: both bindings observe the bump.
        assert_eq!(eval("let a = 5; let b = a; a++; b;"), Value::number(6.0));
        assert_eq!(eval("let n = 3; n--; n;"), Value::number(2.0));
    }

    #[test]
    fn test_update_on_object_property() {
        assert_eq!(eval("let o = { n: 1 }; o.n++; o.n;"), Value::number(2.0));
        assert_eq!(
            eval_err("let o = { }; o.n++;"),
            RuntimeError::MissingProperty("n".to_string())
        );
    }

    #[test]
    fn test_update_requires_number() {
        assert_eq!(
            eval_err("let s = \"hi\"; s++;"),
            RuntimeError::UpdateNonNumber(Value::Str("hi".to_string()))
        );
    }

    #[test]
    fn test_print_is_variadic() {
        let (_, output) = run("print(1, \"two\", [3]);");
        assert_eq!(output, "1 two [3]\n");
    }

    #[test]
    fn test_closures_capture_declaration_environment() {
        let source = "
            fn makeCounter() {
                let count = 0;
                fn bump() { count = count + 1; count; }
                bump;
            }
            const counter = makeCounter();
            counter();
            counter();
        ";
        assert_eq!(eval(source), Value::number(2.0));
    }
}
