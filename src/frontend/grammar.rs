use super::span::Span;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    GreaterThan,
    GreaterEq,
    LessThan,
    LessEq,
    EqualTo,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Debug)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Stmt {
    pub stmt: StmtType,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StmtType {
    Expression(Expr),
    VarDeclaration {
        identifier: String,
        constant: bool,
        value: Option<Expr>,
    },
    FunctionDeclaration(FuncInfo),
    For {
        init: Box<Stmt>,
        test: Expr,
        update: Expr,
        body: Vec<Stmt>,
    },
}

#[derive(Debug, PartialEq, Clone)]
pub struct Expr {
    pub expr: ExprType,
    pub span: Span,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExprType {
    Assignment(Box<Expr>, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Update(UpdateOp, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    Identifier(String),
    NumberLiteral(f64),
    StringLiteral(String),
    ObjectLiteral(Vec<Property>),
    ArrayLiteral(Vec<Expr>),
}

/// One `key` or `key: value` entry of an object literal. A bare key is
/// shorthand for looking up a same-named variable at evaluation time.
#[derive(Debug, PartialEq, Clone)]
pub struct Property {
    pub key: String,
    pub value: Option<Expr>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct FuncInfo {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: Vec<Stmt>,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<BinaryOp> {
        let op = match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            ">" => BinaryOp::GreaterThan,
            ">=" => BinaryOp::GreaterEq,
            "<" => BinaryOp::LessThan,
            "<=" => BinaryOp::LessEq,
            "==" => BinaryOp::EqualTo,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessEq => "<=",
            BinaryOp::EqualTo => "==",
        }
    }

    /// The grammar keeps `+ - > < <= >=` in one flat left-associative
    /// tier below the multiplicative operators. `==` belongs to neither
    /// tier; the lexer produces it but no infix rule consumes it.
    pub fn in_additive_tier(&self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Subtract
                | BinaryOp::GreaterThan
                | BinaryOp::GreaterEq
                | BinaryOp::LessThan
                | BinaryOp::LessEq
        )
    }

    pub fn in_multiplicative_tier(&self) -> bool {
        matches!(self, BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::Modulo)
    }
}

impl UpdateOp {
    pub fn from_symbol(symbol: &str) -> Option<UpdateOp> {
        match symbol {
            "++" => Some(UpdateOp::Increment),
            "--" => Some(UpdateOp::Decrement),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UpdateOp::Increment => "++",
            UpdateOp::Decrement => "--",
        }
    }
}

impl Stmt {
    pub fn new(stmt: StmtType, span: Span) -> Self {
        Stmt { stmt, span }
    }
}

impl Expr {
    pub fn new(expr: ExprType, span: Span) -> Self {
        Expr { expr, span }
    }
}

impl Program {
    /// Renders the program back to parseable source. Re-parsing the
    /// result yields a structurally identical tree.
    pub fn source_string(&self) -> String {
        let stmts: Vec<_> = self.body.iter().map(|s| s.source_string()).collect();
        stmts.join("\n")
    }
}

impl Stmt {
    pub fn source_string(&self) -> String {
        match &self.stmt {
            StmtType::Expression(expr) => format!("{};", expr.source_string()),
            StmtType::VarDeclaration {
                identifier,
                constant,
                value,
            } => {
                let keyword = if *constant { "const" } else { "let" };
                match value {
                    Some(expr) => format!("{} {} = {};", keyword, identifier, expr.source_string()),
                    None => format!("{} {};", keyword, identifier),
                }
            }
            StmtType::FunctionDeclaration(func_info) => {
                let body: Vec<_> = func_info.body.iter().map(|s| s.source_string()).collect();
                format!(
                    "fn {}({}) {{ {} }}",
                    func_info.name,
                    func_info.parameters.join(", "),
                    body.join(" ")
                )
            }
            StmtType::For {
                init,
                test,
                update,
                body,
            } => {
                let body: Vec<_> = body.iter().map(|s| s.source_string()).collect();
                format!(
                    "for ({} {}; {}) {{ {} }}",
                    init.source_string(),
                    test.source_string(),
                    update.source_string(),
                    body.join(" ")
                )
            }
        }
    }
}

impl Expr {
    pub fn source_string(&self) -> String {
        match &self.expr {
            ExprType::Assignment(assignee, value) => {
                format!("{} = {}", assignee.source_string(), value.source_string())
            }
            ExprType::Binary(op, lhs, rhs) => format!(
                "({} {} {})",
                lhs.source_string(),
                op.symbol(),
                rhs.source_string()
            ),
            ExprType::Update(op, arg) => format!("{}{}", arg.source_string(), op.symbol()),
            ExprType::Call(callee, args) => {
                let args: Vec<_> = args.iter().map(|a| a.source_string()).collect();
                format!("{}({})", callee.source_string(), args.join(", "))
            }
            ExprType::Member {
                object,
                property,
                computed,
            } => {
                if *computed {
                    format!("{}[{}]", object.source_string(), property.source_string())
                } else {
                    format!("{}.{}", object.source_string(), property.source_string())
                }
            }
            ExprType::Identifier(name) => name.clone(),
            ExprType::NumberLiteral(n) => format!("{}", n),
            ExprType::StringLiteral(s) => format!("\"{}\"", s),
            ExprType::ObjectLiteral(properties) => {
                let props: Vec<_> = properties
                    .iter()
                    .map(|p| match &p.value {
                        Some(value) => format!("{}: {}", p.key, value.source_string()),
                        None => p.key.clone(),
                    })
                    .collect();
                format!("{{ {} }}", props.join(", "))
            }
            ExprType::ArrayLiteral(elements) => {
                let elements: Vec<_> = elements.iter().map(|e| e.source_string()).collect();
                format!("[{}]", elements.join(", "))
            }
        }
    }
}
