use super::errors::{ParserError, ParserErrorKind, ParserResult};
use super::grammar::{BinaryOp, UpdateOp};
use super::grammar::{Expr, ExprType, FuncInfo, Program, Property, Stmt, StmtType};
use super::lexer::tokenize;
use super::span::Span;
use super::token::{SpannedToken, Token, TokenKind};

/// Tokenizes and parses the whole source. Lexical errors surface as
/// parser errors.
pub fn parse(source: &str) -> ParserResult<Program> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: std::vec::IntoIter<SpannedToken>,
    current: SpannedToken,
    previous: SpannedToken,
}

impl Parser {
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        let dummy = SpannedToken::new(Token::new("EndOfFile", TokenKind::EndOfFile), Span::default());

        let mut tokens = tokens.into_iter();
        let current = tokens.next().unwrap_or_else(|| dummy.clone());

        Parser {
            tokens,
            current,
            previous: dummy,
        }
    }

    /// Advances the stream. The terminal EndOfFile token is sticky.
    fn bump(&mut self) {
        let next = match self.tokens.next() {
            Some(t) => t,
            None => self.current.clone(),
        };
        self.previous = std::mem::replace(&mut self.current, next);
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.token.kind == kind
    }

    /// Checks whether or not the current token matches the given kind.
    /// If true consume it and return true, else return false.
    fn check_consume(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            return true;
        }
        false
    }

    /// Consumes a token, erroring unless it has the expected kind.
    fn consume(&mut self, kind: TokenKind) -> ParserResult<Token> {
        self.bump();

        if self.previous.token.kind == kind {
            Ok(self.previous.token.clone())
        } else {
            Err(ParserError::new(
                self.previous.span,
                ParserErrorKind::ExpectedToken(kind, self.previous.token.clone()),
            ))
        }
    }

    /// Parses the program as a statement list running up to EndOfFile.
    pub fn parse(mut self) -> ParserResult<Program> {
        let mut body = vec![];

        while !self.check(TokenKind::EndOfFile) {
            body.push(self.parse_stmt()?);
        }

        Ok(Program { body })
    }

    fn parse_stmt(&mut self) -> ParserResult<Stmt> {
        match self.current.token.kind {
            TokenKind::Let | TokenKind::Const => self.parse_var_declaration(),
            TokenKind::Fn => self.parse_function_declaration(),
            TokenKind::For => self.parse_for_statement(),
            _ => {
                let curr_span = self.current.span;
                let expr = self.parse_expr()?;
                self.check_consume(TokenKind::Semicolon);
                let span = curr_span.extend(self.previous.span);
                Ok(Stmt::new(StmtType::Expression(expr), span))
            }
        }
    }

    fn parse_var_declaration(&mut self) -> ParserResult<Stmt> {
        let curr_span = self.current.span;
        self.bump();
        let constant = self.previous.token.kind == TokenKind::Const;

        let identifier = self.consume(TokenKind::Identifier)?.value;

        if self.check_consume(TokenKind::Semicolon) {
            if constant {
                return Err(ParserError::new(
                    self.previous.span,
                    ParserErrorKind::ConstWithoutValue(identifier),
                ));
            }
            return Ok(Stmt::new(
                StmtType::VarDeclaration {
                    identifier,
                    constant: false,
                    value: None,
                },
                curr_span.extend(self.previous.span),
            ));
        }

        self.consume(TokenKind::Equals)?;
        let value = self.parse_expr()?;
        self.consume(TokenKind::Semicolon)?;

        Ok(Stmt::new(
            StmtType::VarDeclaration {
                identifier,
                constant,
                value: Some(value),
            },
            curr_span.extend(self.previous.span),
        ))
    }

    fn parse_function_declaration(&mut self) -> ParserResult<Stmt> {
        let curr_span = self.current.span;
        self.bump();

        let name = self.consume(TokenKind::Identifier)?.value;

        // A parameter list lexes like an argument list; each entry must
        // come out as a bare identifier.
        let args = self.parse_args()?;
        let mut parameters = vec![];
        for arg in args {
            match arg.expr {
                ExprType::Identifier(symbol) => parameters.push(symbol),
                _ => {
                    return Err(ParserError::new(
                        arg.span,
                        ParserErrorKind::ExpectedIdentifier,
                    ))
                }
            }
        }

        self.consume(TokenKind::OpenBrace)?;
        let body = self.parse_brace_body()?;
        let span = curr_span.extend(self.previous.span);

        Ok(Stmt::new(
            StmtType::FunctionDeclaration(FuncInfo {
                name,
                parameters,
                body,
            }),
            span,
        ))
    }

    fn parse_for_statement(&mut self) -> ParserResult<Stmt> {
        let curr_span = self.current.span;
        self.bump();
        self.consume(TokenKind::OpenParen)?;

        // The init clause is either a full variable declaration (which
        // eats its own semicolon) or an expression statement.
        let init = if self.check(TokenKind::Let) || self.check(TokenKind::Const) {
            self.parse_var_declaration()?
        } else {
            let init_span = self.current.span;
            let expr = self.parse_expr()?;
            self.consume(TokenKind::Semicolon)?;
            Stmt::new(
                StmtType::Expression(expr),
                init_span.extend(self.previous.span),
            )
        };

        let test = self.parse_expr()?;
        self.consume(TokenKind::Semicolon)?;
        let update = self.parse_expr()?;
        self.consume(TokenKind::CloseParen)?;

        self.consume(TokenKind::OpenBrace)?;
        let body = self.parse_brace_body()?;

        Ok(Stmt::new(
            StmtType::For {
                init: Box::new(init),
                test,
                update,
                body,
            },
            curr_span.extend(self.previous.span),
        ))
    }

    /// Statements up to the matching `}`, which is consumed.
    fn parse_brace_body(&mut self) -> ParserResult<Vec<Stmt>> {
        let mut body = vec![];
        while !self.check(TokenKind::EndOfFile) && !self.check(TokenKind::CloseBrace) {
            body.push(self.parse_stmt()?);
        }
        self.consume(TokenKind::CloseBrace)?;
        Ok(body)
    }

    fn parse_expr(&mut self) -> ParserResult<Expr> {
        self.parse_assignment_expr()
    }

    /// Assignment is right-associative and accepts any left-hand
    /// expression; validity of the target is a runtime concern.
    fn parse_assignment_expr(&mut self) -> ParserResult<Expr> {
        let assignee = self.parse_object_expr()?;

        if self.check_consume(TokenKind::Equals) {
            let value = self.parse_assignment_expr()?;
            let span = assignee.span.extend(value.span);
            return Ok(Expr::new(
                ExprType::Assignment(Box::new(assignee), Box::new(value)),
                span,
            ));
        }

        Ok(assignee)
    }

    /// Object and array literals sit between assignment and the binary
    /// operator tiers.
    fn parse_object_expr(&mut self) -> ParserResult<Expr> {
        if self.check(TokenKind::OpenBracket) {
            return self.parse_array_expr();
        }
        if !self.check(TokenKind::OpenBrace) {
            return self.parse_additive_expr();
        }

        let curr_span = self.current.span;
        self.bump();

        let mut properties = vec![];
        while !self.check(TokenKind::EndOfFile) && !self.check(TokenKind::CloseBrace) {
            let key = self.consume(TokenKind::Identifier)?.value;

            // `{ key, ... }` and `{ key }` are shorthand entries.
            if self.check_consume(TokenKind::Comma) {
                properties.push(Property { key, value: None });
                continue;
            }
            if self.check(TokenKind::CloseBrace) {
                properties.push(Property { key, value: None });
                continue;
            }

            self.consume(TokenKind::Colon)?;
            let value = self.parse_expr()?;
            properties.push(Property {
                key,
                value: Some(value),
            });

            if !self.check(TokenKind::CloseBrace) {
                self.consume(TokenKind::Comma)?;
            }
        }

        self.consume(TokenKind::CloseBrace)?;
        Ok(Expr::new(
            ExprType::ObjectLiteral(properties),
            curr_span.extend(self.previous.span),
        ))
    }

    fn parse_array_expr(&mut self) -> ParserResult<Expr> {
        let curr_span = self.current.span;
        self.bump();

        let mut elements = vec![];
        while !self.check(TokenKind::EndOfFile) && !self.check(TokenKind::CloseBracket) {
            elements.push(self.parse_expr()?);

            if !self.check(TokenKind::CloseBracket) {
                self.consume(TokenKind::Comma)?;
            }
        }

        self.consume(TokenKind::CloseBracket)?;
        Ok(Expr::new(
            ExprType::ArrayLiteral(elements),
            curr_span.extend(self.previous.span),
        ))
    }

    /// One flat left-associative tier holding `+ - > < <= >=`. The
    /// comparison operators deliberately share the additive level.
    fn parse_additive_expr(&mut self) -> ParserResult<Expr> {
        let mut lhs = self.parse_multiplicative_expr()?;

        while let Some(op) = self.peek_binary_op().filter(BinaryOp::in_additive_tier) {
            self.bump();
            let rhs = self.parse_multiplicative_expr()?;
            let span = lhs.span.extend(rhs.span);
            lhs = Expr::new(ExprType::Binary(op, Box::new(lhs), Box::new(rhs)), span);
        }

        Ok(lhs)
    }

    fn parse_multiplicative_expr(&mut self) -> ParserResult<Expr> {
        let mut lhs = self.parse_call_member_expr()?;

        while let Some(op) = self.peek_binary_op().filter(BinaryOp::in_multiplicative_tier) {
            self.bump();
            let rhs = self.parse_call_member_expr()?;
            let span = lhs.span.extend(rhs.span);
            lhs = Expr::new(ExprType::Binary(op, Box::new(lhs), Box::new(rhs)), span);
        }

        Ok(lhs)
    }

    fn peek_binary_op(&self) -> Option<BinaryOp> {
        if self.current.token.kind != TokenKind::BinaryOperator {
            return None;
        }
        BinaryOp::from_symbol(&self.current.token.value)
    }

    fn parse_call_member_expr(&mut self) -> ParserResult<Expr> {
        let member = self.parse_member_expr()?;

        if self.check(TokenKind::OpenParen) {
            return self.parse_call_expr(member);
        }

        Ok(member)
    }

    fn parse_call_expr(&mut self, caller: Expr) -> ParserResult<Expr> {
        let args = self.parse_args()?;
        let span = caller.span.extend(self.previous.span);
        let call = Expr::new(ExprType::Call(Box::new(caller), args), span);

        // A call result can be invoked again: f()().
        if self.check(TokenKind::OpenParen) {
            return self.parse_call_expr(call);
        }

        Ok(call)
    }

    fn parse_args(&mut self) -> ParserResult<Vec<Expr>> {
        self.consume(TokenKind::OpenParen)?;

        let mut args = vec![];
        if !self.check(TokenKind::CloseParen) {
            args.push(self.parse_expr()?);
            while self.check_consume(TokenKind::Comma) {
                args.push(self.parse_expr()?);
            }
        }

        self.consume(TokenKind::CloseParen)?;
        Ok(args)
    }

    fn parse_member_expr(&mut self) -> ParserResult<Expr> {
        let mut object = self.parse_primary_expr()?;

        while self.check(TokenKind::Dot) || self.check(TokenKind::OpenBracket) {
            let computed = self.check(TokenKind::OpenBracket);
            self.bump();

            let property = if computed {
                let property = self.parse_expr()?;
                self.consume(TokenKind::CloseBracket)?;
                property
            } else {
                // Dot access requires a bare identifier on the right.
                let property = self.parse_primary_expr()?;
                if !matches!(property.expr, ExprType::Identifier(_)) {
                    return Err(ParserError::new(
                        property.span,
                        ParserErrorKind::ExpectedIdentifier,
                    ));
                }
                property
            };

            let span = object.span.extend(self.previous.span);
            object = Expr::new(
                ExprType::Member {
                    object: Box::new(object),
                    property: Box::new(property),
                    computed,
                },
                span,
            );
        }

        self.parse_update_expr(object)
    }

    /// Postfix `++`/`--`, not applicable to string, number or call
    /// operands.
    fn parse_update_expr(&mut self, arg: Expr) -> ParserResult<Expr> {
        if matches!(
            arg.expr,
            ExprType::StringLiteral(_) | ExprType::NumberLiteral(_) | ExprType::Call(..)
        ) {
            return Ok(arg);
        }

        let op = match UpdateOp::from_symbol(&self.current.token.value) {
            Some(op) if self.current.token.kind == TokenKind::BinaryOperator => op,
            _ => return Ok(arg),
        };
        self.bump();

        let span = arg.span.extend(self.previous.span);
        Ok(Expr::new(ExprType::Update(op, Box::new(arg)), span))
    }

    fn parse_primary_expr(&mut self) -> ParserResult<Expr> {
        match self.current.token.kind {
            TokenKind::Identifier => {
                self.bump();
                Ok(Expr::new(
                    ExprType::Identifier(self.previous.token.value.clone()),
                    self.previous.span,
                ))
            }
            TokenKind::Number => {
                self.bump();
                match self.previous.token.value.parse::<f64>() {
                    Ok(n) => Ok(Expr::new(ExprType::NumberLiteral(n), self.previous.span)),
                    Err(_) => Err(ParserError::new(
                        self.previous.span,
                        ParserErrorKind::ExpectedExpr(self.previous.token.clone()),
                    )),
                }
            }
            TokenKind::DoubleQuote => {
                let curr_span = self.current.span;
                self.bump();
                let value = self.parse_string()?;
                Ok(Expr::new(
                    ExprType::StringLiteral(value),
                    curr_span.extend(self.previous.span),
                ))
            }
            TokenKind::OpenParen => {
                self.bump();
                let expr = self.parse_expr()?;
                self.consume(TokenKind::CloseParen)?;
                Ok(expr)
            }
            _ => Err(ParserError::new(
                self.current.span,
                ParserErrorKind::ExpectedExpr(self.current.token.clone()),
            )),
        }
    }

    /// Reassembles the raw token values up to the closing quote. The
    /// lexer has already discarded whitespace, so none survives here.
    fn parse_string(&mut self) -> ParserResult<String> {
        let mut value = String::new();

        while !self.check(TokenKind::DoubleQuote) {
            if self.check(TokenKind::EndOfFile) {
                return Err(ParserError::new(
                    self.current.span,
                    ParserErrorKind::ExpectedToken(
                        TokenKind::DoubleQuote,
                        self.current.token.clone(),
                    ),
                ));
            }
            self.bump();
            value.push_str(&self.previous.token.value);
        }

        self.bump();
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_single_expr(source: &str) -> Expr {
        let program = parse(source).unwrap();
        assert_eq!(program.body.len(), 1);
        match program.body.into_iter().next().unwrap().stmt {
            StmtType::Expression(expr) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn binary_shape(expr: &Expr) -> String {
        expr.source_string()
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        let expr = parse_single_expr("3 + 99 * 20 - 5");
        assert_eq!(binary_shape(&expr), "((3 + (99 * 20)) - 5)");
    }

    #[test]
    fn test_flat_comparison_tier() {
        // Comparisons share the additive tier and fold left with it,
        // so `<` does not bind looser than `+`.
        let expr = parse_single_expr("1 < 2 + 3");
        assert_eq!(binary_shape(&expr), "((1 < 2) + 3)");

        let expr = parse_single_expr("1 + 2 < 3");
        assert_eq!(binary_shape(&expr), "((1 + 2) < 3)");

        let expr = parse_single_expr("1 + 2 * 3 < 4");
        assert_eq!(binary_shape(&expr), "((1 + (2 * 3)) < 4)");
    }

    #[test]
    fn test_member_chains_fold_left() {
        let expr = parse_single_expr("a.b.c");
        assert_eq!(binary_shape(&expr), "a.b.c");
        match &expr.expr {
            ExprType::Member {
                object, computed, ..
            } => {
                assert!(!computed);
                assert!(matches!(object.expr, ExprType::Member { .. }));
            }
            other => panic!("expected member expression, got {:?}", other),
        }
    }

    #[test]
    fn test_computed_member_takes_any_key() {
        let expr = parse_single_expr("items[i + 1]");
        match &expr.expr {
            ExprType::Member {
                property, computed, ..
            } => {
                assert!(computed);
                assert!(matches!(property.expr, ExprType::Binary(..)));
            }
            other => panic!("expected member expression, got {:?}", other),
        }
    }

    #[test]
    fn test_dot_requires_identifier() {
        let err = parse("a.1;").unwrap_err();
        assert_eq!(err.kind, ParserErrorKind::ExpectedIdentifier);
    }

    #[test]
    fn test_string_reassembly() {
        let expr = parse_single_expr("\"hello world\"");
        // Whitespace is lost between the quotes; the raw token values
        // are concatenated.
        assert_eq!(expr.expr, ExprType::StringLiteral("helloworld".to_string()));
    }

    #[test]
    fn test_assignment_right_associative() {
        let expr = parse_single_expr("a = b = 1");
        match &expr.expr {
            ExprType::Assignment(assignee, value) => {
                assert!(matches!(assignee.expr, ExprType::Identifier(_)));
                assert!(matches!(value.expr, ExprType::Assignment(..)));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_object_literal_shorthand() {
        let expr = parse_single_expr("{ x: 1, y }");
        match &expr.expr {
            ExprType::ObjectLiteral(properties) => {
                assert_eq!(properties.len(), 2);
                assert!(properties[0].value.is_some());
                assert_eq!(properties[1].key, "y");
                assert!(properties[1].value.is_none());
            }
            other => panic!("expected object literal, got {:?}", other),
        }
    }

    #[test]
    fn test_update_not_after_literal() {
        // `1++` leaves the `++` unconsumed, which then fails as the
        // start of the next statement.
        assert!(parse("1++;").is_err());

        let expr = parse_single_expr("i++");
        assert!(matches!(
            expr.expr,
            ExprType::Update(UpdateOp::Increment, _)
        ));
    }

    #[test]
    fn test_const_requires_value() {
        let err = parse("const x;").unwrap_err();
        assert_eq!(
            err.kind,
            ParserErrorKind::ConstWithoutValue("x".to_string())
        );
    }

    #[test]
    fn test_for_statement_clauses() {
        let program = parse("for (let i = 0; i < 3; i++) { print(i); }").unwrap();
        match &program.body[0].stmt {
            StmtType::For {
                init, test, update, body,
            } => {
                assert!(matches!(init.stmt, StmtType::VarDeclaration { .. }));
                assert!(matches!(test.expr, ExprType::Binary(BinaryOp::LessThan, ..)));
                assert!(matches!(update.expr, ExprType::Update(..)));
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected for statement, got {:?}", other),
        }
    }

    #[test]
    fn test_source_round_trip() {
        let sources = [
            "let x = 1 + 2 * 3;",
            "const obj = { a: 1, b };",
            "fn add(a, b) { a + b; }",
            "for (let i = 0; i < 3; i++) { print(i); }",
            "items[0].name = \"alice\";",
            "let xs = [1, 2, [3]];",
            "counter++;",
        ];

        for source in sources {
            let first = parse(source).unwrap().source_string();
            let second = parse(&first).unwrap().source_string();
            assert_eq!(first, second, "round trip diverged for `{}`", source);
        }
    }

    #[test]
    fn test_missing_token_reports_expected_kind() {
        let err = parse("let x 5;").unwrap_err();
        match err.kind {
            ParserErrorKind::ExpectedToken(expected, found) => {
                assert_eq!(expected, TokenKind::Equals);
                assert_eq!(found.kind, TokenKind::Number);
            }
            other => panic!("expected ExpectedToken error, got {:?}", other),
        }
    }
}
