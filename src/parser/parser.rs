/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     parser/parser.rs
 * Purpose:  Core recursive-descent parser entry point.
 *
 * Defines the Parser cursor and the public parse() driver that turns
 * a token stream into the top-level statement list.
 *
 * Source -> Lexer -> Tokens -> Parser -> AST -> Interpreter
 *
 * --------------------------------------------------------------------------
 * Author:   Sam Wilcox
 *
 * License:
 * This file is part of the MUNI programming language project.
 *
 * MUNI is dual-licensed under the terms of:
 *   - The MIT license
 *   - The Apache License, Version 2.0
 *
 * You may choose either license to govern your use of this software.
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under these licenses is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *
 * ==========================================================================
 */

use crate::ast::Stmt;
use crate::error::MuniResult;
use crate::lexer::token::{Token, TokenKind};
use crate::span::Span;

/// The MUNI recursive-descent parser.
///
/// The grammar itself lives in the `statements`, `expressions` and
/// `helpers` modules as additional `impl Parser` blocks.
pub struct Parser {
    /// Complete token stream, always terminated by `TokenKind::Eof`.
    pub tokens: Vec<Token>,

    /// Current cursor position within the token stream.
    pub current: usize,

    /// Cleared while parsing a `case` label, where `:` ends the label
    /// instead of introducing a range step.
    pub(crate) allow_range_step: bool,
}

/// Parses a full token stream into top-level statements.
///
/// The first grammar error stops parsing and is returned as a
/// `SyntaxError` carrying the offending token's location.
pub fn parse(tokens: Vec<Token>) -> MuniResult<Vec<Stmt>> {
    Parser::new(tokens).parse()
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or(Span::new(1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", span));
        }

        Self {
            tokens,
            current: 0,
            allow_range_step: true,
        }
    }

    /// Consumes statements until end of input.
    pub fn parse(&mut self) -> MuniResult<Vec<Stmt>> {
        let mut stmts = Vec::new();

        while !self.is_at_end() {
            stmts.push(self.statement()?);
        }

        Ok(stmts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, CompareOp, Expr, ExprKind, Literal, LogicalOp, StmtKind, UnaryOp};
    use crate::error::ErrorKind;
    use crate::lexer::tokenize;
    use crate::types::TypeSpec;
    use pretty_assertions::assert_eq;

    fn parse_str(source: &str) -> Vec<Stmt> {
        parse(tokenize(source).unwrap()).unwrap()
    }

    fn parse_err(source: &str) -> crate::error::MuniError {
        parse(tokenize(source).unwrap()).unwrap_err()
    }

    fn only_expr(source: &str) -> Expr {
        match parse_str(source).remove(0).kind {
            StmtKind::Expression(expr) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    fn int(value: i64) -> ExprKind {
        ExprKind::Literal(Literal::Int(value))
    }

    #[test]
    fn declarations_with_generic_types() {
        let stmts = parse_str("dict<string, list<int>> d; ? any = 1;");

        match &stmts[0].kind {
            StmtKind::Declaration { type_spec, name, value } => {
                assert_eq!(
                    type_spec,
                    &TypeSpec::Dict(
                        Box::new(TypeSpec::String),
                        Box::new(TypeSpec::List(Box::new(TypeSpec::Int)))
                    )
                );
                assert_eq!(name, "d");
                assert!(value.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }

        assert!(matches!(
            &stmts[1].kind,
            StmtKind::Declaration { type_spec: TypeSpec::Untyped, .. }
        ));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = only_expr("1 + 2 * 3;");

        match expr.kind {
            ExprKind::Binary { left, op, right } => {
                assert_eq!(op, BinaryOp::Add);
                assert_eq!(left.kind, int(1));
                assert!(matches!(right.kind, ExprKind::Binary { op: BinaryOp::Mul, .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn logical_operators_are_loosest() {
        let expr = only_expr("a < b & !c | d;");

        match expr.kind {
            ExprKind::Logical { left, op, .. } => {
                assert_eq!(op, LogicalOp::Or);
                match left.kind {
                    ExprKind::Logical { left, op, right } => {
                        assert_eq!(op, LogicalOp::And);
                        assert!(matches!(
                            left.kind,
                            ExprKind::Comparison { op: CompareOp::Less, .. }
                        ));
                        assert!(matches!(right.kind, ExprKind::Unary { op: UnaryOp::Not, .. }));
                    }
                    other => panic!("unexpected {:?}", other),
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn casts_apply_to_unary_operand() {
        let expr = only_expr("int -> x + 1;");

        match expr.kind {
            ExprKind::Binary { left, op: BinaryOp::Add, .. } => {
                assert!(matches!(
                    left.kind,
                    ExprKind::Cast { target: TypeSpec::Int, .. }
                ));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn ranges_with_step() {
        let expr = only_expr("0...10:2;");

        match expr.kind {
            ExprKind::Range { start, end, step, inclusive } => {
                assert_eq!(start.kind, int(0));
                assert_eq!(end.kind, int(10));
                assert_eq!(step.map(|s| s.kind), Some(int(2)));
                assert!(inclusive);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn assignments_by_target_shape() {
        let stmts = parse_str("x = 1; x += 2; xs[0] = 3;");

        assert!(matches!(&stmts[0].kind, StmtKind::Assignment { name, .. } if name == "x"));
        assert!(matches!(
            &stmts[1].kind,
            StmtKind::CompoundAssignment { op: BinaryOp::Add, .. }
        ));
        assert!(matches!(&stmts[2].kind, StmtKind::ElementAssignment { .. }));
    }

    #[test]
    fn function_declaration() {
        let stmts = parse_str("int add(int a, float b) { return a + b; }");

        match &stmts[0].kind {
            StmtKind::Function(decl) => {
                assert_eq!(decl.name, "add");
                assert_eq!(decl.return_type, TypeSpec::Int);
                assert_eq!(decl.params.len(), 2);
                assert_eq!(decl.params[1].type_spec, TypeSpec::Float);
                assert!(matches!(decl.body[0].kind, StmtKind::Return(Some(_))));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn control_flow_forms() {
        let source = r#"
            while (i < 3): 2 { i += 1; }
            if (a) { x = 1; } else if (b) { x = 2; } else { x = 3; }
            for (int i = 0; i < 3; i += 1) { print(i); }
            for (string c in "abc") { print(c); }
            switch (x) {
                case 1: print("one"); break;
                case 2:
                default: print("other");
            }
        "#;
        let stmts = parse_str(source);

        assert!(matches!(&stmts[0].kind, StmtKind::While { preroll: 2, .. }));
        match &stmts[1].kind {
            StmtKind::If { else_branch: Some(branch), .. } => {
                assert!(matches!(branch[0].kind, StmtKind::If { .. }));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(&stmts[2].kind, StmtKind::For { .. }));
        assert!(matches!(
            &stmts[3].kind,
            StmtKind::ForIn { type_spec: TypeSpec::String, .. }
        ));
        match &stmts[4].kind {
            StmtKind::Switch { cases, default, .. } => {
                assert_eq!(cases.len(), 2);
                assert_eq!(cases[0].body.len(), 1);
                assert!(cases[1].body.is_empty());
                assert_eq!(default.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn reactive_and_import_statements() {
        let stmts = parse_str(
            "import <math:lib> as m; signal done; when (done) { print(1); } watch (x) { } emit done;",
        );

        assert!(matches!(
            &stmts[0].kind,
            StmtKind::Import { path, alias: Some(alias) } if path == "math:lib" && alias == "m"
        ));
        assert!(matches!(&stmts[1].kind, StmtKind::Signal(name) if name == "done"));
        assert!(matches!(&stmts[2].kind, StmtKind::When { .. }));
        assert!(matches!(&stmts[3].kind, StmtKind::Watch { variable, .. } if variable == "x"));
        assert!(matches!(&stmts[4].kind, StmtKind::Emit(name) if name == "done"));
    }

    #[test]
    fn missing_semicolon_reports_location() {
        let err = parse_err("int x = 1\nint y = 2;");
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert_eq!(err.span, Span::new(2, 1));
    }

    #[test]
    fn invalid_assignment_target() {
        let err = parse_err("1 + 2 = 3;");
        assert_eq!(err.kind, ErrorKind::SyntaxError);
        assert!(err.message.contains("assignment target"));
    }
}
