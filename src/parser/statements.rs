/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     parser/statements.rs
 * Purpose:  Statement-level parsing logic.
 *
 * Every statement form of the language: declarations and assignments,
 * function declarations, control flow (if / while / until / for / switch),
 * imports, and the reactive signal / emit / when / watch blocks.
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

use crate::ast::{
    BinaryOp, Expr, ExprKind, FunctionDecl, Param, Stmt, StmtKind, SwitchCase,
};
use crate::error::{MuniError, MuniResult};
use crate::lexer::token::TokenKind;
use crate::parser::parser::Parser;
use crate::span::Span;
use crate::types::TypeSpec;

impl Parser {
    /// Parses a single statement.
    ///
    /// Keyword-led forms dispatch on the keyword. A leading type specifier
    /// followed by an identifier is a declaration, or a function
    /// declaration when `(` comes next. Everything else is an assignment or
    /// an expression statement.
    pub fn statement(&mut self) -> MuniResult<Stmt> {
        let span = self.peek().span;
        let keyword = match self.peek().kind {
            TokenKind::Keyword => self.peek().lexeme.clone(),
            _ => String::new(),
        };

        if !keyword.is_empty() {
            match keyword.as_str() {
                "if" => return self.if_statement(),
                "while" => return self.loop_statement(true),
                "until" => return self.loop_statement(false),
                "for" => return self.for_statement(),
                "switch" => return self.switch_statement(),
                "return" => return self.return_statement(),
                "throw" => {
                    self.advance();
                    let value = self.expression()?;
                    self.consume(";", "after throw value")?;
                    return Ok(Stmt::new(StmtKind::Throw(value), span));
                }
                "import" => return self.import_statement(),
                "signal" | "emit" => return self.signal_statement(),
                "when" | "watch" => return self.handler_statement(),
                "break" => {
                    return Err(MuniError::syntax_error(
                        "'break' is only allowed inside a switch case",
                        span,
                    ))
                }
                _ => {}
            }
        }

        // -------------------------------------------------------------
        // FUNCTION: type name(params) { body }
        // -------------------------------------------------------------
        if self.type_starts_at(0) {
            let checkpoint = self.current;
            let return_type = self.type_spec()?;

            if self.peek().kind == TokenKind::Identifier && self.peek_at(1).is("(") {
                return self.function_declaration(return_type, span);
            }

            self.current = checkpoint;
        }

        let stmt = self.simple_statement()?;
        self.consume(";", "after statement")?;
        Ok(stmt)
    }

    /// Declaration, assignment or expression, without the trailing `;`.
    /// Also used for the init and step clauses of a `for` header.
    pub(crate) fn simple_statement(&mut self) -> MuniResult<Stmt> {
        let span = self.peek().span;

        if self.type_starts_at(0) {
            let checkpoint = self.current;
            let type_spec = self.type_spec()?;

            if self.peek().kind == TokenKind::Identifier {
                let name = self.advance().lexeme;
                let value = if self.match_text("=") {
                    Some(self.expression()?)
                } else {
                    None
                };

                return Ok(Stmt::new(
                    StmtKind::Declaration {
                        type_spec,
                        name,
                        value,
                    },
                    span,
                ));
            }

            // `int -> x;` and friends are casts, not declarations.
            self.current = checkpoint;
        }

        self.assignment_or_expression(span)
    }

    fn assignment_or_expression(&mut self, span: Span) -> MuniResult<Stmt> {
        let expr = self.expression()?;

        let Some(op) = self.match_any(&["=", "+=", "-=", "*=", "/=", "%="]) else {
            return Ok(Stmt::new(StmtKind::Expression(expr), span));
        };

        let value = self.expression()?;

        let kind = match (op.lexeme.as_str(), expr.kind) {
            ("=", ExprKind::Variable(name)) => StmtKind::Assignment { name, value },
            ("=", ExprKind::Index { target, index }) => StmtKind::ElementAssignment {
                target: *target,
                index: *index,
                value,
            },
            (symbol, ExprKind::Variable(name)) => StmtKind::CompoundAssignment {
                name,
                op: BinaryOp::from_symbol(symbol).map_err(|e| e.or_at(op.span))?,
                value,
            },
            // xs[i] op= v  ==>  xs[i] = xs[i] op v
            (symbol, ExprKind::Index { target, index }) => {
                let bin_op = BinaryOp::from_symbol(symbol).map_err(|e| e.or_at(op.span))?;
                let current = Expr::new(
                    ExprKind::Index {
                        target: target.clone(),
                        index: index.clone(),
                    },
                    expr.span,
                );
                StmtKind::ElementAssignment {
                    target: *target,
                    index: *index,
                    value: Expr::new(
                        ExprKind::Binary {
                            left: Box::new(current),
                            op: bin_op,
                            right: Box::new(value),
                        },
                        op.span,
                    ),
                }
            }
            _ => {
                return Err(MuniError::syntax_error(
                    format!("invalid assignment target for '{}'", op.lexeme),
                    op.span,
                ))
            }
        };

        Ok(Stmt::new(kind, span))
    }

    /* ----------------------------- */
    /* FUNCTIONS                     */
    /* ----------------------------- */

    fn function_declaration(&mut self, return_type: TypeSpec, span: Span) -> MuniResult<Stmt> {
        let name = self.consume_identifier("for function name")?;
        self.consume("(", "after function name")?;

        let mut params = Vec::new();
        if !self.check(")") {
            loop {
                let type_spec = self.type_spec()?;
                let param_name = self.consume_identifier("for parameter name")?;
                params.push(Param::new(type_spec, param_name));

                if !self.match_text(",") {
                    break;
                }
            }
        }
        self.consume(")", "after parameters")?;

        let body = self.block()?;

        Ok(Stmt::new(
            StmtKind::Function(FunctionDecl {
                name,
                return_type,
                params,
                body,
                span,
                module_alias: None,
            }),
            span,
        ))
    }

    fn return_statement(&mut self) -> MuniResult<Stmt> {
        let span = self.advance().span;

        if self.match_text(";") {
            return Ok(Stmt::new(StmtKind::Return(None), span));
        }

        let value = self.expression()?;
        self.consume(";", "after return value")?;
        Ok(Stmt::new(StmtKind::Return(Some(value)), span))
    }

    /* ----------------------------- */
    /* CONTROL FLOW                  */
    /* ----------------------------- */

    /// `{ statement* }`
    pub(crate) fn block(&mut self) -> MuniResult<Vec<Stmt>> {
        self.consume("{", "to open block")?;

        let mut stmts = Vec::new();
        while !self.check("}") && !self.is_at_end() {
            stmts.push(self.statement()?);
        }

        self.consume("}", "to close block")?;
        Ok(stmts)
    }

    /// `( expression )`
    fn parenthesized(&mut self, context: &str) -> MuniResult<Expr> {
        self.consume("(", context)?;
        let expr = self.expression()?;
        self.consume(")", context)?;
        Ok(expr)
    }

    fn if_statement(&mut self) -> MuniResult<Stmt> {
        let span = self.advance().span;
        let condition = self.parenthesized("around if condition")?;
        let then_branch = self.block()?;

        let else_branch = if self.match_text("else") {
            if self.check("if") {
                Some(vec![self.if_statement()?])
            } else {
                Some(self.block()?)
            }
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// `while (c)[: N] { }` and `until (c)[: N] { }`.
    fn loop_statement(&mut self, is_while: bool) -> MuniResult<Stmt> {
        let span = self.advance().span;
        let condition = self.parenthesized("around loop condition")?;

        let preroll = if self.match_text(":") {
            let token = self.peek().clone();
            let count = match token.kind {
                TokenKind::Number => token.lexeme.parse::<u32>().ok(),
                _ => None,
            };
            match count {
                Some(count) => {
                    self.advance();
                    count
                }
                None => return Err(self.error_here("expected preroll count after ':'")),
            }
        } else {
            0
        };

        let body = self.block()?;

        let kind = if is_while {
            StmtKind::While {
                condition,
                body,
                preroll,
            }
        } else {
            StmtKind::Until {
                condition,
                body,
                preroll,
            }
        };

        Ok(Stmt::new(kind, span))
    }

    /// `for (init; cond; step) { }` or `for (T x in iterable) { }`.
    fn for_statement(&mut self) -> MuniResult<Stmt> {
        let span = self.advance().span;
        self.consume("(", "after 'for'")?;

        if let Some((type_spec, name)) = self.for_in_header()? {
            let iterable = self.expression()?;
            self.consume(")", "after for-in iterable")?;
            let body = self.block()?;

            return Ok(Stmt::new(
                StmtKind::ForIn {
                    type_spec,
                    name,
                    iterable,
                    body,
                },
                span,
            ));
        }

        let init = self.simple_statement()?;
        self.consume(";", "after for initializer")?;
        let condition = self.expression()?;
        self.consume(";", "after for condition")?;
        let step = self.simple_statement()?;
        self.match_text(";");
        self.consume(")", "after for clauses")?;
        let body = self.block()?;

        Ok(Stmt::new(
            StmtKind::For {
                init: Box::new(init),
                condition,
                step: Box::new(step),
                body,
            },
            span,
        ))
    }

    /// Consumes `[T] name in` when the header is a for-in loop.
    fn for_in_header(&mut self) -> MuniResult<Option<(TypeSpec, String)>> {
        let checkpoint = self.current;

        let type_spec = if self.type_starts_at(0) {
            self.type_spec()?
        } else {
            TypeSpec::Untyped
        };

        if self.peek().kind == TokenKind::Identifier && self.peek_at(1).is("in") {
            let name = self.advance().lexeme;
            self.advance();
            return Ok(Some((type_spec, name)));
        }

        self.current = checkpoint;
        Ok(None)
    }

    /// `switch (e) { case v: ... break; default: ... }`
    fn switch_statement(&mut self) -> MuniResult<Stmt> {
        let span = self.advance().span;
        let subject = self.parenthesized("around switch subject")?;
        self.consume("{", "to open switch body")?;

        let mut cases = Vec::new();
        let mut default = None;

        loop {
            if let Some(case) = self.match_any(&["case"]) {
                let value = self.case_label()?;
                self.consume(":", "after case value")?;
                let body = self.case_body()?;
                cases.push(SwitchCase {
                    value,
                    body,
                    span: case.span,
                });
            } else if let Some(token) = self.match_any(&["default"]) {
                if default.is_some() {
                    return Err(MuniError::syntax_error(
                        "switch has more than one default case",
                        token.span,
                    ));
                }
                self.consume(":", "after 'default'")?;
                default = Some(self.case_body()?);
            } else if self.check("}") {
                break;
            } else {
                return Err(self.error_here("expected 'case', 'default' or '}' in switch"));
            }
        }

        self.consume("}", "to close switch body")?;

        Ok(Stmt::new(
            StmtKind::Switch {
                subject,
                cases,
                default,
            },
            span,
        ))
    }

    fn case_label(&mut self) -> MuniResult<Expr> {
        let saved = self.allow_range_step;
        self.allow_range_step = false;
        let value = self.expression();
        self.allow_range_step = saved;
        value
    }

    /// Statements up to `break;` or the next case label.
    fn case_body(&mut self) -> MuniResult<Vec<Stmt>> {
        let mut body = Vec::new();

        while !self.check("case") && !self.check("default") && !self.check("}") {
            if self.is_at_end() {
                return Err(self.error_here("expected '}' to close switch body"));
            }
            if self.match_text("break") {
                self.consume(";", "after 'break'")?;
                break;
            }
            body.push(self.statement()?);
        }

        Ok(body)
    }

    /* ----------------------------- */
    /* MODULES & REACTIVE            */
    /* ----------------------------- */

    /// `import <path> [as alias];` or `import "path" [as alias];`
    fn import_statement(&mut self) -> MuniResult<Stmt> {
        let span = self.advance().span;

        let path = match self.peek().kind {
            TokenKind::ImportPath | TokenKind::String => self.advance().lexeme,
            _ => return Err(self.error_here("expected import path")),
        };

        let alias = if self.match_text("as") {
            Some(self.consume_identifier("after 'as'")?)
        } else {
            None
        };

        self.consume(";", "after import")?;
        Ok(Stmt::new(StmtKind::Import { path, alias }, span))
    }

    /// `signal name;` and `emit name;`
    fn signal_statement(&mut self) -> MuniResult<Stmt> {
        let keyword = self.advance();
        let name = self.consume_identifier(&format!("after '{}'", keyword.lexeme))?;
        self.consume(";", "after signal name")?;

        let kind = if keyword.lexeme == "signal" {
            StmtKind::Signal(name)
        } else {
            StmtKind::Emit(name)
        };

        Ok(Stmt::new(kind, keyword.span))
    }

    /// `when (signal) { }` and `watch (variable) { }`; parentheses optional.
    fn handler_statement(&mut self) -> MuniResult<Stmt> {
        let keyword = self.advance();

        let parenthesized = self.match_text("(");
        let name = self.consume_identifier(&format!("after '{}'", keyword.lexeme))?;
        if parenthesized {
            self.consume(")", "after name")?;
        }

        let body = self.block()?;

        let kind = if keyword.lexeme == "when" {
            StmtKind::When { signal: name, body }
        } else {
            StmtKind::Watch {
                variable: name,
                body,
            }
        };

        Ok(Stmt::new(kind, keyword.span))
    }
}
