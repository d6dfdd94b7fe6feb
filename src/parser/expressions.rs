/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     parser/expressions.rs
 * Purpose:  Expression grammar and operator precedence.
 *
 * Operator precedence, loosest to tightest:
 *   | ^          logical or / xor
 *   &            logical and
 *   == !=        equality
 *   < <= > >=    comparison
 *   .. ...       ranges, with optional :step
 *   + -          term
 *   * / %        factor
 *   ! - T ->     unary and cast
 *   e[i]         postfix indexing
 *   primary      literals, variables, calls, groups, lists, dicts
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

use crate::ast::{BinaryOp, CompareOp, Expr, ExprKind, Literal, LogicalOp, UnaryOp};
use crate::error::{MuniError, MuniResult};
use crate::lexer::token::{Token, TokenKind};
use crate::parser::parser::Parser;

impl Parser {
    /// Entry point for expression parsing.
    pub fn expression(&mut self) -> MuniResult<Expr> {
        self.logical_or()
    }

    fn logical_or(&mut self) -> MuniResult<Expr> {
        let mut expr = self.logical_and()?;

        while let Some(op) = self.match_any(&["|", "^"]) {
            let right = self.logical_and()?;
            expr = logical(expr, &op, right)?;
        }

        Ok(expr)
    }

    fn logical_and(&mut self) -> MuniResult<Expr> {
        let mut expr = self.equality()?;

        while let Some(op) = self.match_any(&["&"]) {
            let right = self.equality()?;
            expr = logical(expr, &op, right)?;
        }

        Ok(expr)
    }

    fn equality(&mut self) -> MuniResult<Expr> {
        let mut expr = self.comparison()?;

        while let Some(op) = self.match_any(&["==", "!="]) {
            let right = self.comparison()?;
            expr = comparison(expr, &op, right)?;
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> MuniResult<Expr> {
        let mut expr = self.range()?;

        while let Some(op) = self.match_any(&["<", "<=", ">", ">="]) {
            let right = self.range()?;
            expr = comparison(expr, &op, right)?;
        }

        Ok(expr)
    }

    /// `a..b`, `a...b`, each with an optional `:step`.
    fn range(&mut self) -> MuniResult<Expr> {
        let start = self.term()?;

        let Some(op) = self.match_any(&["..", "..."]) else {
            return Ok(start);
        };

        let end = self.term()?;
        let step = if self.allow_range_step && self.match_text(":") {
            Some(Box::new(self.term()?))
        } else {
            None
        };

        Ok(Expr::new(
            ExprKind::Range {
                start: Box::new(start),
                end: Box::new(end),
                step,
                inclusive: op.lexeme == "...",
            },
            op.span,
        ))
    }

    fn term(&mut self) -> MuniResult<Expr> {
        let mut expr = self.factor()?;

        while let Some(op) = self.match_any(&["+", "-"]) {
            let right = self.factor()?;
            expr = binary(expr, &op, right)?;
        }

        Ok(expr)
    }

    fn factor(&mut self) -> MuniResult<Expr> {
        let mut expr = self.unary()?;

        while let Some(op) = self.match_any(&["*", "/", "%"]) {
            let right = self.unary()?;
            expr = binary(expr, &op, right)?;
        }

        Ok(expr)
    }

    /// `!e`, `-e`, and casts `T -> e`.
    fn unary(&mut self) -> MuniResult<Expr> {
        if let Some(op) = self.match_any(&["!", "-"]) {
            let operand = self.unary()?;
            let op_kind = if op.lexeme == "!" {
                UnaryOp::Not
            } else {
                UnaryOp::Negate
            };

            return Ok(Expr::new(
                ExprKind::Unary {
                    op: op_kind,
                    operand: Box::new(operand),
                },
                op.span,
            ));
        }

        if self.type_starts_at(0) {
            let span = self.peek().span;
            let target = self.type_spec()?;
            self.consume("->", "after cast type")?;
            let expression = self.unary()?;

            return Ok(Expr::new(
                ExprKind::Cast {
                    target,
                    expression: Box::new(expression),
                },
                span,
            ));
        }

        self.postfix()
    }

    /// Indexing: `e[i][j]`.
    fn postfix(&mut self) -> MuniResult<Expr> {
        let mut expr = self.primary()?;

        while let Some(bracket) = self.match_any(&["["]) {
            let index = self.expression()?;
            self.consume("]", "after index")?;

            expr = Expr::new(
                ExprKind::Index {
                    target: Box::new(expr),
                    index: Box::new(index),
                },
                bracket.span,
            );
        }

        Ok(expr)
    }

    fn primary(&mut self) -> MuniResult<Expr> {
        let token = self.peek().clone();
        let span = token.span;

        let kind = match token.kind {
            TokenKind::Number => {
                self.advance();
                ExprKind::Literal(number_literal(&token)?)
            }
            TokenKind::Imaginary => {
                self.advance();
                let value = token.lexeme.parse::<f64>().map_err(|_| {
                    MuniError::syntax_error(format!("invalid imaginary literal '{}'", token), span)
                })?;
                ExprKind::Literal(Literal::Imaginary(value))
            }
            TokenKind::String => {
                self.advance();
                ExprKind::Literal(Literal::Str(token.lexeme))
            }
            TokenKind::Keyword if token.lexeme == "true" || token.lexeme == "false" => {
                self.advance();
                ExprKind::Literal(Literal::Boolean(token.lexeme == "true"))
            }
            TokenKind::Identifier => {
                self.advance();
                if self.match_text("(") {
                    let arguments = self.arguments()?;
                    ExprKind::Call {
                        name: token.lexeme,
                        arguments,
                    }
                } else {
                    ExprKind::Variable(token.lexeme)
                }
            }
            TokenKind::Symbol if token.lexeme == "(" => {
                self.advance();
                let inner = self.expression()?;
                self.consume(")", "to close group")?;
                return Ok(inner);
            }
            TokenKind::Symbol if token.lexeme == "[" => {
                self.advance();
                ExprKind::List(self.list_elements()?)
            }
            TokenKind::Symbol if token.lexeme == "{" => {
                self.advance();
                ExprKind::Dict(self.dict_entries()?)
            }
            _ => return Err(self.error_here("expected expression")),
        };

        Ok(Expr::new(kind, span))
    }

    /// Call arguments after the opening `(`.
    fn arguments(&mut self) -> MuniResult<Vec<Expr>> {
        let mut arguments = Vec::new();

        if !self.check(")") {
            loop {
                arguments.push(self.expression()?);
                if !self.match_text(",") {
                    break;
                }
            }
        }

        self.consume(")", "after arguments")?;
        Ok(arguments)
    }

    /// `[a, b, c]` after the opening bracket. A trailing comma is allowed.
    fn list_elements(&mut self) -> MuniResult<Vec<Expr>> {
        let mut items = Vec::new();

        while !self.check("]") {
            items.push(self.expression()?);
            if !self.match_text(",") {
                break;
            }
        }

        self.consume("]", "to close list")?;
        Ok(items)
    }

    /// `{k: v, ...}` after the opening brace. A trailing comma is allowed.
    fn dict_entries(&mut self) -> MuniResult<Vec<(Expr, Expr)>> {
        let mut entries = Vec::new();

        while !self.check("}") {
            let saved = self.allow_range_step;
            self.allow_range_step = false;
            let key = self.expression();
            self.allow_range_step = saved;
            let key = key?;

            self.consume(":", "between dict key and value")?;
            let value = self.expression()?;
            entries.push((key, value));

            if !self.match_text(",") {
                break;
            }
        }

        self.consume("}", "to close dict")?;
        Ok(entries)
    }
}

fn number_literal(token: &Token) -> MuniResult<Literal> {
    let text = token.lexeme.as_str();

    if text.contains(|c: char| matches!(c, '.' | 'e' | 'E')) {
        text.parse::<f64>()
            .map(Literal::Float)
            .map_err(|_| MuniError::syntax_error(format!("invalid number '{}'", text), token.span))
    } else {
        text.parse::<i64>().map(Literal::Int).map_err(|_| {
            MuniError::syntax_error(
                format!("integer literal '{}' is out of range", text),
                token.span,
            )
        })
    }
}

fn binary(left: Expr, op: &Token, right: Expr) -> MuniResult<Expr> {
    let op_kind = BinaryOp::from_symbol(&op.lexeme).map_err(|e| e.or_at(op.span))?;
    Ok(Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op: op_kind,
            right: Box::new(right),
        },
        op.span,
    ))
}

fn comparison(left: Expr, op: &Token, right: Expr) -> MuniResult<Expr> {
    let op_kind = CompareOp::from_symbol(&op.lexeme).map_err(|e| e.or_at(op.span))?;
    Ok(Expr::new(
        ExprKind::Comparison {
            left: Box::new(left),
            op: op_kind,
            right: Box::new(right),
        },
        op.span,
    ))
}

fn logical(left: Expr, op: &Token, right: Expr) -> MuniResult<Expr> {
    let op_kind = LogicalOp::from_symbol(&op.lexeme).map_err(|e| e.or_at(op.span))?;
    Ok(Expr::new(
        ExprKind::Logical {
            left: Box::new(left),
            op: op_kind,
            right: Box::new(right),
        },
        op.span,
    ))
}
