/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
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

use crate::ast::ops::{BinaryOp, CompareOp, LogicalOp, UnaryOp};
use crate::span::Span;
use crate::types::TypeSpec;

/// Literal values as they appear in source.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    /// Imaginary literal `2j`, stored as its imaginary part.
    Imaginary(f64),
    Boolean(bool),
    Str(String),
}

/// An expression node together with the location it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Variable(String),

    /* ----------------------------- */
    /* OPERATORS                     */
    /* ----------------------------- */

    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `& | ^` on booleans. Both sides are always evaluated.
    Logical {
        left: Box<Expr>,
        op: LogicalOp,
        right: Box<Expr>,
    },

    Comparison {
        left: Box<Expr>,
        op: CompareOp,
        right: Box<Expr>,
    },

    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// `type -> expression`
    Cast {
        target: TypeSpec,
        expression: Box<Expr>,
    },

    /* ----------------------------- */
    /* CALLS                         */
    /* ----------------------------- */

    Call {
        name: String,
        arguments: Vec<Expr>,
    },

    /* ----------------------------- */
    /* CONTAINERS                    */
    /* ----------------------------- */

    /// `start..end[:step]` or `start...end[:step]`
    Range {
        start: Box<Expr>,
        end: Box<Expr>,
        step: Option<Box<Expr>>,
        inclusive: bool,
    },

    List(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),

    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
}
