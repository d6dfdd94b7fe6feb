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

use crate::ast::expr::Expr;
use crate::ast::ops::BinaryOp;
use crate::ast::param::FunctionDecl;
use crate::span::Span;
use crate::types::TypeSpec;

/// A statement node together with the location it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// One `case value: ...` arm of a switch.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    pub value: Expr,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// All executable MUNI statements.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /* ----------------------------- */
    /* EXPRESSIONS                   */
    /* ----------------------------- */

    Expression(Expr),

    /* ----------------------------- */
    /* VARIABLES                     */
    /* ----------------------------- */

    /// `type name [= value];`
    Declaration {
        type_spec: TypeSpec,
        name: String,
        value: Option<Expr>,
    },

    Assignment {
        name: String,
        value: Expr,
    },

    /// `name op= value;`
    CompoundAssignment {
        name: String,
        op: BinaryOp,
        value: Expr,
    },

    /// `target[index] = value;`
    ElementAssignment {
        target: Expr,
        index: Expr,
        value: Expr,
    },

    /* ----------------------------- */
    /* FUNCTIONS                     */
    /* ----------------------------- */

    Function(FunctionDecl),

    Return(Option<Expr>),

    Throw(Expr),

    /* ----------------------------- */
    /* MODULE SYSTEM                 */
    /* ----------------------------- */

    /// `import <path> [as alias];`
    Import {
        path: String,
        alias: Option<String>,
    },

    /* ----------------------------- */
    /* CONTROL FLOW                  */
    /* ----------------------------- */

    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        else_branch: Option<Vec<Stmt>>,
    },

    /// `while (cond)[: preroll] { ... }`
    While {
        condition: Expr,
        body: Vec<Stmt>,
        preroll: u32,
    },

    /// Loops while the condition is false.
    Until {
        condition: Expr,
        body: Vec<Stmt>,
        preroll: u32,
    },

    For {
        init: Box<Stmt>,
        condition: Expr,
        step: Box<Stmt>,
        body: Vec<Stmt>,
    },

    ForIn {
        type_spec: TypeSpec,
        name: String,
        iterable: Expr,
        body: Vec<Stmt>,
    },

    Switch {
        subject: Expr,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Stmt>>,
    },

    /* ----------------------------- */
    /* REACTIVE                      */
    /* ----------------------------- */

    Signal(String),
    Emit(String),

    When {
        signal: String,
        body: Vec<Stmt>,
    },

    Watch {
        variable: String,
        body: Vec<Stmt>,
    },
}
