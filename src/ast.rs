/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     ast.rs
 * Purpose:  Abstract syntax tree for MUNI programs
 *
 * Syntax tree root.
 *
 * The parser produces a flat `Vec<Stmt>`; every node carries the span of
 * the token that introduced it so the evaluator can attach a location to
 * any error that passes through it. *
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

pub mod expr;
pub mod ops;
pub mod param;
pub mod stmt;

pub use expr::{Expr, ExprKind, Literal};
pub use ops::{BinaryOp, CompareOp, LogicalOp, UnaryOp};
pub use param::{FunctionDecl, Param};
pub use stmt::{Stmt, StmtKind, SwitchCase};
