/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     interpreter/statements.rs
 * Purpose:  Statement execution
 *
 * This module handles execution of all MUNI statements:
 *
 *  - Variable declarations and (compound / element) assignment
 *  - Function declarations, return and throw
 *  - Control flow (if, while, until, for, for-in, switch)
 *  - Imports
 *  - Signal, emit, when and watch *
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

use std::sync::Arc;

use tracing::{debug, trace};

use crate::ast::{Expr, Stmt, StmtKind, SwitchCase};
use crate::error::{MuniError, MuniResult};
use crate::interpreter::Interpreter;
use crate::types::TypeSpec;
use crate::value::Value;

/* ============================================================================
 * Execution Control Signals
 * ============================================================================
 */

/// Internal control flow signal used by the interpreter.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecSignal {
    /// Normal fall-through execution, carrying the statement's value.
    Normal(Value),

    /// Early return from a function.
    Return(Value),
}

/// Runs a body and bubbles a `Return` out of the enclosing function.
macro_rules! run_body {
    ($self:ident, $body:expr) => {
        if let ExecSignal::Return(value) = $self.exec_block($body)? {
            return Ok(ExecSignal::Return(value));
        }
    };
}

/* ============================================================================
 * Statement Execution Entry Point
 * ============================================================================
 */

impl Interpreter {
    /// Executes a single MUNI statement.
    ///
    /// A no-op once the interpreter has halted. Errors leaving here carry
    /// this statement's location unless an inner node already set one.
    pub fn exec_stmt(&mut self, stmt: &Stmt) -> MuniResult<ExecSignal> {
        if !self.is_running() {
            return Ok(ExecSignal::Normal(Value::Void));
        }

        self.ctx.current = stmt.span;
        trace!(line = stmt.span.line, handler = self.ctx.in_handler, "exec");

        self.exec_kind(&stmt.kind).map_err(|err| err.or_at(stmt.span))
    }

    /// Executes statements in order, stopping at the first `Return`.
    pub fn exec_block(&mut self, stmts: &[Stmt]) -> MuniResult<ExecSignal> {
        for stmt in stmts {
            if let ExecSignal::Return(value) = self.exec_stmt(stmt)? {
                return Ok(ExecSignal::Return(value));
            }
        }
        Ok(ExecSignal::Normal(Value::Void))
    }

    fn exec_kind(&mut self, kind: &StmtKind) -> MuniResult<ExecSignal> {
        match kind {
            /* ------------------------------------------------------------------
             * Expression Statement
             * ---------------------------------------------------------------- */
            StmtKind::Expression(expr) => {
                let value = self.eval_expr(expr)?;
                return Ok(ExecSignal::Normal(value));
            }

            /* ------------------------------------------------------------------
             * Variables
             * ---------------------------------------------------------------- */
            StmtKind::Declaration {
                type_spec,
                name,
                value,
            } => {
                let initial = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::zero_of(type_spec)?,
                };
                self.runtime.env.declare(name, &initial, type_spec)?;
            }

            StmtKind::Assignment { name, value } => {
                let value = self.eval_expr(value)?;
                let stored = self.runtime.env.assign(name, &value)?;
                self.after_assignment(name, &stored)?;
            }

            StmtKind::CompoundAssignment { name, op, value } => {
                let current = self.runtime.env.lookup(name)?;
                let rhs = self.eval_expr(value)?;
                let updated = current.binary(*op, &rhs)?;
                let stored = self.runtime.env.assign(name, &updated)?;
                self.after_assignment(name, &stored)?;
            }

            StmtKind::ElementAssignment {
                target,
                index,
                value,
            } => self.assign_element(target, index, value)?,

            /* ------------------------------------------------------------------
             * Functions
             * ---------------------------------------------------------------- */
            StmtKind::Function(decl) => {
                debug!(function = %decl.name, params = decl.params.len(), "define");
                self.runtime
                    .functions
                    .write()
                    .insert(decl.name.clone(), Arc::new(decl.clone()));
            }

            StmtKind::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Void,
                };
                return Ok(ExecSignal::Return(value));
            }

            StmtKind::Throw(expr) => {
                let value = self.eval_expr(expr)?;
                return Err(MuniError::user_thrown(value.to_string()));
            }

            StmtKind::Import { path, alias } => self.exec_import(path, alias.as_deref())?,

            /* ------------------------------------------------------------------
             * Control Flow
             * ---------------------------------------------------------------- */
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(condition)?.is_truthy() {
                    run_body!(self, then_branch);
                } else if let Some(else_body) = else_branch {
                    run_body!(self, else_body);
                }
            }

            StmtKind::While {
                condition,
                body,
                preroll,
            } => return self.exec_loop(condition, body, *preroll, true),

            StmtKind::Until {
                condition,
                body,
                preroll,
            } => return self.exec_loop(condition, body, *preroll, false),

            StmtKind::For {
                init,
                condition,
                step,
                body,
            } => {
                self.exec_stmt(init)?;
                while self.eval_expr(condition)?.is_truthy() {
                    run_body!(self, body);
                    self.exec_stmt(step)?;
                }
            }

            StmtKind::ForIn {
                type_spec,
                name,
                iterable,
                body,
            } => return self.exec_for_in(type_spec, name, iterable, body),

            StmtKind::Switch {
                subject,
                cases,
                default,
            } => return self.exec_switch(subject, cases, default.as_deref()),

            /* ------------------------------------------------------------------
             * Reactive
             * ---------------------------------------------------------------- */
            StmtKind::Signal(name) => self.declare_signal(name)?,
            StmtKind::Emit(name) => self.emit(name)?,
            StmtKind::When { signal, body } => self.attach_handler(signal, body)?,
            StmtKind::Watch { variable, body } => self.register_watch(variable, body)?,
        }

        Ok(ExecSignal::Normal(Value::Void))
    }

    /* ============================================================================
     * Helpers
     * ============================================================================
     */

    /// `while` runs while the condition holds, `until` while it does not.
    /// The body first runs `preroll` times without looking at the condition.
    fn exec_loop(
        &mut self,
        condition: &Expr,
        body: &[Stmt],
        preroll: u32,
        run_while: bool,
    ) -> MuniResult<ExecSignal> {
        for _ in 0..preroll {
            run_body!(self, body);
        }

        while self.eval_expr(condition)?.is_truthy() == run_while {
            if !self.is_running() {
                break;
            }
            run_body!(self, body);
        }

        Ok(ExecSignal::Normal(Value::Void))
    }

    /// Re-declares the loop variable for every element, type-checking it.
    fn exec_for_in(
        &mut self,
        type_spec: &TypeSpec,
        name: &str,
        iterable: &Expr,
        body: &[Stmt],
    ) -> MuniResult<ExecSignal> {
        let items = match self.eval_expr(iterable)? {
            Value::List(list) => list.items(),
            Value::Dict(dict) => dict.keys(),
            Value::String(s) => s.chars().map(|c| Value::String(c.to_string())).collect(),
            other => {
                return Err(MuniError::type_error(format!(
                    "'{}' is not iterable",
                    other.type_name()
                )))
            }
        };

        for item in items {
            self.runtime.env.declare(name, &item, type_spec)?;
            run_body!(self, body);
        }

        Ok(ExecSignal::Normal(Value::Void))
    }

    /// Runs exactly one case (the first equal one) or the default.
    fn exec_switch(
        &mut self,
        subject: &Expr,
        cases: &[SwitchCase],
        default: Option<&[Stmt]>,
    ) -> MuniResult<ExecSignal> {
        let subject = self.eval_expr(subject)?;

        for case in cases {
            self.ctx.current = case.span;
            let candidate = self.eval_expr(&case.value).map_err(|e| e.or_at(case.span))?;
            if Value::same_value(&subject, &candidate) {
                return self.exec_block(&case.body);
            }
        }

        match default {
            Some(body) => self.exec_block(body),
            None => Ok(ExecSignal::Normal(Value::Void)),
        }
    }

    /// `target[index] = value`, then wake watches on the container.
    fn assign_element(&mut self, target: &Expr, index: &Expr, value: &Expr) -> MuniResult<()> {
        let container = self.eval_expr(target)?;
        let index = self.eval_expr(index)?;
        let value = self.eval_expr(value)?;

        match &container {
            Value::List(list) => list.set_item(&index, &value)?,
            Value::Dict(dict) => dict.set(&index, &value)?,
            other => {
                return Err(MuniError::type_error(format!(
                    "'{}' does not support item assignment",
                    other.type_name()
                )))
            }
        }

        self.notify_container(&container)
    }
}
