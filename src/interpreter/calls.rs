/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     interpreter/calls.rs
 * Purpose:  Function and native invocation
 *
 * Call protocol for user functions:
 *
 *  1. Take the definition currently in the function table (an `Arc`, so
 *     the body cannot alter the copy this call runs).
 *  2. Evaluate arguments, then push a new scope.
 *  3. Bind parameters in order, converting to their declared types.
 *  4. Run the body until it ends or returns.
 *  5. Pop the scope and restore the table entry, on every exit path.
 *  6. Convert a returned value to the declared return type; a body that
 *     never returns yields `void`.
 *
 * Native functions are looked up first and receive evaluated arguments. *
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

use tracing::{debug, warn};

use crate::ast::{Expr, FunctionDecl};
use crate::error::{MuniError, MuniResult};
use crate::interpreter::natives::NativeContext;
use crate::interpreter::{ExecSignal, Interpreter};
use crate::value::Value;

impl Interpreter {
    /// Resolves `name` (natives first) and calls it.
    pub(crate) fn call_function(&mut self, name: &str, arguments: &[Expr]) -> MuniResult<Value> {
        let resolved = self.resolve_callable(name);
        let name = resolved.as_str();

        let native = self.runtime.natives.read().get(name);
        if let Some(native) = native {
            let args = self.eval_args(arguments)?;
            debug!(function = name, args = args.len(), "native call");
            let mut ctx = NativeContext {
                name,
                args,
                interpreter: self,
            };
            return native(&mut ctx);
        }

        let decl = self
            .runtime
            .functions
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| MuniError::name_error(format!("function '{}' is not defined", name)))?;

        let args = self.eval_args(arguments)?;
        self.call_user(name, decl, args)
    }

    /// Runs a user function with already-evaluated arguments.
    pub fn call_user(
        &mut self,
        name: &str,
        decl: Arc<FunctionDecl>,
        args: Vec<Value>,
    ) -> MuniResult<Value> {
        let limit = self.runtime.config.max_call_depth;
        if self.ctx.call_depth >= limit {
            return Err(MuniError::runtime_error(format!(
                "maximum call depth of {} exceeded in '{}'",
                limit, name
            ))
            .with_help("check for unbounded recursion or raise max_call_depth"));
        }

        if args.len() != decl.params.len() {
            warn!(
                function = name,
                expected = decl.params.len(),
                given = args.len(),
                "argument count mismatch, extra parameters or arguments are ignored"
            );
        }

        debug!(function = name, depth = self.ctx.call_depth, "call");

        let env = self.runtime.env.clone();
        env.push_scope();
        self.ctx.call_depth += 1;
        let caller_alias =
            std::mem::replace(&mut self.ctx.module_alias, decl.module_alias.clone());

        let outcome = self.invoke(&decl, &args);

        self.ctx.module_alias = caller_alias;
        self.ctx.call_depth -= 1;
        env.pop_scope();
        self.runtime
            .functions
            .write()
            .insert(name.to_string(), decl.clone());

        match outcome? {
            ExecSignal::Return(value) => value.coerce_to(&decl.return_type),
            ExecSignal::Normal(_) => Ok(Value::Void),
        }
    }

    /// Inside a function imported under an alias, `alias_name` wins over
    /// `name` when it is defined.
    fn resolve_callable(&self, name: &str) -> String {
        if let Some(alias) = &self.ctx.module_alias {
            let scoped = format!("{}_{}", alias, name);
            if self.runtime.natives.read().contains(&scoped)
                || self.runtime.functions.read().contains_key(&scoped)
            {
                return scoped;
            }
        }
        name.to_string()
    }

    fn invoke(&mut self, decl: &FunctionDecl, args: &[Value]) -> MuniResult<ExecSignal> {
        for (param, arg) in decl.params.iter().zip(args) {
            self.runtime.env.declare(&param.name, arg, &param.type_spec)?;
        }
        self.exec_block(&decl.body)
    }

    fn eval_args(&mut self, arguments: &[Expr]) -> MuniResult<Vec<Value>> {
        arguments.iter().map(|arg| self.eval_expr(arg)).collect()
    }
}
