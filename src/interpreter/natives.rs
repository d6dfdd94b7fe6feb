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

//! The native function boundary.
//!
//! A native receives its arguments already evaluated, plus a handle to the
//! calling interpreter, and answers with a single value. Failures must be
//! reported as `MuniError`s; natives never panic across the boundary.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{MuniError, MuniResult};
use crate::interpreter::Interpreter;
use crate::value::{DictRef, ListRef, Value};

/// Host callable reachable from MUNI code.
pub type NativeFn = Arc<dyn Fn(&mut NativeContext<'_>) -> MuniResult<Value> + Send + Sync>;

/// Wraps a closure as a `NativeFn`.
pub fn native<F>(f: F) -> NativeFn
where
    F: Fn(&mut NativeContext<'_>) -> MuniResult<Value> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Everything a native can see while it runs.
pub struct NativeContext<'a> {
    /// Name the native was called under (after aliasing).
    pub name: &'a str,
    pub args: Vec<Value>,
    pub interpreter: &'a mut Interpreter,
}

impl<'a> NativeContext<'a> {
    pub fn arg(&self, index: usize) -> MuniResult<&Value> {
        self.args.get(index).ok_or_else(|| {
            MuniError::type_error(format!(
                "{}() missing argument {}",
                self.name,
                index + 1
            ))
        })
    }

    /// Fails unless exactly `count` arguments were passed.
    pub fn expect_args(&self, count: usize) -> MuniResult<()> {
        if self.args.len() != count {
            return Err(MuniError::type_error(format!(
                "{}() takes {} argument(s) but {} were given",
                self.name,
                count,
                self.args.len()
            )));
        }
        Ok(())
    }

    pub fn int_arg(&self, index: usize) -> MuniResult<i64> {
        let value = self.arg(index)?;
        value.as_int().ok_or_else(|| self.wrong_kind(index, "int", value))
    }

    /// Int or float, widened.
    pub fn number_arg(&self, index: usize) -> MuniResult<f64> {
        let value = self.arg(index)?;
        value.as_f64().ok_or_else(|| self.wrong_kind(index, "number", value))
    }

    pub fn str_arg(&self, index: usize) -> MuniResult<&str> {
        let value = self.arg(index)?;
        value.as_str().ok_or_else(|| self.wrong_kind(index, "string", value))
    }

    pub fn list_arg(&self, index: usize) -> MuniResult<ListRef> {
        match self.arg(index)? {
            Value::List(list) => Ok(list.clone()),
            other => Err(self.wrong_kind(index, "list", other)),
        }
    }

    pub fn dict_arg(&self, index: usize) -> MuniResult<DictRef> {
        match self.arg(index)? {
            Value::Dict(dict) => Ok(dict.clone()),
            other => Err(self.wrong_kind(index, "dict", other)),
        }
    }

    /// Tells watches that `container` changed in place.
    pub fn notify_mutation(&mut self, container: &Value) -> MuniResult<()> {
        self.interpreter.notify_container(container)
    }

    fn wrong_kind(&self, index: usize, expected: &str, found: &Value) -> MuniError {
        MuniError::type_error(format!(
            "{}() argument {} must be {}, not {}",
            self.name,
            index + 1,
            expected,
            found.type_name()
        ))
    }
}

/// Name to callable table, consulted before user functions.
#[derive(Clone, Default)]
pub struct NativeRegistry {
    table: HashMap<String, NativeFn>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, function: NativeFn) {
        self.table.insert(name.into(), function);
    }

    pub fn get(&self, name: &str) -> Option<NativeFn> {
        self.table.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.table.keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRegistry")
            .field("natives", &self.names())
            .finish()
    }
}
