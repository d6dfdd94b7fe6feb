/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     environment.rs
 * Purpose:  Lexical scope stack
 *
 * The environment is a stack of scopes. Index 0 is the global scope and is
 * never popped; a function call pushes one scope on entry and pops it on
 * every exit path.
 *
 * Lookup walks the stack innermost to outermost and the first match wins.
 * Declaration always binds in the innermost scope (shadowing), while plain
 * assignment mutates the binding wherever it already lives.
 *
 * `SharedEnvironment` is the handle the evaluator and every reactive
 * handler thread hold. It serialises individual operations but not whole
 * statements, so handlers still interleave with the main evaluator. *
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

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{MuniError, MuniResult};
use crate::types::TypeSpec;
use crate::value::Value;

/// One named slot: the current value and the type it was declared with.
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub declared: TypeSpec,
}

#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<HashMap<String, Binding>>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding only the global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pops the innermost scope. The global scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of scopes above the global one.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Converts `value` to `declared` and binds it in the innermost scope,
    /// replacing any binding of the same name there.
    pub fn declare(&mut self, name: &str, value: &Value, declared: &TypeSpec) -> MuniResult<Value> {
        let value = value.coerce_to(declared)?;
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(
                name.to_string(),
                Binding {
                    value: value.clone(),
                    declared: declared.clone(),
                },
            );
        }
        Ok(value)
    }

    /// Mutates an existing binding in the scope that owns it.
    ///
    /// Untyped bindings take the value as is; every other binding converts
    /// it to the runtime type of the value currently held.
    pub fn assign(&mut self, name: &str, value: &Value) -> MuniResult<Value> {
        let binding = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .ok_or_else(|| undefined(name))?;

        let value = if binding.declared.is_untyped() {
            value.clone()
        } else {
            value.coerce_to(&binding.value.runtime_type())?
        };

        binding.value = value.clone();
        Ok(value)
    }

    pub fn lookup(&self, name: &str) -> MuniResult<Value> {
        self.binding(name)
            .map(|binding| binding.value.clone())
            .ok_or_else(|| undefined(name))
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Index of the scope that currently resolves `name` (global = 0).
    pub fn depth_of(&self, name: &str) -> MuniResult<usize> {
        self.scopes
            .iter()
            .rposition(|scope| scope.contains_key(name))
            .ok_or_else(|| undefined(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.binding(name).is_some()
    }

    /// Name/value pairs of the innermost scope, sorted by name.
    pub fn current_scope(&self) -> Vec<(String, Value)> {
        self.scope_snapshot(self.scopes.len() - 1)
    }

    pub fn global_scope(&self) -> Vec<(String, Value)> {
        self.scope_snapshot(0)
    }

    fn scope_snapshot(&self, index: usize) -> Vec<(String, Value)> {
        let mut pairs: Vec<_> = self.scopes[index]
            .iter()
            .map(|(name, binding)| (name.clone(), binding.value.clone()))
            .collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        pairs
    }
}

fn undefined(name: &str) -> MuniError {
    MuniError::name_error(format!("variable '{}' is not defined", name))
}

/// The scope stack shared by the evaluator and its handler threads.
#[derive(Debug, Clone, Default)]
pub struct SharedEnvironment(Arc<RwLock<ScopeStack>>);

impl SharedEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_scope(&self) {
        self.0.write().push_scope();
    }

    pub fn pop_scope(&self) {
        self.0.write().pop_scope();
    }

    pub fn depth(&self) -> usize {
        self.0.read().depth()
    }

    pub fn declare(&self, name: &str, value: &Value, declared: &TypeSpec) -> MuniResult<Value> {
        self.0.write().declare(name, value, declared)
    }

    pub fn assign(&self, name: &str, value: &Value) -> MuniResult<Value> {
        self.0.write().assign(name, value)
    }

    pub fn lookup(&self, name: &str) -> MuniResult<Value> {
        self.0.read().lookup(name)
    }

    pub fn depth_of(&self, name: &str) -> MuniResult<usize> {
        self.0.read().depth_of(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.read().contains(name)
    }

    pub fn current_scope(&self) -> Vec<(String, Value)> {
        self.0.read().current_scope()
    }

    pub fn global_scope(&self) -> Vec<(String, Value)> {
        self.0.read().global_scope()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn shadowing_is_undone_by_pop() {
        let mut env = ScopeStack::new();
        env.declare("x", &Value::Int(1), &TypeSpec::Int).unwrap();
        env.push_scope();
        env.declare("x", &Value::Int(2), &TypeSpec::Int).unwrap();
        assert_eq!(env.lookup("x").unwrap(), Value::Int(2));
        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap(), Value::Int(1));
    }

    #[test]
    fn assign_mutates_owning_scope() {
        let mut env = ScopeStack::new();
        env.declare("total", &Value::Int(0), &TypeSpec::Int).unwrap();
        env.push_scope();
        env.assign("total", &Value::Int(5)).unwrap();
        assert_eq!(env.depth_of("total").unwrap(), 0);
        env.pop_scope();
        assert_eq!(env.lookup("total").unwrap(), Value::Int(5));
    }

    #[test]
    fn assign_checks_current_runtime_type() {
        let mut env = ScopeStack::new();
        env.declare("f", &Value::Int(1), &TypeSpec::Float).unwrap();
        assert_eq!(env.assign("f", &Value::Int(3)).unwrap(), Value::Float(3.0));
        let err = env.assign("f", &Value::String("x".into())).unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeError);
    }

    #[test]
    fn untyped_binding_accepts_anything() {
        let mut env = ScopeStack::new();
        env.declare("v", &Value::Int(1), &TypeSpec::Untyped).unwrap();
        env.assign("v", &Value::String("now a string".into())).unwrap();
        assert_eq!(env.lookup("v").unwrap(), Value::String("now a string".into()));
    }

    #[test]
    fn missing_names_are_name_errors() {
        let mut env = ScopeStack::new();
        assert_eq!(env.lookup("ghost").unwrap_err().kind, ErrorKind::NameError);
        assert_eq!(env.assign("ghost", &Value::Void).unwrap_err().kind, ErrorKind::NameError);
        assert_eq!(env.depth_of("ghost").unwrap_err().kind, ErrorKind::NameError);
    }

    #[test]
    fn global_scope_is_never_popped() {
        let mut env = ScopeStack::new();
        env.pop_scope();
        env.declare("x", &Value::Int(1), &TypeSpec::Int).unwrap();
        assert_eq!(env.depth(), 0);
        assert!(env.contains("x"));
    }
}
