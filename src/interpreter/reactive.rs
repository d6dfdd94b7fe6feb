/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     reactive.rs
 * Purpose:  Signal and watch registries and handler dispatch
 *
 * Signals:
 *
 *     signal ready;            declare once
 *     when (ready) { ... }     attach a handler block
 *     emit ready;              run every handler block concurrently
 *
 * Watches:
 *
 *     watch (x) { ... }        run the block whenever x is mutated at the
 *                              scope depth it had when the watch was set
 *
 * In-place container mutation reaches watches through an explicit
 * subscription list kept on the container itself, so no reverse lookup
 * from a value to the variables holding it is ever needed. *
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

use tracing::{debug, error};

use crate::ast::Stmt;
use crate::error::{MuniError, MuniResult};
use crate::interpreter::Interpreter;
use crate::value::Value;

/// A handler body, shared between the registry and every thread running it.
pub type HandlerBody = Arc<Vec<Stmt>>;

/* ============================================================================
 * Signal Table
 * ============================================================================
 */

#[derive(Debug, Default)]
pub struct SignalTable {
    signals: HashMap<String, Vec<HandlerBody>>,
}

impl SignalTable {
    /// `Undeclared -> Declared`. Redeclaring is an error.
    pub fn declare(&mut self, name: &str) -> MuniResult<()> {
        if self.signals.contains_key(name) {
            return Err(MuniError::signal_error(format!(
                "signal '{}' is already declared",
                name
            )));
        }
        self.signals.insert(name.to_string(), Vec::new());
        Ok(())
    }

    pub fn attach(&mut self, name: &str, body: HandlerBody) -> MuniResult<()> {
        self.signals
            .get_mut(name)
            .map(|handlers| handlers.push(body))
            .ok_or_else(|| undeclared(name))
    }

    /// Handlers in attachment order.
    pub fn handlers(&self, name: &str) -> MuniResult<Vec<HandlerBody>> {
        self.signals.get(name).cloned().ok_or_else(|| undeclared(name))
    }

    pub fn is_declared(&self, name: &str) -> bool {
        self.signals.contains_key(name)
    }
}

fn undeclared(name: &str) -> MuniError {
    MuniError::signal_error(format!("signal '{}' is not declared", name))
}

/* ============================================================================
 * Watch Table
 * ============================================================================
 */

#[derive(Debug, Clone)]
struct WatchEntry {
    depth: usize,
    body: HandlerBody,
}

#[derive(Debug, Default)]
pub struct WatchTable {
    watches: HashMap<String, Vec<WatchEntry>>,
}

impl WatchTable {
    pub fn register(&mut self, name: &str, depth: usize, body: HandlerBody) {
        self.watches
            .entry(name.to_string())
            .or_default()
            .push(WatchEntry { depth, body });
    }

    /// Bodies registered for `name` at exactly `depth`.
    pub fn matching(&self, name: &str, depth: usize) -> Vec<HandlerBody> {
        self.watches
            .get(name)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|entry| entry.depth == depth)
                    .map(|entry| entry.body.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_watched(&self, name: &str) -> bool {
        self.watches.get(name).is_some_and(|entries| !entries.is_empty())
    }
}

/* ============================================================================
 * Dispatch
 * ============================================================================
 */

impl Interpreter {
    pub(crate) fn declare_signal(&mut self, name: &str) -> MuniResult<()> {
        self.runtime.signals.lock().declare(name)
    }

    pub(crate) fn attach_handler(&mut self, signal: &str, body: &[Stmt]) -> MuniResult<()> {
        self.runtime
            .signals
            .lock()
            .attach(signal, Arc::new(body.to_vec()))
    }

    /// Starts every handler of `signal` and returns without waiting.
    pub(crate) fn emit(&mut self, signal: &str) -> MuniResult<()> {
        let handlers = self.runtime.signals.lock().handlers(signal)?;
        debug!(signal, handlers = handlers.len(), "emit");

        for (index, body) in handlers.into_iter().enumerate() {
            self.spawn_handler(format!("when:{}#{}", signal, index), body)?;
        }
        Ok(())
    }

    /// Registers a watch on an existing variable at its current depth.
    pub(crate) fn register_watch(&mut self, name: &str, body: &[Stmt]) -> MuniResult<()> {
        let depth = self.runtime.env.depth_of(name)?;
        let current = self.runtime.env.lookup(name)?;

        self.runtime
            .watches
            .lock()
            .register(name, depth, Arc::new(body.to_vec()));
        subscribe(&current, name);

        debug!(variable = name, depth, "watch registered");
        Ok(())
    }

    /// Called after `name` was assigned `value`.
    pub(crate) fn after_assignment(&mut self, name: &str, value: &Value) -> MuniResult<()> {
        if !self.runtime.watches.lock().is_watched(name) {
            return Ok(());
        }
        subscribe(value, name);
        self.notify_mutation(name)
    }

    /// Dispatches every watch on `name` whose depth matches where `name`
    /// currently resolves.
    pub(crate) fn notify_mutation(&mut self, name: &str) -> MuniResult<()> {
        let Ok(depth) = self.runtime.env.depth_of(name) else {
            return Ok(());
        };

        let bodies = self.runtime.watches.lock().matching(name, depth);
        if !bodies.is_empty() {
            debug!(variable = name, depth, handlers = bodies.len(), "watch fired");
        }

        for (index, body) in bodies.into_iter().enumerate() {
            self.spawn_handler(format!("watch:{}#{}", name, index), body)?;
        }
        Ok(())
    }

    /// Called after a list or dictionary was mutated in place. Notifies
    /// every subscribed variable that still holds this very container.
    pub(crate) fn notify_container(&mut self, container: &Value) -> MuniResult<()> {
        let subscribers = match container {
            Value::List(list) => list.subscribers(),
            Value::Dict(dict) => dict.subscribers(),
            _ => return Ok(()),
        };

        for name in subscribers {
            let still_bound = match (self.runtime.env.lookup(&name), container) {
                (Ok(Value::List(held)), Value::List(list)) => held.ptr_eq(list),
                (Ok(Value::Dict(held)), Value::Dict(dict)) => held.ptr_eq(dict),
                _ => false,
            };
            if still_bound {
                self.notify_mutation(&name)?;
            }
        }
        Ok(())
    }

    /// Runs `body` on a new thread against the shared runtime state.
    ///
    /// Errors are reported and recorded but never reach the spawning
    /// evaluator.
    fn spawn_handler(&self, label: String, body: HandlerBody) -> MuniResult<()> {
        let mut handler = self.fork_for_handler();
        let task_label = label.clone();

        self.runtime.tasks.spawn(task_label, move || {
            if let Err(err) = handler.exec_block(&body) {
                error!(handler = %label, error = %err, "handler failed");
                eprintln!("{} (in handler '{}')", err, label);
                handler.runtime.record_handler_error(err);
            }
        })
    }
}

/// Makes in-place mutation of `value` notify watches on `name`.
fn subscribe(value: &Value, name: &str) {
    match value {
        Value::List(list) => list.subscribe(name),
        Value::Dict(dict) => dict.subscribe(name),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn body() -> HandlerBody {
        Arc::new(Vec::new())
    }

    #[test]
    fn signal_lifecycle() {
        let mut table = SignalTable::default();
        assert_eq!(table.attach("go", body()).unwrap_err().kind, ErrorKind::SignalError);

        table.declare("go").unwrap();
        assert_eq!(table.handlers("go").unwrap().len(), 0);

        table.attach("go", body()).unwrap();
        table.attach("go", body()).unwrap();
        assert_eq!(table.handlers("go").unwrap().len(), 2);

        assert_eq!(table.declare("go").unwrap_err().kind, ErrorKind::SignalError);
        assert_eq!(table.handlers("stop").unwrap_err().kind, ErrorKind::SignalError);
    }

    #[test]
    fn watches_match_on_depth() {
        let mut table = WatchTable::default();
        table.register("x", 0, body());
        table.register("x", 1, body());
        table.register("x", 1, body());

        assert_eq!(table.matching("x", 0).len(), 1);
        assert_eq!(table.matching("x", 1).len(), 2);
        assert_eq!(table.matching("x", 2).len(), 0);
        assert!(table.is_watched("x"));
        assert!(!table.is_watched("y"));
    }
}
