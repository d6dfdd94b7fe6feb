/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     interpreter/mod.rs
 * Purpose:  Interpreter state and public entry points
 *
 * Interpreter Entry & Runtime Bootstrap
 * -------------------------------------
 * This module owns the state shared by the main evaluator and every
 * reactive handler thread:
 *
 *  - The scope stack and the user function table
 *  - The native function registry
 *  - Signal and watch registries
 *  - The handler task spawner
 *  - The halt-on-error latch
 *
 * All actual evaluation logic is delegated to the following submodules:
 *
 *  - statements.rs  -> statement execution (exec_stmt)
 *  - expressions.rs -> expression evaluation (eval_expr)
 *  - calls.rs       -> native and user function invocation
 *  - reactive.rs    -> signal, when and watch dispatch
 *  - modules.rs     -> import resolution
 *  - tasks.rs       -> handler threads *
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

pub mod calls;
pub mod environment;
pub mod expressions;
pub mod modules;
pub mod natives;
pub mod reactive;
pub mod statements;
pub mod tasks;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error};

use crate::ast::{Expr, FunctionDecl, Stmt};
use crate::config::InterpreterConfig;
use crate::error::{MuniError, MuniResult};
use crate::span::Span;
use crate::stdlib;
use crate::value::Value;

use environment::SharedEnvironment;
use natives::{NativeFn, NativeRegistry};
use reactive::{SignalTable, WatchTable};
use tasks::TaskSpawner;

pub use statements::ExecSignal;

/* ============================================================================
 * Shared Runtime State
 * ============================================================================
 */

/// State shared by the main evaluator and every handler thread it spawns.
pub struct RuntimeState {
    env: SharedEnvironment,
    functions: RwLock<HashMap<String, Arc<FunctionDecl>>>,
    natives: RwLock<NativeRegistry>,
    signals: Mutex<SignalTable>,
    watches: Mutex<WatchTable>,
    tasks: TaskSpawner,
    /// Cleared the first time an error reaches the top level.
    running: AtomicBool,
    config: InterpreterConfig,
    handler_errors: Mutex<Vec<MuniError>>,
    imported: Mutex<HashSet<PathBuf>>,
    program_args: RwLock<Vec<String>>,
}

impl RuntimeState {
    fn record_handler_error(&self, err: MuniError) {
        self.handler_errors.lock().push(err);
    }
}

/// Per-evaluator state. Each handler thread gets its own copy.
#[derive(Debug, Clone)]
pub struct EvaluationContext {
    /// Node currently being evaluated.
    pub current: Span,

    /// Directory relative imports resolve against.
    pub module_dir: PathBuf,

    /// True inside a signal or watch handler.
    pub in_handler: bool,

    /// Nested user function calls on this evaluator.
    pub call_depth: usize,

    /// Import alias of the function currently running, if any.
    pub module_alias: Option<String>,
}

/* ============================================================================
 * Interpreter
 * ============================================================================
 */

/// A MUNI interpreter. Cloning yields another evaluator over the same
/// runtime state.
#[derive(Clone)]
pub struct Interpreter {
    runtime: Arc<RuntimeState>,
    ctx: EvaluationContext,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Creates an interpreter with the always-available natives installed.
    pub fn with_config(config: InterpreterConfig) -> Self {
        let mut natives = NativeRegistry::new();
        stdlib::install(&mut natives);

        let runtime = RuntimeState {
            env: SharedEnvironment::new(),
            functions: RwLock::new(HashMap::new()),
            natives: RwLock::new(natives),
            signals: Mutex::new(SignalTable::default()),
            watches: Mutex::new(WatchTable::default()),
            tasks: TaskSpawner::new(config.handler_stack_size),
            running: AtomicBool::new(true),
            config,
            handler_errors: Mutex::new(Vec::new()),
            imported: Mutex::new(HashSet::new()),
            program_args: RwLock::new(Vec::new()),
        };

        Self {
            runtime: Arc::new(runtime),
            ctx: EvaluationContext {
                current: Span::UNKNOWN,
                module_dir: PathBuf::from("."),
                in_handler: false,
                call_depth: 0,
                module_alias: None,
            },
        }
    }

    /// Directory that `import <file.mun>` resolves against first.
    pub fn set_module_dir(&mut self, dir: impl AsRef<Path>) {
        self.ctx.module_dir = dir.as_ref().to_path_buf();
    }

    pub fn set_program_args(&self, args: Vec<String>) {
        *self.runtime.program_args.write() = args;
    }

    pub fn program_args(&self) -> Vec<String> {
        self.runtime.program_args.read().clone()
    }

    /// Executes a whole program. Returns the value of the last top-level
    /// statement, or of a top-level `return`.
    ///
    /// The first error halts the interpreter: it is logged, the running
    /// latch is cleared so later statements on any thread become no-ops,
    /// and the error is handed back to the host to report.
    pub fn run(&mut self, program: &[Stmt]) -> MuniResult<Value> {
        debug!(statements = program.len(), "run");
        let mut last = Value::Void;

        for stmt in program {
            match self.exec_stmt(stmt) {
                Ok(ExecSignal::Normal(value)) => last = value,
                Ok(ExecSignal::Return(value)) => {
                    last = value;
                    break;
                }
                Err(err) => {
                    self.halt(&err);
                    return Err(err);
                }
            }
        }

        Ok(last)
    }

    /// Lexes, parses and runs `source`.
    pub fn run_source(&mut self, source: &str) -> MuniResult<Value> {
        match crate::parse_source(source) {
            Ok(program) => self.run(&program),
            Err(err) => {
                self.halt(&err);
                Err(err)
            }
        }
    }

    /// Evaluates a single expression against the current state.
    pub fn evaluate(&mut self, expr: &Expr) -> MuniResult<Value> {
        self.eval_expr(expr)
    }

    /// Blocks until every handler spawned so far (and any they spawn) has
    /// finished. Returns how many handler threads panicked.
    pub fn wait_for_handlers(&self) -> usize {
        self.runtime.tasks.wait_idle()
    }

    pub fn is_running(&self) -> bool {
        self.runtime.running.load(Ordering::SeqCst)
    }

    pub fn lookup(&self, name: &str) -> MuniResult<Value> {
        self.runtime.env.lookup(name)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.runtime.functions.read().contains_key(name)
            || self.runtime.natives.read().contains(name)
    }

    pub fn register_native(&self, name: impl Into<String>, function: NativeFn) {
        self.runtime.natives.write().register(name, function);
    }

    /// Errors raised inside signal and watch handlers so far.
    pub fn handler_errors(&self) -> Vec<MuniError> {
        self.runtime.handler_errors.lock().clone()
    }

    pub fn context(&self) -> &EvaluationContext {
        &self.ctx
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.runtime.config
    }

    pub fn environment(&self) -> &SharedEnvironment {
        &self.runtime.env
    }

    fn halt(&self, err: &MuniError) {
        self.runtime.running.store(false, Ordering::SeqCst);
        error!(error = %err, "evaluation halted");
    }

    /// Evaluator for a handler thread: same runtime, fresh call depth.
    fn fork_for_handler(&self) -> Interpreter {
        Interpreter {
            runtime: self.runtime.clone(),
            ctx: EvaluationContext {
                in_handler: true,
                call_depth: 0,
                ..self.ctx.clone()
            },
        }
    }
}
