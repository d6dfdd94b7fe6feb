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

//! `import` statements.
//!
//! Two forms are understood:
//!
//!  - `import <name:lib> [as alias];` registers the natives of a built-in
//!    library.
//!  - `import <path.mun> [as alias];` parses another source file and
//!    registers its top-level functions. Its own imports are processed too;
//!    nothing else in it runs.
//!
//! With an alias, every registered name becomes `alias_name`. Functions
//! from an aliased file still call their siblings by the short name.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::ast::{Stmt, StmtKind};
use crate::error::{MuniError, MuniResult};
use crate::interpreter::Interpreter;
use crate::stdlib;

const LIBRARY_SUFFIX: &str = ":lib";
const SOURCE_EXTENSION: &str = ".mun";

fn qualified(alias: Option<&str>, name: &str) -> String {
    match alias {
        Some(alias) => format!("{}_{}", alias, name),
        None => name.to_string(),
    }
}

impl Interpreter {
    pub(crate) fn exec_import(&mut self, path: &str, alias: Option<&str>) -> MuniResult<()> {
        if let Some(library) = path.strip_suffix(LIBRARY_SUFFIX) {
            return self.import_library(library, alias);
        }

        if path.ends_with(SOURCE_EXTENSION) {
            return self.import_file(path, alias);
        }

        Err(MuniError::import_error(format!(
            "cannot import '{}': expected a .mun file or a :lib library",
            path
        )))
    }

    fn import_library(&mut self, library: &str, alias: Option<&str>) -> MuniResult<()> {
        let natives = stdlib::library(library)
            .ok_or_else(|| MuniError::import_error(format!("unknown library '{}'", library)))?;

        debug!(library, alias, natives = natives.len(), "import library");

        let mut registry = self.runtime.natives.write();
        for (name, function) in natives {
            registry.register(qualified(alias, name), function);
        }
        Ok(())
    }

    fn import_file(&mut self, path: &str, alias: Option<&str>) -> MuniResult<()> {
        let resolved = self.resolve_module(path)?;

        // Already loaded in this run.
        if !self.runtime.imported.lock().insert(resolved.clone()) {
            debug!(path = %resolved.display(), "import skipped, already loaded");
            return Ok(());
        }

        debug!(path = %resolved.display(), alias, "import file");

        let source = fs::read_to_string(&resolved).map_err(|e| {
            MuniError::import_error(format!("cannot read '{}': {}", resolved.display(), e))
        })?;
        let program = crate::parse_source(&source)
            .map_err(|e| e.with_help(format!("while importing '{}'", resolved.display())))?;

        let previous_dir = self.ctx.module_dir.clone();
        if let Some(dir) = resolved.parent() {
            self.ctx.module_dir = dir.to_path_buf();
        }

        let result = self.register_module(&program, alias);

        self.ctx.module_dir = previous_dir;
        result
    }

    /// Registers top-level functions and follows nested imports.
    fn register_module(&mut self, program: &[Stmt], alias: Option<&str>) -> MuniResult<()> {
        for stmt in program {
            match &stmt.kind {
                StmtKind::Function(decl) => {
                    let decl = match alias {
                        Some(alias) => decl.aliased(alias),
                        None => decl.clone(),
                    };
                    self.runtime
                        .functions
                        .write()
                        .insert(decl.name.clone(), Arc::new(decl));
                }
                StmtKind::Import {
                    path,
                    alias: nested_alias,
                } => self
                    .exec_import(path, nested_alias.as_deref())
                    .map_err(|e| e.or_at(stmt.span))?,
                _ => {}
            }
        }
        Ok(())
    }

    /// The importing file's directory first, then the configured paths.
    fn resolve_module(&self, path: &str) -> MuniResult<PathBuf> {
        let requested = Path::new(path);
        let mut candidates = vec![self.ctx.module_dir.join(requested)];
        candidates.extend(
            self.runtime
                .config
                .module_paths
                .iter()
                .map(|dir| dir.join(requested)),
        );

        candidates
            .into_iter()
            .find(|candidate| candidate.is_file())
            .map(|found| found.canonicalize().unwrap_or(found))
            .ok_or_else(|| {
                MuniError::import_error(format!("module '{}' not found", path))
                    .with_help("imports resolve against the importing file's directory and module_paths")
            })
    }
}
