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

//! Interpreter configuration, loaded from JSON.
//!
//! ```json
//! {
//!   "max_call_depth": 500,
//!   "module_paths": ["lib", "/usr/share/muni"],
//!   "wait_for_handlers": true,
//!   "handler_stack_size": 8388608
//! }
//! ```
//!
//! Every field is optional.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{MuniError, MuniResult};

/// Name of the config file picked up next to a script.
pub const CONFIG_FILE_NAME: &str = "muni.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InterpreterConfig {
    /// Nested user function calls allowed before a `RuntimeError`.
    pub max_call_depth: usize,

    /// Extra directories searched by `import <file.mun>`.
    pub module_paths: Vec<PathBuf>,

    /// Whether the host joins outstanding handlers before exiting.
    pub wait_for_handlers: bool,

    /// Stack size in bytes for each handler thread.
    pub handler_stack_size: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_call_depth: 1000,
            module_paths: Vec::new(),
            wait_for_handlers: true,
            handler_stack_size: 8 * 1024 * 1024,
        }
    }
}

impl InterpreterConfig {
    pub fn from_json(text: &str) -> MuniResult<Self> {
        serde_json::from_str(text)
            .map_err(|e| MuniError::runtime_error(format!("invalid configuration: {}", e)))
    }

    pub fn from_file(path: &Path) -> MuniResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            MuniError::runtime_error(format!("cannot read config '{}': {}", path.display(), e))
        })?;
        let config = Self::from_json(&text)?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// An explicit file wins; otherwise `muni.json` beside the script, if
    /// there is one; otherwise defaults.
    pub fn discover(explicit: Option<&Path>, script: &Path) -> MuniResult<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let beside = script
            .parent()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file());

        match beside {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_take_defaults() {
        let config = InterpreterConfig::from_json(r#"{ "max_call_depth": 50 }"#).unwrap();
        assert_eq!(config.max_call_depth, 50);
        assert!(config.wait_for_handlers);
        assert!(config.module_paths.is_empty());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(InterpreterConfig::from_json(r#"{ "max_depth": 50 }"#).is_err());
    }

    #[test]
    fn discovers_file_beside_script() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "wait_for_handlers": false }"#)
            .unwrap();
        let script = dir.path().join("main.mun");

        let config = InterpreterConfig::discover(None, &script).unwrap();
        assert!(!config.wait_for_handlers);
    }

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = InterpreterConfig::discover(None, &dir.path().join("main.mun")).unwrap();
        assert_eq!(config, InterpreterConfig::default());
    }
}
