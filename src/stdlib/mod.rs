/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     stdlib/mod.rs
 * Purpose:  Standard library registry
 *
 * Native function tables.
 *
 * The I/O and collection natives are installed into every interpreter.
 * The remaining tables are libraries that a program opts into with
 * `import <name:lib>;`. *
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

pub mod collections;
pub mod io;
pub mod json;
pub mod math;
pub mod text;
pub mod time;

use crate::interpreter::natives::{NativeFn, NativeRegistry};

/// Installs the always-available natives.
pub fn install(registry: &mut NativeRegistry) {
    for (name, function) in io::natives().into_iter().chain(collections::natives()) {
        registry.register(name, function);
    }
}

/// Natives of the library `name` (without the `:lib` suffix).
pub fn library(name: &str) -> Option<Vec<(&'static str, NativeFn)>> {
    match name {
        "math" => Some(math::natives()),
        "json" => Some(json::natives()),
        "time" => Some(time::natives()),
        "text" => Some(text::natives()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_natives_are_installed() {
        let mut registry = NativeRegistry::new();
        install(&mut registry);
        for name in ["print", "length", "append", "local_scope", "sleep"] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert!(!registry.contains("sqrt"));
    }

    #[test]
    fn libraries_resolve_by_name() {
        assert!(library("math").is_some());
        assert!(library("text").is_some());
        assert!(library("sockets").is_none());
    }
}
