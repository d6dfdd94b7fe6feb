/*
 * ==========================================================================
 * MUNI - Typed scripting with signals and watchers
 * ==========================================================================
 *
 * File:     param.rs
 * Purpose:  Function declarations and their parameters
 *
 * This file defines `Param` and `FunctionDecl`, the pieces of a
 * function declaration:
 *
 *     int add(int a, int b) { return a + b; }
 *
 * Declarations are immutable once parsed. The function table stores them
 * behind an `Arc`, so a call can hold on to the definition it started with
 * while the body rebinds the same name. *
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

use crate::ast::Stmt;
use crate::span::Span;
use crate::types::TypeSpec;

/// Represents **one declared parameter** in a function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Declared type; arguments are converted to it on binding.
    pub type_spec: TypeSpec,

    /// Parameter name (identifier)
    pub name: String,
}

impl Param {
    pub fn new(type_spec: TypeSpec, name: impl Into<String>) -> Self {
        Self {
            type_spec,
            name: name.into(),
        }
    }
}

/// A user-defined function.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: TypeSpec,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
    pub span: Span,

    /// Alias of the `import ... as` that registered this function. Calls
    /// inside the body try `alias_name` before `name`.
    pub module_alias: Option<String>,
}

impl FunctionDecl {
    /// Same definition registered as `alias_name`.
    pub fn aliased(&self, alias: &str) -> Self {
        Self {
            name: format!("{}_{}", alias, self.name),
            module_alias: Some(alias.to_string()),
            ..self.clone()
        }
    }
}
