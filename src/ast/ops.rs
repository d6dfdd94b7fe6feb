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

use std::fmt;

use crate::error::{MuniError, MuniResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

/// Non-short-circuiting boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    And,
    Or,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
        }
    }

    /// Accepts both the bare operator and its compound form (`+=`).
    pub fn from_symbol(symbol: &str) -> MuniResult<Self> {
        match symbol.trim_end_matches('=') {
            "+" => Ok(BinaryOp::Add),
            "-" => Ok(BinaryOp::Sub),
            "*" => Ok(BinaryOp::Mul),
            "/" => Ok(BinaryOp::Div),
            "%" => Ok(BinaryOp::Mod),
            _ => Err(MuniError::unknown_node(format!(
                "unknown arithmetic operator '{}'",
                symbol
            ))),
        }
    }
}

impl CompareOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterEqual => ">=",
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
        }
    }

    pub fn from_symbol(symbol: &str) -> MuniResult<Self> {
        match symbol {
            "<" => Ok(CompareOp::Less),
            "<=" => Ok(CompareOp::LessEqual),
            ">" => Ok(CompareOp::Greater),
            ">=" => Ok(CompareOp::GreaterEqual),
            "==" => Ok(CompareOp::Equal),
            "!=" => Ok(CompareOp::NotEqual),
            _ => Err(MuniError::unknown_node(format!(
                "unknown comparison operator '{}'",
                symbol
            ))),
        }
    }
}

impl LogicalOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "&",
            LogicalOp::Or => "|",
            LogicalOp::Xor => "^",
        }
    }

    pub fn from_symbol(symbol: &str) -> MuniResult<Self> {
        match symbol {
            "&" => Ok(LogicalOp::And),
            "|" => Ok(LogicalOp::Or),
            "^" => Ok(LogicalOp::Xor),
            _ => Err(MuniError::unknown_node(format!(
                "unknown logical operator '{}'",
                symbol
            ))),
        }
    }
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn compound_symbols_map_to_arithmetic() {
        assert_eq!(BinaryOp::from_symbol("+=").unwrap(), BinaryOp::Add);
        assert_eq!(BinaryOp::from_symbol("%").unwrap(), BinaryOp::Mod);
    }

    #[test]
    fn unknown_symbol_is_unknown_node() {
        let err = CompareOp::from_symbol("<>").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownNode);
    }
}
