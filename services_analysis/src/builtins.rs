//! Built-in definitions dataset
//!
//! Names the evaluator provides without any user definition. The standard
//! set is static; hosts may merge extra entries loaded from JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

const STANDARD_FUNCTIONS: &[&str] = &[
    // Arithmetic and comparison
    "+", "-", "*", "/", "%", "=", "!=", "<", ">", "<=", ">=", "and", "or", "not",
    "abs", "min", "max", "floor", "ceil", "round", "sqrt",
    // Stack manipulation
    "dup", "drop", "swap", "over", "rot", "clear", "depth",
    // Control flow
    "if", "ifelse", "when", "loop", "times", "while", "break", "call", "exit",
    // Arrays and strings
    "len", "get", "set", "push", "pop", "first", "last", "concat", "slice", "reverse",
    "map", "filter", "reduce", "each", "range", "join", "split", "upper", "lower",
    // Conversion and inspection
    "str", "int", "float", "type", "is-int", "is-string", "is-array",
    // Input/output
    "print", "println", "read", "sleep",
];

const STANDARD_VARIABLES: &[&str] = &["pi", "e", "nil", "args"];

const STANDARD_TYPES: &[&str] = &[
    "Int", "Float", "Number", "Bool", "String", "Array", "Fn", "Any", "Nil",
];

/// Failure to load a built-in dataset
#[derive(Debug, Error)]
pub enum BuiltinsError {
    #[error("Invalid built-ins dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Serialized form of a built-in dataset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltinsData {
    pub functions: Vec<String>,
    pub variables: Vec<String>,
    pub types: Vec<String>,
}

/// Set of built-in function, variable and type names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Builtins {
    functions: BTreeSet<String>,
    variables: BTreeSet<String>,
    types: BTreeSet<String>,
}

impl Builtins {
    /// Creates an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard dataset shipped with the evaluator
    pub fn standard() -> Self {
        let owned = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            functions: owned(STANDARD_FUNCTIONS),
            variables: owned(STANDARD_VARIABLES),
            types: owned(STANDARD_TYPES),
        }
    }

    /// Parses a dataset from JSON (`{"functions": [..], "variables": [..], "types": [..]}`)
    pub fn from_json(json: &str) -> Result<Self, BuiltinsError> {
        let data: BuiltinsData = serde_json::from_str(json)?;
        Ok(Self::from_data(data))
    }

    pub fn from_data(data: BuiltinsData) -> Self {
        let mut builtins = Self::new();
        builtins.extend(data);
        builtins
    }

    /// Merges extra entries into this dataset
    pub fn extend(&mut self, data: BuiltinsData) {
        self.functions.extend(data.functions);
        self.variables.extend(data.variables);
        self.types.extend(data.types);
    }

    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.functions.insert(name.into());
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>) -> Self {
        self.variables.insert(name.into());
        self
    }

    pub fn with_type(mut self, name: impl Into<String>) -> Self {
        self.types.insert(name.into());
        self
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains(name)
    }

    pub fn is_type(&self, name: &str) -> bool {
        self.types.contains(name)
    }

    /// Returns true if `name` is a built-in function or variable
    pub fn resolves(&self, name: &str) -> bool {
        self.is_function(name) || self.is_variable(name)
    }
}
