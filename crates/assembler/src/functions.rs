//! Defines the registry and built-in implementations for leaf transforms.
use std::collections::HashMap;
use std::fmt;

/// The signature for a leaf transform. An empty result marks the value absent.
pub type LeafFunction = fn(&str) -> String;

/// A registry to hold all available leaf transforms.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, LeafFunction>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.functions.keys().collect();
        names.sort();
        f.debug_struct("FunctionRegistry").field("functions", &names).finish()
    }
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a new function.
    pub fn register(&mut self, name: &str, func: LeafFunction) {
        self.functions.insert(name.to_lowercase(), func);
    }

    /// Finds a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<LeafFunction> {
        self.functions.get(&name.to_lowercase()).copied()
    }
}

// --- Built-in Function Implementations ---

/// HL7 `TS` date: the first eight digits found in the first twenty characters.
pub fn hl7_date(raw: &str) -> String {
    raw.chars()
        .take(20)
        .filter(char::is_ascii_digit)
        .take(8)
        .collect()
}

fn upper(raw: &str) -> String {
    raw.to_uppercase()
}

fn lower(raw: &str) -> String {
    raw.to_lowercase()
}

fn trim(raw: &str) -> String {
    raw.trim().to_string()
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("hl7_date", hl7_date);
        registry.register("upper", upper);
        registry.register("lower", lower);
        registry.register("trim", trim);
        registry
    }
}
