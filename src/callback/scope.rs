//! Named functions and classes that string targets resolve against.

use std::collections::HashMap;

use super::target::Callback;

/// A class exposing static methods.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    methods: HashMap<String, Callback>,
}

impl ClassDef {
    /// Creates an empty class.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: HashMap::new(),
        }
    }

    /// Adds (or replaces) a static method.
    #[must_use]
    pub fn method(mut self, name: impl Into<String>, callback: Callback) -> Self {
        self.methods.insert(name.into(), callback);
        self
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up a static method.
    #[must_use]
    pub fn get_method(&self, name: &str) -> Option<&Callback> {
        self.methods.get(name)
    }

    /// Whether the class defines `name`.
    #[must_use]
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }
}

/// Symbol table of free functions and classes.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    functions: HashMap<String, Callback>,
    classes: HashMap<String, ClassDef>,
}

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines (or replaces) a free function.
    pub fn define_function(&mut self, name: impl Into<String>, callback: Callback) {
        self.functions.insert(name.into(), callback);
    }

    /// Defines (or replaces) a class.
    pub fn define_class(&mut self, class: ClassDef) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Builder form of [`Scope::define_function`].
    #[must_use]
    pub fn with_function(mut self, name: impl Into<String>, callback: Callback) -> Self {
        self.define_function(name, callback);
        self
    }

    /// Builder form of [`Scope::define_class`].
    #[must_use]
    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.define_class(class);
        self
    }

    /// Looks up a free function.
    #[must_use]
    pub fn function(&self, name: &str) -> Option<&Callback> {
        self.functions.get(name)
    }

    /// Looks up a class.
    #[must_use]
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    /// Drops every function and class.
    pub fn clear(&mut self) {
        self.functions.clear();
        self.classes.clear();
    }
}
