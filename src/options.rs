//! Compiler configuration.

use jmm_compiler::EmitterOptions;

/// Settings for one compilation unit.
///
/// ```
/// use jmm::CompilerOptions;
///
/// let options = CompilerOptions::default()
///     .with_entry_method("start")
///     .with_abort_on_semantic_errors(true);
/// assert_eq!(options.entry_method, "start");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Name of the program entry method.
    pub entry_method: String,
    /// Report `this` inside the entry method, not only in static methods.
    pub forbid_this_in_entry: bool,
    /// Refuse to emit Jasmin while any semantic error is reported.
    pub abort_on_semantic_errors: bool,
    /// `.limit stack` of every method.
    pub stack_limit: u16,
    /// `.limit locals` of every method.
    pub locals_limit: u16,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        let emitter = EmitterOptions::default();
        Self {
            entry_method: "main".to_string(),
            forbid_this_in_entry: true,
            abort_on_semantic_errors: false,
            stack_limit: emitter.stack_limit,
            locals_limit: emitter.locals_limit,
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry_method(mut self, name: impl Into<String>) -> Self {
        self.entry_method = name.into();
        self
    }

    pub fn with_forbid_this_in_entry(mut self, forbid: bool) -> Self {
        self.forbid_this_in_entry = forbid;
        self
    }

    pub fn with_abort_on_semantic_errors(mut self, abort: bool) -> Self {
        self.abort_on_semantic_errors = abort;
        self
    }

    pub fn with_stack_limit(mut self, limit: u16) -> Self {
        self.stack_limit = limit;
        self
    }

    pub fn with_locals_limit(mut self, limit: u16) -> Self {
        self.locals_limit = limit;
        self
    }

    /// The entry method `this` is forbidden in, if any.
    pub fn this_forbidden_in(&self) -> Option<&str> {
        self.forbid_this_in_entry
            .then_some(self.entry_method.as_str())
    }

    pub fn emitter_options(&self) -> EmitterOptions {
        EmitterOptions {
            stack_limit: self.stack_limit,
            locals_limit: self.locals_limit,
        }
    }
}
