//! Binding-handler preprocessing chains.
//!
//! A host framework gives each binding handler a text-preprocessing slot.
//! Rather than patching a shared handler registry at runtime and wrapping
//! whatever preprocessor happens to be installed, each handler here holds an
//! explicit ordered list of transforms, applied in registration order. The
//! arrow rewrite is installed by iterating over a configuration-provided
//! collection of handler names at setup time, so the result never depends on
//! load order.

use std::collections::BTreeMap;

use crate::error::Error;
use crate::rewrite::RewriteOptions;
use crate::rewrite_source_with;

/// A text-to-text transform applied to a binding string before the host
/// evaluates it.
pub type Preprocessor = Box<dyn Fn(&str) -> Result<String, Error> + Send + Sync>;

/// One named binding handler and its ordered preprocessor chain.
pub struct BindingHandler {
    name: String,
    preprocessors: Vec<Preprocessor>,
}

impl BindingHandler {
    fn new(name: String) -> Self {
        Self {
            name,
            preprocessors: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a transform to the end of the chain. Earlier registrations
    /// run first.
    pub fn push_preprocessor(&mut self, preprocessor: Preprocessor) {
        self.preprocessors.push(preprocessor);
    }

    /// Run the full chain over a binding string. The first failing
    /// transform aborts the chain.
    pub fn preprocess(&self, input: &str) -> Result<String, Error> {
        let mut text = input.to_string();
        for preprocessor in &self.preprocessors {
            text = preprocessor(&text)?;
        }
        Ok(text)
    }
}

/// The set of binding handlers known at setup time.
pub struct HandlerRegistry {
    handlers: BTreeMap<String, BindingHandler>,
}

impl HandlerRegistry {
    /// Build a registry from a configuration-provided collection of handler
    /// names (e.g. `["text", "visible", "click"]`).
    pub fn new<I, S>(handler_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handlers = handler_names
            .into_iter()
            .map(|name| {
                let name = name.into();
                (name.clone(), BindingHandler::new(name))
            })
            .collect();
        Self { handlers }
    }

    /// Add a handler after construction. Returns false if it already exists.
    pub fn register(&mut self, name: &str) -> bool {
        if self.handlers.contains_key(name) {
            return false;
        }
        self.handlers
            .insert(name.to_string(), BindingHandler::new(name.to_string()));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn handlers(&self) -> impl Iterator<Item = &BindingHandler> {
        self.handlers.values()
    }

    /// Append a transform to one handler's chain. Returns false if the
    /// handler is unknown.
    pub fn push_preprocessor(&mut self, handler: &str, preprocessor: Preprocessor) -> bool {
        match self.handlers.get_mut(handler) {
            Some(h) => {
                h.push_preprocessor(preprocessor);
                true
            }
            None => false,
        }
    }

    /// Install the arrow rewrite at the end of every handler's chain, after
    /// any transforms registered earlier.
    pub fn install_arrow_rewrite(&mut self, options: RewriteOptions) {
        for handler in self.handlers.values_mut() {
            let options = options.clone();
            handler.push_preprocessor(Box::new(move |input| {
                rewrite_source_with(input, &options)
            }));
        }
    }

    /// Preprocess a binding string for the named handler. Handlers that are
    /// unknown (or have an empty chain) pass the text through unchanged, the
    /// same way a host treats handlers without a preprocessing slot.
    pub fn preprocess(&self, handler: &str, input: &str) -> Result<String, Error> {
        match self.handlers.get(handler) {
            Some(h) => h.preprocess(input),
            None => Ok(input.to_string()),
        }
    }
}
