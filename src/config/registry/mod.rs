//! Tag → handler registries
//!
//! Every pluggable section (`model_type`, `network_g.type`, dataset `type`,
//! ...) names an external handler. A [`Registry`] maps the closed set of tags
//! this crate understands to a constructor that checks the section and builds
//! its handler. Unregistered tags surface as
//! [`ConfigError::UnknownType`].

mod builtin;

pub use builtin::Registries;

use crate::config::{ConfigError, ConfigResult};
use std::collections::BTreeMap;
use std::fmt;

/// Builds a handler from its section.
pub type Constructor<S, H> = fn(&S) -> ConfigResult<H>;

/// Registry for one kind of pluggable section
pub struct Registry<S, H> {
    kind: &'static str,
    entries: BTreeMap<&'static str, Constructor<S, H>>,
}

impl<S, H> Registry<S, H> {
    /// Create an empty registry; `kind` names the section in error messages.
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// Register `tag`, replacing any previous constructor for it.
    pub fn register(&mut self, tag: &'static str, constructor: Constructor<S, H>) -> &mut Self {
        self.entries.insert(tag, constructor);
        self
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, tag: &'static str, constructor: Constructor<S, H>) -> Self {
        self.register(tag, constructor);
        self
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Registered tags in sorted order.
    pub fn tags(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    /// Look up `tag` and run its constructor on `section`.
    ///
    /// `field` is the dotted key of the `type` entry, used in errors.
    pub fn build(&self, field: &str, tag: &str, section: &S) -> ConfigResult<H> {
        let constructor = self.entries.get(tag).ok_or_else(|| ConfigError::UnknownType {
            kind: self.kind,
            field: field.to_string(),
            tag: tag.to_string(),
            known: self.tags().join(", "),
        })?;
        constructor(section)
    }
}

impl<S, H> fmt::Debug for Registry<S, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &self.kind)
            .field("tags", &self.tags())
            .finish()
    }
}
