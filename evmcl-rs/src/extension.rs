//! Extension capability registry.
//!
//! Extensions are host-provided callables addressable from argument
//! position by a dotted path (`@foo.bar(...)`).  The registry is an
//! explicit map from the full dotted path to a typed callable
//! `(host, params) -> future<String>`; path grammar is checked once at
//! registration, so a malformed name fails when the capability is wired
//! up rather than the first time a script mentions it.  Lookup of an
//! unregistered path is [`Error::UnknownExtension`].

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::Error;

/// An extension capability: invoked with the host automation object first,
/// then the already-resolved parameter strings.  The returned future may
/// suspend for external I/O; its `String` result substitutes in place of
/// the `@` token.  Arity and result semantics are the capability's own
/// business — the invoker does not validate them.
pub type ExtensionFn<H> =
    Arc<dyn for<'a> Fn(&'a H, Vec<String>) -> BoxFuture<'a, Result<String, Error>> + Send + Sync>;

/// Registry of extension capabilities, keyed by dotted path.
pub struct ExtensionRegistry<H> {
    entries: HashMap<String, ExtensionFn<H>>,
}

impl<H> Default for ExtensionRegistry<H> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<H> ExtensionRegistry<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a capability under `path`.
    ///
    /// The path must be non-empty `.`-separated segments of ASCII letters
    /// and digits; anything else is [`Error::InvalidSyntax`].  Registering
    /// an existing path overwrites it.
    pub fn register<F>(&mut self, path: &str, f: F) -> Result<(), Error>
    where
        F: for<'a> Fn(&'a H, Vec<String>) -> BoxFuture<'a, Result<String, Error>>
            + Send
            + Sync
            + 'static,
    {
        if !is_valid_path(path) {
            return Err(Error::InvalidSyntax(format!(
                "extension path `{path}` must be dot-separated letters and digits"
            )));
        }
        self.entries.insert(path.to_owned(), Arc::new(f));
        Ok(())
    }

    /// Resolve a dotted path to its capability.
    pub fn resolve(&self, path: &str) -> Result<&ExtensionFn<H>, Error> {
        self.entries
            .get(path)
            .ok_or_else(|| Error::UnknownExtension(path.to_owned()))
    }

    /// Returns `true` if `path` is registered.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Registered paths, in arbitrary order.
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<H> std::fmt::Debug for ExtensionRegistry<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut paths: Vec<&str> = self.paths().collect();
        paths.sort_unstable();
        f.debug_struct("ExtensionRegistry")
            .field("paths", &paths)
            .finish()
    }
}

fn is_valid_path(path: &str) -> bool {
    !path.is_empty()
        && path
            .split('.')
            .all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
