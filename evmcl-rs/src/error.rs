//! Interpreter error type.
//!
//! Every failure in this crate is fatal for the enclosing script run: there
//! is no internal retry and no local recovery.  Errors surface to whoever
//! invoked the composed action — or, for [`Error::UnrecognizedCommand`], to
//! whoever compiled the script.

use std::fmt;

/// Errors produced while compiling a script or invoking its actions.
#[derive(Debug)]
pub enum Error {
    /// Malformed token: a variable name without the `$` sigil, an extension
    /// call that does not match the `@path(p1,p2)` grammar, a malformed
    /// array literal, a boolean argument that is not `true`/`false`/absent,
    /// or an argument arity/shape violation.
    InvalidSyntax(String),
    /// Reference to a variable with no earlier `set` in script order.
    UndefinedVariable(String),
    /// Dotted extension path not present in the host's registry.
    UnknownExtension(String),
    /// Command name outside the recognized set.  Raised at compile time and
    /// rejects the whole script.
    UnrecognizedCommand(String),
    /// Failure propagated unchanged from an extension capability or a host
    /// operation.
    Extension(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSyntax(msg) => write!(f, "invalid syntax: {msg}"),
            Error::UndefinedVariable(name) => {
                write!(f, "environment variable {name} not defined")
            }
            Error::UnknownExtension(path) => write!(f, "unknown extension: {path}"),
            Error::UnrecognizedCommand(name) => write!(f, "unrecognized command: {name}"),
            Error::Extension(e) => write!(f, "extension failed: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Extension(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl Error {
    /// Wrap an arbitrary capability failure for propagation.
    pub fn extension(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Extension(e.into())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        assert_eq!(
            Error::UndefinedVariable("$x".into()).to_string(),
            "environment variable $x not defined"
        );
        assert_eq!(
            Error::UnrecognizedCommand("frobnicate".into()).to_string(),
            "unrecognized command: frobnicate"
        );
        assert_eq!(
            Error::UnknownExtension("foo.missing".into()).to_string(),
            "unknown extension: foo.missing"
        );
    }

    #[test]
    fn extension_source_is_preserved() {
        let err = Error::extension("connection reset");
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.to_string(), "extension failed: connection reset");
    }
}
