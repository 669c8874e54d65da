//! evmcl — a line-oriented command language compiled into deferred actions
//! against a host automation object.
//!
//! A script is plain text, one command per line:
//!
//! ```text
//! # comments run to end of line, // works too
//! install token-manager
//! set $me @sender
//! grant $me voting CREATE_VOTES_ROLE voting
//! exec voting newVote [metadata,[0x00,0x01]]
//! ```
//!
//! [`compile`] turns the text into a [`Program`] of deferred commands;
//! nothing touches the host until [`Program::run`], which resolves each
//! command's arguments — `$name` variables, `@path(...)` extension calls,
//! `[a,[b,c]]` array literals — and performs the host calls in script
//! order, collecting the [`Action`]s they build.  The actions are built,
//! never executed, by this crate.
//!
//! Compilation needs no host at all:
//!
//! ```rust
//! let program = evmcl::compile("install voting # governance").unwrap();
//! assert_eq!(program.len(), 1);
//! ```
//!
//! Hosts implement the [`Host`] trait: the five factory operations
//! (`install`, `grant`, `revoke`, `exec`, `act`), an extension registry,
//! and the caller identity.  [`ext::register_defaults`] installs the
//! built-in `sender` and (with the `net` feature) `token` capabilities.

pub mod env;
pub mod error;
pub mod ext;
pub mod extension;
pub mod host;
pub mod script;

// Re-exports for convenience.
pub use env::Env;
pub use error::Error;
pub use extension::{ExtensionFn, ExtensionRegistry};
pub use host::{Action, Host};
pub use script::arg::{ArgNode, ArgValue};
pub use script::interp::{compile, Command, Program};
