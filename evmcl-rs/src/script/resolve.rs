//! Recursive argument resolution.
//!
//! A raw token resolves by its leading sigil: `$name` through the
//! environment, `@path(...)` through the host's extension registry,
//! anything else passes through as a literal.  Sequences resolve
//! element-wise, preserving shape; siblings run concurrently and the first
//! failure aborts the whole sequence with no partial results.
//!
//! There is no cancellation or timeout here: a hung extension call hangs
//! the enclosing resolution.  Documented limitation.

use futures_util::future::{try_join_all, BoxFuture};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::env::Env;
use crate::error::Error;
use crate::host::Host;
use crate::script::arg::{decode, ArgNode, ArgValue};

/// Extension token grammar: `@` + dotted path + optional `(p1,p2)` list.
/// Parameters are split on `,`, so a parameter cannot contain a literal
/// comma — the list grammar only reliably supports simple parameters.
static CALL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@([A-Za-z0-9.]+)(?:\((.*)\))?$").expect("literal regex"));

/// Resolves argument trees against one host and one environment.
///
/// Borrows both for the duration of a single command's resolution; the
/// environment is read-only here — only the `set` command writes it, after
/// its own resolution has finished.
pub struct Resolver<'r, H: Host> {
    host: &'r H,
    env: &'r Env,
}

impl<'r, H: Host> Resolver<'r, H> {
    pub fn new(host: &'r H, env: &'r Env) -> Self {
        Self { host, env }
    }

    /// Decode and resolve a command's raw argument tokens.
    ///
    /// The tokens behave like siblings of one sequence: they resolve
    /// concurrently and fail fast together.
    pub async fn resolve_args(&self, raw: &[String]) -> Result<Vec<ArgValue>, Error> {
        let nodes = raw
            .iter()
            .map(|token| decode(token))
            .collect::<Result<Vec<_>, _>>()?;
        try_join_all(nodes.iter().map(|node| self.resolve(node))).await
    }

    /// Resolve one argument node, preserving its shape.
    ///
    /// Sibling elements of a sequence have no ordering guarantee relative
    /// to each other; the resolver suspends until all have completed or one
    /// has failed.  Futures are polled in index order, so among siblings
    /// that fail without suspending the lowest index deterministically
    /// wins; for I/O-backed failures the first to complete is reported.
    pub fn resolve<'a>(&'a self, node: &'a ArgNode) -> BoxFuture<'a, Result<ArgValue, Error>> {
        Box::pin(async move {
            match node {
                ArgNode::Scalar(token) => self.scalar(token).await.map(ArgValue::Str),
                ArgNode::Seq(items) => {
                    let values = try_join_all(items.iter().map(|item| self.resolve(item))).await?;
                    Ok(ArgValue::List(values))
                }
            }
        })
    }

    /// Resolve a scalar leaf by its sigil.
    async fn scalar(&self, token: &str) -> Result<String, Error> {
        if token.starts_with('$') {
            self.env.lookup(token).map(str::to_owned)
        } else if token.starts_with('@') {
            self.invoke_extension(token).await
        } else {
            Ok(token.to_owned())
        }
    }

    /// Parse an `@path(p1,p2)` token, resolve its parameters, and invoke
    /// the capability with the host prepended.
    ///
    /// Parameters go through the full resolver, so they may themselves be
    /// variables, nested extension calls, or (comma-free) array literals.
    /// Whatever the capability returns substitutes in place; whatever it
    /// fails with propagates unchanged.
    async fn invoke_extension(&self, token: &str) -> Result<String, Error> {
        let caps = CALL_RE.captures(token).ok_or_else(|| {
            Error::InvalidSyntax(format!("malformed extension call `{token}`"))
        })?;
        let path = &caps[1];
        let raw_params: Vec<&str> = match caps.get(2) {
            Some(list) if !list.as_str().is_empty() => list.as_str().split(',').collect(),
            _ => Vec::new(),
        };
        trace!(path, params = raw_params.len(), "invoking extension");

        let ext = self.host.extensions().resolve(path)?;
        let nodes = raw_params
            .iter()
            .map(|p| decode(p))
            .collect::<Result<Vec<_>, _>>()?;
        let values = try_join_all(nodes.iter().map(|node| self.resolve(node))).await?;
        let params: Vec<String> = values.iter().map(ToString::to_string).collect();
        (**ext)(self.host, params).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
