//! Host automation object boundary.
//!
//! The interpreter never performs domain work itself: every command
//! ultimately calls one of the factory operations below, each of which
//! *builds* raw actions without executing them.  Concrete hosts own the
//! install/grant/revoke/exec/act semantics, the extension registry, and
//! the caller identity; this crate depends on them only through this
//! trait.

use crate::error::Error;
use crate::extension::ExtensionRegistry;
use crate::script::arg::ArgValue;

/// A raw transaction-like action produced by a host operation.
///
/// Built by the host, collected in script order by [`Program::run`],
/// and executed by machinery outside this crate.
///
/// [`Program::run`]: crate::script::interp::Program::run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Target address of the action.
    pub to: String,
    /// Encoded call payload.
    pub data: String,
}

impl Action {
    pub fn new(to: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            data: data.into(),
        }
    }
}

/// The host automation object.
///
/// The factory operations are synchronous: suspension happens only at
/// extension invocations and nested argument resolution, never inside the
/// host calls themselves.  Each operation returns the actions it built, or
/// an error that aborts the enclosing run.
pub trait Host: Send + Sync + Sized {
    /// Install a new app instance identified by `identifier`, passing the
    /// resolved initialization parameters through unchanged.
    fn install(&self, identifier: &str, init_params: &[ArgValue]) -> Result<Vec<Action>, Error>;

    /// Grant `role` on `app` to `grantee`, with `default_manager` as the
    /// permission manager when the permission is created.
    fn grant(
        &self,
        grantee: &str,
        app: &str,
        role: &str,
        default_manager: &str,
    ) -> Result<Vec<Action>, Error>;

    /// Revoke `role` on `app` from `grantee`.  `remove_manager` mirrors the
    /// script's optional fourth argument: present and coerced, or absent.
    fn revoke(
        &self,
        grantee: &str,
        app: &str,
        role: &str,
        remove_manager: Option<bool>,
    ) -> Result<Vec<Action>, Error>;

    /// Call `method` on the app identified by `identifier` with the
    /// resolved parameters.
    fn exec(
        &self,
        identifier: &str,
        method: &str,
        params: &[ArgValue],
    ) -> Result<Vec<Action>, Error>;

    /// Make `agent` forward a call to `target` with the given signature and
    /// parameters.
    fn act(
        &self,
        agent: &str,
        target: &str,
        signature: &str,
        params: &[ArgValue],
    ) -> Result<Vec<Action>, Error>;

    /// The extension capability registry consulted for `@path(...)` tokens.
    fn extensions(&self) -> &ExtensionRegistry<Self>;

    /// Address of the caller identity, for extensions that need it.
    fn caller_address(&self) -> Result<String, Error>;

    /// Chain the host operates on, for extensions that select by network.
    fn chain_id(&self) -> u64;
}
