//! `@sender` — the caller identity's address.

use futures_util::future::BoxFuture;

use crate::error::Error;
use crate::host::Host;

/// Resolve to the address of the host's caller identity.  Takes no
/// parameters; any that are passed are ignored.
pub fn sender<'a, H: Host>(
    host: &'a H,
    _params: Vec<String>,
) -> BoxFuture<'a, Result<String, Error>> {
    Box::pin(async move { host.caller_address() })
}
