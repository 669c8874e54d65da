//! Built-in extension capabilities.
//!
//! Hosts are free to register anything callable, but two capabilities are
//! useful enough to ship here: [`sender::sender`], which resolves to the
//! caller identity's address, and (behind the `net` feature)
//! [`token::token`], which resolves a token symbol to its on-chain address
//! from a token-list document.

pub mod sender;
#[cfg(feature = "net")]
pub mod token;

use crate::error::Error;
use crate::extension::ExtensionRegistry;
use crate::host::Host;

/// Install the built-in capabilities into `registry`.
///
/// Registers `sender` and, when the `net` feature is enabled, `token`.
pub fn register_defaults<H: Host + 'static>(registry: &mut ExtensionRegistry<H>) -> Result<(), Error> {
    registry.register("sender", sender::sender::<H>)?;
    #[cfg(feature = "net")]
    registry.register("token", token::token::<H>)?;
    Ok(())
}
