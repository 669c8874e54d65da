//! `@token(SYMBOL[,tokenlist])` — token symbol to on-chain address.
//!
//! Fetches a token-list JSON document (default: the Uniswap list) and
//! selects the entry matching the symbol and the host's chain id.  The
//! fetch suspends the enclosing resolution; a network failure or a missing
//! entry propagates as an extension failure.

use futures_util::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use crate::error::Error;
use crate::host::Host;

/// Token-list document consulted when no override is given.
pub const DEFAULT_TOKENLIST: &str = "https://tokens.uniswap.org/";

/// The subset of the token-list schema this extension reads.
#[derive(Debug, Deserialize)]
pub struct TokenList {
    pub tokens: Vec<TokenEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TokenEntry {
    pub symbol: String,
    #[serde(rename = "chainId")]
    pub chain_id: u64,
    pub address: String,
}

/// Resolve a token symbol to its address on the host's chain.
///
/// First parameter: the symbol.  Optional second parameter: a token-list
/// URL overriding [`DEFAULT_TOKENLIST`].
pub fn token<'a, H: Host>(
    host: &'a H,
    params: Vec<String>,
) -> BoxFuture<'a, Result<String, Error>> {
    Box::pin(async move {
        let symbol = params
            .first()
            .cloned()
            .ok_or_else(|| Error::InvalidSyntax("token expects a symbol".into()))?;
        let list_url = params
            .get(1)
            .cloned()
            .unwrap_or_else(|| DEFAULT_TOKENLIST.to_owned());
        debug!(symbol = symbol.as_str(), list = list_url.as_str(), "fetching token list");

        let list: TokenList = reqwest::get(&list_url)
            .await
            .map_err(Error::extension)?
            .json()
            .await
            .map_err(Error::extension)?;

        let chain_id = host.chain_id();
        find_token(&list, &symbol, chain_id)
            .map(str::to_owned)
            .ok_or_else(|| {
                Error::extension(format!(
                    "{symbol} not supported in {list_url} in chain {chain_id}"
                ))
            })
    })
}

/// Select the address for `symbol` on `chain_id`, if the list carries one.
pub fn find_token<'t>(list: &'t TokenList, symbol: &str, chain_id: u64) -> Option<&'t str> {
    list.tokens
        .iter()
        .find(|t| t.symbol == symbol && t.chain_id == chain_id)
        .map(|t| t.address.as_str())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
