// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM JSON-RPC client used as the signup balance oracle.

use alloy::{
    network::Ethereum,
    primitives::{Address, U256},
    providers::{
        fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
        Identity, Provider, ProviderBuilder, RootProvider,
    },
};
use async_trait::async_trait;

/// HTTP provider type (with the default fillers).
type HttpProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider<Ethereum>,
>;

/// Source of current on-chain balances.
///
/// A failure here is never interpreted as "zero balance": callers must treat
/// it as an infrastructure error.
#[async_trait]
pub trait BalanceOracle: Send + Sync {
    /// Balance of `address` in the smallest unit (wei).
    async fn get_balance(&self, address: Address) -> Result<U256, ChainClientError>;
}

/// JSON-RPC backed balance oracle.
pub struct ChainClient {
    provider: HttpProvider,
}

impl ChainClient {
    /// Create a new client for the given JSON-RPC endpoint.
    pub fn new(rpc_url: &str) -> Result<Self, ChainClientError> {
        let url: url::Url = rpc_url.parse().map_err(|e: url::ParseError| {
            ChainClientError::InvalidRpcUrl(e.to_string())
        })?;

        let provider = ProviderBuilder::new().connect_http(url);

        Ok(Self { provider })
    }
}

#[async_trait]
impl BalanceOracle for ChainClient {
    async fn get_balance(&self, address: Address) -> Result<U256, ChainClientError> {
        let balance = self
            .provider
            .get_balance(address)
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))?;

        tracing::debug!(address = %address, balance = %balance, "Fetched on-chain balance");
        Ok(balance)
    }
}

/// Exact decimal ether rendering of a wei amount, without trailing zeros.
pub fn format_ether(wei: U256) -> String {
    const WEI_PER_ETHER: u64 = 1_000_000_000_000_000_000;

    let divisor = U256::from(WEI_PER_ETHER);
    let (whole, fraction) = (wei / divisor, wei % divisor);
    if fraction.is_zero() {
        return whole.to_string();
    }

    let digits = format!("{:0>18}", fraction.to_string());
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("RPC error: {0}")]
    RpcError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_ether_keeps_full_precision() {
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(U256::from(2_000_000_000_000_000_000u64)), "2");
        assert_eq!(format_ether(U256::from(10_000_000_000_000_000u64)), "0.01");
        assert_eq!(
            format_ether(U256::from(1_234_567_890_123_456_789u64)),
            "1.234567890123456789"
        );
        assert_eq!(format_ether(U256::from(999u64)), "0.000000000000000999");
    }

    #[test]
    fn rejects_invalid_rpc_url() {
        let err = ChainClient::new("not a url").err().unwrap();
        assert!(matches!(err, ChainClientError::InvalidRpcUrl(_)));
    }

    #[tokio::test]
    async fn accepts_http_rpc_url() {
        assert!(ChainClient::new("http://localhost:8545").is_ok());
    }
}
