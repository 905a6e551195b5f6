//! Subgraph deployments per network.

use std::str::FromStr;

use crate::{Endpoint, SubgraphError};

const STUDIO_BASE: &str = "https://api.studio.thegraph.com/query/14377";
const DEPLOYMENT_VERSION: &str = "v3.6.1";

/// A network with a hosted group subgraph deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    Sepolia,
    Goerli,
    Mumbai,
    OptimismGoerli,
    ArbitrumGoerli,
    Arbitrum,
}

impl Network {
    /// Every supported network, in display order.
    pub const ALL: [Network; 6] = [
        Network::Sepolia,
        Network::Goerli,
        Network::Mumbai,
        Network::OptimismGoerli,
        Network::ArbitrumGoerli,
        Network::Arbitrum,
    ];

    /// The network's canonical name (as accepted by [`Network::from_str`]).
    pub fn name(self) -> &'static str {
        match self {
            Self::Sepolia => "sepolia",
            Self::Goerli => "goerli",
            Self::Mumbai => "mumbai",
            Self::OptimismGoerli => "optimism-goerli",
            Self::ArbitrumGoerli => "arbitrum-goerli",
            Self::Arbitrum => "arbitrum",
        }
    }

    /// URL of the network's subgraph query endpoint.
    pub fn endpoint(self) -> Endpoint {
        Endpoint::new(format!(
            "{STUDIO_BASE}/semaphore-{}/{DEPLOYMENT_VERSION}",
            self.name()
        ))
        .unwrap_or_else(|| unreachable!("endpoint URLs are never empty"))
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = SubgraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.name() == s)
            .ok_or_else(|| SubgraphError::UnsupportedNetwork {
                network: s.to_string(),
            })
    }
}

/// Resolves a network name to its subgraph endpoint.
///
/// # Errors
///
/// [`SubgraphError::UnsupportedNetwork`] if `network` is not a known name.
pub fn resolve_endpoint(network: &str) -> Result<Endpoint, SubgraphError> {
    network.parse::<Network>().map(Network::endpoint)
}
