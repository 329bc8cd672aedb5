//! RNode client for reading REV vault balances.
//!
//! Balances are read with exploratory deploys: a Rholang term that looks up
//! each address's vault and returns `(address, balance)` tuples is evaluated
//! on an observer node without being added to the chain.
//!
//! - [`RholangBalanceQuery`] renders the term for a batch of addresses
//! - [`RNodeHttpTransport`] sends it to `/api/explore-deploy`
//! - [`ExploreDeployParser`] turns the returned expressions into balances

mod parser;
mod rholang;
mod transport;

pub use parser::ExploreDeployParser;
pub use rholang::{balances_term, RholangBalanceQuery};
pub use transport::{explore_deploy_url, RNodeHttpTransport};

/// Public observer of RChain mainnet.
pub const DEFAULT_OBSERVER_ENDPOINT: &str = "https://observer-eu.services.mainnet.rchain.coop";
