//! Client for a Soroban RPC endpoint: builds contract-call transactions,
//! simulates and prepares them, signs with the admin key and submits.

pub mod client;
pub mod error;
pub mod keypair;
pub mod native;
pub mod network;
pub mod rpc;
pub mod scval;
pub mod submit;
pub mod transaction;

pub use client::{AccountSequence, NetworkClient, RpcClient, Simulation};
pub use error::{Error, Result};
pub use stellar_strkey;
pub use stellar_xdr::curr as xdr;
