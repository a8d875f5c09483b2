#[cfg(not(feature = "library"))]
pub mod contract;
pub mod error;
pub mod execute;
pub mod query;
pub mod state;
pub mod sudo;

pub const CONTRACT_NAME:    &str = "crates.io:ibc-forwarder";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The forwarder owns a single interchain account, registered under this id
pub const INTERCHAIN_ACCOUNT_ID: &str = "ica";

/// Blocks between two updates of the ICA balance query
pub const BALANCE_QUERY_UPDATE_PERIOD: u64 = 5;

// relayer fees attached to every ICA tx
pub const FEE_DENOM:          &str = "untrn";
pub const ACK_FEE_AMOUNT:     u128 = 10000;
pub const TIMEOUT_FEE_AMOUNT: u128 = 10000;

// reply IDs
pub const AFTER_BALANCE_QUERY_REGISTERED: u64 = 1;
pub const AFTER_TRANSFER_SUBMITTED: u64 = 2;
