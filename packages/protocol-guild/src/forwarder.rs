use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Timestamp, Uint128, Uint64};

use crate::ica::{IcaChannel, IcaState};

#[cw_serde]
pub struct InstantiateMsg {
    /// The contract funds are forwarded to, usually the splitter. It must
    /// answer the `deposit_address` query.
    pub next_contract: String,

    /// Connection from the local chain to the remote chain, on which the ICA
    /// is opened
    pub remote_chain_connection_id: String,

    /// Transfer channel on the remote chain, leading back to the local chain
    pub remote_chain_channel_id: String,

    /// Denom to forward, as it's called on the remote chain
    pub denom: String,

    /// Timeout in seconds of the ICS-20 transfer sent by the ICA. It counts
    /// from the moment the ICA tx times out, so that the transfer packet
    /// can't expire before the tx carrying it does.
    pub ibc_transfer_timeout: Uint64,

    /// Timeout in seconds of ICA txs, and of the ICA registration.
    ///
    /// ICA channels are ordered, so a tx timing out closes the channel.
    pub ica_timeout: Uint64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Advance the forwarder by one step
    Tick {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Address of the ICA on the remote chain, where funds are to be sent.
    /// Errors until the account is active.
    #[returns(String)]
    DepositAddress {},

    /// Lifecycle of the ICA
    #[returns(IcaState)]
    IcaState {},

    /// Whether the ICA's channel is usable, or being reopened after a timeout
    #[returns(IcaChannel)]
    IcaChannel {},

    #[returns(RemoteChainInfo)]
    RemoteChainInfo {},

    /// Address funds are forwarded to
    #[returns(String)]
    NextContract {},

    /// Iterate transfers that have been sent but not yet acknowledged
    #[returns(Vec<PendingTransferResponse>)]
    PendingTransfers {
        start_after: Option<(String, u64)>,
        limit:       Option<u32>,
    },
}

#[cw_serde]
pub struct RemoteChainInfo {
    pub connection_id:        String,
    pub channel_id:           String,
    pub denom:                String,
    pub ibc_transfer_timeout: Uint64,
    pub ica_timeout:          Uint64,
}

impl RemoteChainInfo {
    /// Absolute timeout of a transfer sent by the ICA at `now`
    pub fn transfer_deadline(&self, now: Timestamp) -> Timestamp {
        now.plus_seconds(self.ica_timeout.u64())
            .plus_seconds(self.ibc_transfer_timeout.u64())
    }
}

/// A transfer issued by the ICA which has not been acknowledged or timed out
/// yet.
#[cw_serde]
pub struct PendingTransfer {
    pub source:      String,
    pub destination: String,
    pub denom:       String,
    pub amount:      Uint128,
    pub deadline:    Timestamp,
}

#[cw_serde]
pub struct PendingTransferResponse {
    pub channel_id: String,
    pub sequence:   u64,
    pub transfer:   PendingTransfer,
}

/// The ICA's balance as last reported by the remote chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceReading {
    pub amount: Uint128,

    /// Local height at which the reading was submitted
    pub height: u64,
}

/// How much to forward given the latest balance reading.
///
/// A reading that has already been acted on is skipped: the ICA has either
/// sent those funds or is about to, and sending the same amount again would
/// only fail on the remote chain.
pub fn forward_amount(reading: &BalanceReading, last_forwarded_height: Option<u64>) -> Option<Uint128> {
    if reading.amount.is_zero() {
        return None;
    }

    if last_forwarded_height.map_or(false, |height| height >= reading.height) {
        return None;
    }

    Some(reading.amount)
}

// ----------------------------------- Tests -----------------------------------
