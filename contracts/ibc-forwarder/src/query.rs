use cosmwasm_std::{Deps, StdResult};
use cw_paginate::paginate_map;
use cw_storage_plus::Bound;
use neutron_sdk::bindings::query::NeutronQuery;
use protocol_guild::{
    forwarder::{PendingTransferResponse, RemoteChainInfo},
    ica::{IcaChannel, IcaState},
};

use crate::{
    error::{ContractError, Result},
    state::{ICA_CHANNEL, ICA_STATE, NEXT_CONTRACT, PENDING_TRANSFERS, REMOTE_CHAIN_INFO},
};

/// Funds are received by the ICA on the remote chain. Until it exists there
/// is nowhere to send them, and callers are expected to retry later.
pub fn deposit_address(deps: Deps<NeutronQuery>) -> Result<String> {
    ICA_STATE
        .load(deps.storage)?
        .address()
        .map(String::from)
        .ok_or(ContractError::IcaNotReady)
}

pub fn ica_state(deps: Deps<NeutronQuery>) -> StdResult<IcaState> {
    ICA_STATE.load(deps.storage)
}

pub fn ica_channel(deps: Deps<NeutronQuery>) -> StdResult<IcaChannel> {
    ICA_CHANNEL.load(deps.storage)
}

pub fn remote_chain_info(deps: Deps<NeutronQuery>) -> StdResult<RemoteChainInfo> {
    REMOTE_CHAIN_INFO.load(deps.storage)
}

pub fn next_contract(deps: Deps<NeutronQuery>) -> StdResult<String> {
    NEXT_CONTRACT.load(deps.storage).map(String::from)
}

pub fn pending_transfers(
    deps:        Deps<NeutronQuery>,
    start_after: Option<(String, u64)>,
    limit:       Option<u32>,
) -> StdResult<Vec<PendingTransferResponse>> {
    let start = start_after
        .as_ref()
        .map(|(channel_id, sequence)| Bound::exclusive((channel_id.as_str(), *sequence)));
    paginate_map(&PENDING_TRANSFERS, deps.storage, start, limit, |(channel_id, sequence), transfer| {
        Ok(PendingTransferResponse {
            channel_id,
            sequence,
            transfer,
        })
    })
}

// ----------------------------------- Tests -----------------------------------
