use cosmwasm_std::Addr;
use cw_storage_plus::{Item, Map};
use protocol_guild::{
    forwarder::{PendingTransfer, RemoteChainInfo},
    ica::{IcaChannel, IcaState},
};

pub const ICA_STATE: Item<IcaState> = Item::new("ica_state");

pub const ICA_CHANNEL: Item<IcaChannel> = Item::new("ica_channel");

pub const NEXT_CONTRACT: Item<Addr> = Item::new("next_contract");

/// Information needed for an ibc transfer out of the remote chain
pub const REMOTE_CHAIN_INFO: Item<RemoteChainInfo> = Item::new("r_c_info");

/// Interchain query tracking the ICA's balance
pub const BALANCE_QUERY_ID: Item<u64> = Item::new("balance_query_id");

/// Local height of the balance reading the last transfer was based on
pub const LAST_FORWARDED_HEIGHT: Item<u64> = Item::new("last_fwd_height");

// (channel_id, sequence) => transfer
pub const PENDING_TRANSFERS: Map<(&str, u64), PendingTransfer> = Map::new("pending");

/// Transfer submitted in the current tx; moved to PENDING_TRANSFERS once the
/// reply tells us its packet id
pub const SUBMITTING: Item<PendingTransfer> = Item::new("submitting");
