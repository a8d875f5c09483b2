use cosmwasm_schema::cw_serde;
use cosmwasm_std::Coin;
use cw_storage_plus::{Item, Map};
use protocol_guild::split::{RemainderPolicy, SplitConfig};

// denom => split
pub const SPLITS: Map<&str, SplitConfig> = Map::new("splits");

/// Split for all denoms that are not in SPLITS
pub const FALLBACK_SPLIT: Item<SplitConfig> = Item::new("fallback");

pub const REMAINDER_POLICY: Item<RemainderPolicy> = Item::new("rem_pol");

// reply id => bank send dispatched with that id
pub const DISTRIBUTIONS: Map<u64, Distribution> = Map::new("dist");

pub const NEXT_DISTRIBUTION_ID: Item<u64> = Item::new("next_dist");

#[cw_serde]
pub struct Distribution {
    pub receiver: String,
    pub coin:     Coin,
}
