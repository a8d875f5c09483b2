use cosmwasm_std::{Deps, Env, StdResult};
use cw_paginate::paginate_map;
use cw_storage_plus::Bound;
use protocol_guild::{
    split::{RemainderPolicy, SplitConfig},
    splitter::DenomSplitResponse,
};

use crate::state::{FALLBACK_SPLIT, REMAINDER_POLICY, SPLITS};

/// Funds sent straight to the splitter are split, so it is its own deposit
/// address.
pub fn deposit_address(env: Env) -> String {
    env.contract.address.into()
}

pub fn denom_split(deps: Deps, denom: String) -> StdResult<Option<SplitConfig>> {
    SPLITS.may_load(deps.storage, &denom)
}

pub fn splits(
    deps:        Deps,
    start_after: Option<String>,
    limit:       Option<u32>,
) -> StdResult<Vec<DenomSplitResponse>> {
    let start = start_after.as_ref().map(|denom| Bound::exclusive(denom.as_str()));
    paginate_map(&SPLITS, deps.storage, start, limit, |denom, split| {
        Ok(DenomSplitResponse {
            denom,
            split,
        })
    })
}

pub fn fallback_split(deps: Deps) -> StdResult<Option<SplitConfig>> {
    FALLBACK_SPLIT.may_load(deps.storage)
}

pub fn remainder_policy(deps: Deps) -> StdResult<RemainderPolicy> {
    REMAINDER_POLICY.load(deps.storage)
}

// ----------------------------------- Tests -----------------------------------
