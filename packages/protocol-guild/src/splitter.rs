use cosmwasm_schema::{cw_serde, QueryResponses};

use crate::split::{DenomSplit, RemainderPolicy, SplitConfig, SplitType};

#[cw_serde]
pub struct InstantiateMsg {
    /// List of (denom, split) configurations
    pub splits: Vec<DenomSplit>,

    /// Split for all denoms not covered in `splits`. Without one, such denoms
    /// stay in the contract.
    pub fallback_split: Option<SplitType>,

    /// Defaults to `last_receiver`
    pub remainder_policy: Option<RemainderPolicy>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Distribute every balance the contract holds
    Tick {},
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Where forwarders should send funds: the contract itself
    #[returns(String)]
    DepositAddress {},

    /// Split configured for a specific denom
    #[returns(Option<SplitConfig>)]
    DenomSplit {
        denom: String,
    },

    /// Iterate all per-denom splits
    #[returns(Vec<DenomSplitResponse>)]
    Splits {
        start_after: Option<String>,
        limit:       Option<u32>,
    },

    #[returns(Option<SplitConfig>)]
    FallbackSplit {},

    #[returns(RemainderPolicy)]
    RemainderPolicy {},
}

#[cw_serde]
pub struct DenomSplitResponse {
    pub denom: String,
    pub split: SplitConfig,
}
