use cosmwasm_std::{
    entry_point, to_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response, StdResult,
};
use protocol_guild::splitter::{ExecuteMsg, InstantiateMsg, QueryMsg};

use crate::{error::Result, execute, query, CONTRACT_NAME, CONTRACT_VERSION};

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    execute::init(deps, msg)
}

#[entry_point]
pub fn execute(deps: DepsMut, env: Env, _info: MessageInfo, msg: ExecuteMsg) -> Result<Response> {
    match msg {
        ExecuteMsg::Tick {} => execute::tick(deps, env),
    }
}

#[entry_point]
pub fn reply(deps: DepsMut, _env: Env, msg: Reply) -> Result<Response> {
    // every submessage this contract sends is a distribution
    execute::after_distribution(deps, msg.id, msg.result)
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::DepositAddress {} => to_binary(&query::deposit_address(env)),
        QueryMsg::DenomSplit {
            denom,
        } => to_binary(&query::denom_split(deps, denom)?),
        QueryMsg::Splits {
            start_after,
            limit,
        } => to_binary(&query::splits(deps, start_after, limit)?),
        QueryMsg::FallbackSplit {} => to_binary(&query::fallback_split(deps)?),
        QueryMsg::RemainderPolicy {} => to_binary(&query::remainder_policy(deps)?),
    }
}
