use cosmwasm_std::{
    entry_point, to_binary, Binary, Deps, DepsMut, Env, MessageInfo, Reply, Response,
};
use neutron_sdk::{
    bindings::{msg::NeutronMsg, query::NeutronQuery},
    sudo::msg::SudoMsg,
};
use protocol_guild::forwarder::{ExecuteMsg, InstantiateMsg, QueryMsg};

use crate::{
    error::{ContractError, Result},
    execute, query, sudo, AFTER_BALANCE_QUERY_REGISTERED, AFTER_TRANSFER_SUBMITTED,
    CONTRACT_NAME, CONTRACT_VERSION,
};

#[entry_point]
pub fn instantiate(
    deps: DepsMut<NeutronQuery>,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response<NeutronMsg>> {
    cw2::set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    execute::init(deps, msg)
}

#[entry_point]
pub fn execute(
    deps: DepsMut<NeutronQuery>,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response<NeutronMsg>> {
    match msg {
        ExecuteMsg::Tick {} => execute::tick(deps, env, info),
    }
}

#[entry_point]
pub fn sudo(deps: DepsMut<NeutronQuery>, env: Env, msg: SudoMsg) -> Result<Response<NeutronMsg>> {
    sudo::sudo(deps, env, msg)
}

#[entry_point]
pub fn reply(deps: DepsMut<NeutronQuery>, _env: Env, msg: Reply) -> Result<Response<NeutronMsg>> {
    match msg.id {
        AFTER_BALANCE_QUERY_REGISTERED => execute::after_balance_query_registered(deps, msg.result),
        AFTER_TRANSFER_SUBMITTED => execute::after_transfer_submitted(deps, msg.result),
        id => Err(ContractError::UnknownReplyId(id)),
    }
}

#[entry_point]
pub fn query(deps: Deps<NeutronQuery>, _env: Env, msg: QueryMsg) -> Result<Binary> {
    match msg {
        QueryMsg::DepositAddress {} => Ok(to_binary(&query::deposit_address(deps)?)?),
        QueryMsg::IcaState {} => Ok(to_binary(&query::ica_state(deps)?)?),
        QueryMsg::IcaChannel {} => Ok(to_binary(&query::ica_channel(deps)?)?),
        QueryMsg::RemoteChainInfo {} => Ok(to_binary(&query::remote_chain_info(deps)?)?),
        QueryMsg::NextContract {} => Ok(to_binary(&query::next_contract(deps)?)?),
        QueryMsg::PendingTransfers {
            start_after,
            limit,
        } => Ok(to_binary(&query::pending_transfers(deps, start_after, limit)?)?),
    }
}
