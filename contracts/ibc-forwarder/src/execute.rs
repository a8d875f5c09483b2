use cosmos_sdk_proto::{
    cosmos::base::v1beta1::Coin as ProtoCoin, ibc::applications::transfer::v1::MsgTransfer,
};
use cosmwasm_std::{
    coins, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdError, SubMsg, SubMsgResult,
};
use neutron_sdk::{
    bindings::{
        msg::{IbcFee, MsgRegisterInterchainQueryResponse, MsgSubmitTxResponse, NeutronMsg},
        query::NeutronQuery,
        types::ProtobufAny,
    },
    interchain_queries::{
        queries::query_balance, register_queries::new_register_balance_query_msg,
    },
    interchain_txs::helpers::get_port_id,
};
use prost::Message;
use protocol_guild::{
    forwarder::{forward_amount, BalanceReading, InstantiateMsg, PendingTransfer, RemoteChainInfo},
    ica::{ChannelStep, IcaChannel, IcaState, TickStep},
    splitter,
    topology::TRANSFER_PORT,
};

use crate::{
    error::{ContractError, Result},
    state::{
        BALANCE_QUERY_ID, ICA_CHANNEL, ICA_STATE, LAST_FORWARDED_HEIGHT, NEXT_CONTRACT, PENDING_TRANSFERS,
        REMOTE_CHAIN_INFO, SUBMITTING,
    },
    ACK_FEE_AMOUNT, AFTER_BALANCE_QUERY_REGISTERED, AFTER_TRANSFER_SUBMITTED,
    BALANCE_QUERY_UPDATE_PERIOD, FEE_DENOM, INTERCHAIN_ACCOUNT_ID, TIMEOUT_FEE_AMOUNT,
};

pub const MSG_TRANSFER_TYPE_URL: &str = "/ibc.applications.transfer.v1.MsgTransfer";

pub fn init(deps: DepsMut<NeutronQuery>, msg: InstantiateMsg) -> Result<Response<NeutronMsg>> {
    if msg.ica_timeout.is_zero() || msg.ibc_transfer_timeout.is_zero() {
        return Err(ContractError::ZeroTimeout);
    }

    let next_contract = deps.api.addr_validate(&msg.next_contract)?;
    NEXT_CONTRACT.save(deps.storage, &next_contract)?;

    REMOTE_CHAIN_INFO.save(deps.storage, &RemoteChainInfo {
        connection_id:        msg.remote_chain_connection_id,
        channel_id:           msg.remote_chain_channel_id,
        denom:                msg.denom.clone(),
        ibc_transfer_timeout: msg.ibc_transfer_timeout,
        ica_timeout:          msg.ica_timeout,
    })?;

    ICA_STATE.save(deps.storage, &IcaState::Unregistered)?;
    ICA_CHANNEL.save(deps.storage, &IcaChannel::Open)?;

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("next_contract", next_contract)
        .add_attribute("denom", msg.denom))
}

/// Advance the forwarder by one step. Every step emits at most one message,
/// so a tick is cheap and can be called by anyone at any time.
pub fn tick(
    deps: DepsMut<NeutronQuery>,
    env: Env,
    info: MessageInfo,
) -> Result<Response<NeutronMsg>> {
    cw_utils::nonpayable(&info)?;

    let remote = REMOTE_CHAIN_INFO.load(deps.storage)?;

    let mut ica = ICA_STATE.load(deps.storage)?;
    let step = ica.advance(env.block.time, remote.ica_timeout.u64());
    ICA_STATE.save(deps.storage, &ica)?;

    let res = Response::new()
        .add_attribute("method", "tick")
        .add_attribute("denom", &remote.denom);

    let (address, controller_connection_id) = match step {
        TickStep::Register => {
            return Ok(register_ica(res, &env, remote.connection_id).add_attribute("action", "register_ica"));
        },
        TickStep::Wait => return Ok(res.add_attribute("action", "wait")),
        TickStep::Expired => return Ok(res.add_attribute("action", "registration_timeout")),
        TickStep::Ready {
            address,
            controller_connection_id,
        } => (address, controller_connection_id),
    };

    // ICA channels are ordered: once a tx times out, nothing goes through
    // until the channel is reopened
    let mut channel = ICA_CHANNEL.load(deps.storage)?;
    let channel_step = channel.advance(env.block.time, remote.ica_timeout.u64());
    ICA_CHANNEL.save(deps.storage, &channel)?;

    match channel_step {
        ChannelStep::Reopen => {
            return Ok(register_ica(res, &env, remote.connection_id).add_attribute("action", "reopen_ica"));
        },
        ChannelStep::Wait => return Ok(res.add_attribute("action", "wait_reopen")),
        ChannelStep::Expired => return Ok(res.add_attribute("action", "reopen_timeout")),
        ChannelStep::Usable => (),
    }

    match BALANCE_QUERY_ID.may_load(deps.storage)? {
        None => {
            let register = new_register_balance_query_msg(
                remote.connection_id,
                address.clone(),
                remote.denom,
                BALANCE_QUERY_UPDATE_PERIOD,
            )?;
            Ok(res
                .add_submessage(SubMsg::reply_on_success(register, AFTER_BALANCE_QUERY_REGISTERED))
                .add_attribute("action", "register_balance_query")
                .add_attribute("ica", address))
        },
        Some(query_id) => {
            let reading = ica_balance(deps.as_ref(), env.clone(), query_id, &remote.denom)?;
            forward(deps, env, res, remote, address, controller_connection_id, reading)
        },
    }
}

/// Registering an ICA that already exists on the same port reopens its
/// channel, keeping the address.
fn register_ica(res: Response<NeutronMsg>, env: &Env, connection_id: String) -> Response<NeutronMsg> {
    let port_id = get_port_id(env.contract.address.as_str(), INTERCHAIN_ACCOUNT_ID);
    res.add_message(NeutronMsg::register_interchain_account(
        connection_id,
        INTERCHAIN_ACCOUNT_ID.to_string(),
    ))
    .add_attribute("port_id", port_id)
}

/// Latest balance of the ICA in `denom`, as submitted by the ICQ relayer
fn ica_balance(
    deps:     Deps<NeutronQuery>,
    env:      Env,
    query_id: u64,
    denom:    &str,
) -> Result<BalanceReading> {
    let res = query_balance(deps, env, query_id)?;
    let amount = res
        .balances
        .coins
        .into_iter()
        .find(|coin| coin.denom == denom)
        .map(|coin| coin.amount)
        .unwrap_or_default();

    Ok(BalanceReading {
        amount,
        height: res.last_submitted_local_height,
    })
}

/// Send the ICA's whole balance to the next contract's deposit address.
pub fn forward(
    deps: DepsMut<NeutronQuery>,
    env: Env,
    res: Response<NeutronMsg>,
    remote: RemoteChainInfo,
    ica_address: String,
    controller_connection_id: String,
    reading: BalanceReading,
) -> Result<Response<NeutronMsg>> {
    let next_contract = NEXT_CONTRACT.load(deps.storage)?;
    let destination: String = deps
        .querier
        .query_wasm_smart(&next_contract, &splitter::QueryMsg::DepositAddress {})
        .map_err(|_| ContractError::NextContractNotReady {
            next_contract: next_contract.to_string(),
        })?;

    let last_forwarded_height = LAST_FORWARDED_HEIGHT.may_load(deps.storage)?;
    let Some(amount) = forward_amount(&reading, last_forwarded_height) else {
        return Ok(res
            .add_attribute("action", "idle")
            .add_attribute("balance", reading.amount)
            .add_attribute("balance_height", reading.height.to_string()));
    };

    let transfer = PendingTransfer {
        source:      ica_address,
        destination: destination.clone(),
        denom:       remote.denom.clone(),
        amount,
        deadline:    remote.transfer_deadline(env.block.time),
    };

    let submit = NeutronMsg::submit_tx(
        controller_connection_id,
        INTERCHAIN_ACCOUNT_ID.to_string(),
        vec![transfer_msg(&remote.channel_id, &transfer)],
        String::new(),
        remote.ica_timeout.u64(),
        ibc_fee(),
    );

    SUBMITTING.save(deps.storage, &transfer)?;
    LAST_FORWARDED_HEIGHT.save(deps.storage, &reading.height)?;

    Ok(res
        .add_submessage(SubMsg::reply_on_success(submit, AFTER_TRANSFER_SUBMITTED))
        .add_attribute("action", "forward")
        .add_attribute("amount", amount)
        .add_attribute("receiver", destination))
}

/// ICS-20 transfer out of the ICA, wrapped for an ICA tx
pub fn transfer_msg(channel_id: &str, transfer: &PendingTransfer) -> ProtobufAny {
    let msg = MsgTransfer {
        source_port:       TRANSFER_PORT.to_string(),
        source_channel:    channel_id.to_string(),
        token:             Some(ProtoCoin {
            denom:  transfer.denom.clone(),
            amount: transfer.amount.to_string(),
        }),
        sender:            transfer.source.clone(),
        receiver:          transfer.destination.clone(),
        timeout_height:    None,
        timeout_timestamp: transfer.deadline.nanos(),
    };

    ProtobufAny {
        type_url: MSG_TRANSFER_TYPE_URL.to_string(),
        value:    Binary::from(msg.encode_to_vec()),
    }
}

fn ibc_fee() -> IbcFee {
    IbcFee {
        // must be empty
        recv_fee:    vec![],
        ack_fee:     coins(ACK_FEE_AMOUNT, FEE_DENOM),
        timeout_fee: coins(TIMEOUT_FEE_AMOUNT, FEE_DENOM),
    }
}

fn reply_data(result: SubMsgResult) -> Result<Binary> {
    result
        .into_result()
        .map_err(StdError::generic_err)?
        .data
        .ok_or_else(|| StdError::generic_err("reply carries no data").into())
}

pub fn after_balance_query_registered(
    deps: DepsMut<NeutronQuery>,
    result: SubMsgResult,
) -> Result<Response<NeutronMsg>> {
    let data = reply_data(result)?;
    let MsgRegisterInterchainQueryResponse { id } = serde_json_wasm::from_slice(&data)
        .map_err(|err| StdError::generic_err(format!("failed to parse query registration: {err}")))?;

    BALANCE_QUERY_ID.save(deps.storage, &id)?;

    Ok(Response::new()
        .add_attribute("method", "after_balance_query_registered")
        .add_attribute("query_id", id.to_string()))
}

pub fn after_transfer_submitted(
    deps: DepsMut<NeutronQuery>,
    result: SubMsgResult,
) -> Result<Response<NeutronMsg>> {
    let data = reply_data(result)?;
    let MsgSubmitTxResponse { sequence_id, channel } = serde_json_wasm::from_slice(&data)
        .map_err(|err| StdError::generic_err(format!("failed to parse tx submission: {err}")))?;

    deps.api.debug(&format!("WASMDEBUG: transfer submitted as packet {channel}/{sequence_id}"));

    let transfer = SUBMITTING.load(deps.storage)?;
    SUBMITTING.remove(deps.storage);
    PENDING_TRANSFERS.save(deps.storage, (&channel, sequence_id), &transfer)?;

    Ok(Response::new()
        .add_attribute("method", "after_transfer_submitted")
        .add_attribute("channel_id", channel)
        .add_attribute("sequence", sequence_id.to_string()))
}

// ----------------------------------- Tests -----------------------------------
