use cosmwasm_schema::cw_serde;
use cosmwasm_std::{DepsMut, Env, Response, StdError, Storage};
use neutron_sdk::{
    bindings::{msg::NeutronMsg, query::NeutronQuery},
    interchain_txs::helpers::get_port_id,
    sudo::msg::{RequestPacket, SudoMsg},
};
use protocol_guild::forwarder::PendingTransfer;

use crate::{
    error::{ContractError, Result},
    state::{ICA_CHANNEL, ICA_STATE, PENDING_TRANSFERS, REMOTE_CHAIN_INFO},
    INTERCHAIN_ACCOUNT_ID,
};

/// Version string the host chain sends back when the ICA channel opens
#[cw_serde]
struct OpenAckVersion {
    version:                  String,
    controller_connection_id: String,
    host_connection_id:       String,
    address:                  String,
    encoding:                 String,
    tx_type:                  String,
}

pub fn sudo(deps: DepsMut<NeutronQuery>, env: Env, msg: SudoMsg) -> Result<Response<NeutronMsg>> {
    match msg {
        SudoMsg::OpenAck {
            port_id,
            counterparty_version,
            ..
        } => open_ack(deps, env, port_id, counterparty_version),
        SudoMsg::Response {
            request,
            ..
        } => transfer_acknowledged(deps, request),
        SudoMsg::Error {
            request,
            details,
        } => transfer_failed(deps, request, details),
        SudoMsg::Timeout {
            request,
        } => transfer_timed_out(deps, request),
        _ => Ok(Response::new().add_attribute("method", "sudo")),
    }
}

fn open_ack(
    deps: DepsMut<NeutronQuery>,
    env: Env,
    port_id: String,
    counterparty_version: String,
) -> Result<Response<NeutronMsg>> {
    let expected = get_port_id(env.contract.address.as_str(), INTERCHAIN_ACCOUNT_ID);
    if port_id != expected {
        return Err(ContractError::UnexpectedPort {
            port_id,
            expected,
        });
    }

    let version: OpenAckVersion = serde_json_wasm::from_str(&counterparty_version).map_err(|err| {
        ContractError::InvalidOpenAckVersion {
            reason: err.to_string(),
        }
    })?;

    let mut ica = ICA_STATE.load(deps.storage)?;
    ica.on_confirmed(version.address.clone(), version.controller_connection_id);
    ICA_STATE.save(deps.storage, &ica)?;

    // also the answer to a reopen after a timeout
    let mut channel = ICA_CHANNEL.load(deps.storage)?;
    channel.on_open_ack();
    ICA_CHANNEL.save(deps.storage, &channel)?;

    deps.api.debug(&format!("WASMDEBUG: ica opened at {}", version.address));

    Ok(Response::new()
        .add_attribute("method", "sudo_open_ack")
        .add_attribute("ica", version.address))
}

/// Packet id the callback refers to. Neutron always fills these in for ICA
/// txs, a missing one means the callback isn't for us.
fn packet_id(request: &RequestPacket) -> Result<(String, u64)> {
    let channel_id = request
        .source_channel
        .clone()
        .ok_or_else(|| StdError::generic_err("channel_id not found"))?;
    let sequence = request
        .sequence
        .ok_or_else(|| StdError::generic_err("sequence not found"))?;
    Ok((channel_id, sequence))
}

/// Stop tracking the transfer the callback refers to
fn settle(
    storage: &mut dyn Storage,
    request: &RequestPacket,
) -> Result<(String, u64, Option<PendingTransfer>)> {
    let (channel_id, sequence) = packet_id(request)?;
    let transfer = PENDING_TRANSFERS.may_load(storage, (&channel_id, sequence))?;
    PENDING_TRANSFERS.remove(storage, (&channel_id, sequence));
    Ok((channel_id, sequence, transfer))
}

fn transfer_acknowledged(
    deps: DepsMut<NeutronQuery>,
    request: RequestPacket,
) -> Result<Response<NeutronMsg>> {
    let (channel_id, sequence, transfer) = settle(deps.storage, &request)?;

    let mut res = Response::new()
        .add_attribute("method", "sudo_response")
        .add_attribute("channel_id", channel_id)
        .add_attribute("sequence", sequence.to_string());

    if let Some(transfer) = transfer {
        res = res
            .add_attribute("amount", transfer.amount)
            .add_attribute("receiver", transfer.destination);
    }

    Ok(res)
}

/// The ICA tx failed on the remote chain. The funds never left the ICA and
/// go out with the next balance reading.
fn transfer_failed(
    deps: DepsMut<NeutronQuery>,
    request: RequestPacket,
    details: String,
) -> Result<Response<NeutronMsg>> {
    let (channel_id, sequence, transfer) = settle(deps.storage, &request)?;
    let denom = REMOTE_CHAIN_INFO.load(deps.storage)?.denom;
    let amount = transfer.map(|transfer| transfer.amount).unwrap_or_default();

    deps.api.debug(&format!(
        "WASMDEBUG: forwarding {amount}{denom} failed in packet {channel_id}/{sequence}: {details}"
    ));

    Ok(Response::new()
        .add_attribute("method", "sudo_error")
        .add_attribute("denom", denom)
        .add_attribute("channel_id", channel_id)
        .add_attribute("sequence", sequence.to_string())
        .add_attribute("error", details))
}

/// The ICA tx timed out, which closes its ordered channel. The funds never
/// left the ICA; they go out once the next tick has reopened the channel.
fn transfer_timed_out(
    deps: DepsMut<NeutronQuery>,
    request: RequestPacket,
) -> Result<Response<NeutronMsg>> {
    let (channel_id, sequence, _) = settle(deps.storage, &request)?;

    let mut channel = ICA_CHANNEL.load(deps.storage)?;
    channel.on_timeout();
    ICA_CHANNEL.save(deps.storage, &channel)?;

    deps.api.debug(&format!("WASMDEBUG: packet {channel_id}/{sequence} timed out, channel closed"));

    Ok(Response::new()
        .add_attribute("method", "sudo_timeout")
        .add_attribute("channel_id", channel_id)
        .add_attribute("sequence", sequence.to_string()))
}

// ----------------------------------- Tests -----------------------------------
