use cosmwasm_std::StdError;
use cw_utils::PaymentError;
use neutron_sdk::NeutronError;

#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Neutron(#[from] NeutronError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error(transparent)]
    Guild(#[from] protocol_guild::Error),

    #[error("interchain account is not active yet")]
    IcaNotReady,

    #[error("next contract `{next_contract}` can't provide a deposit address yet")]
    NextContractNotReady {
        next_contract: String,
    },

    #[error("ica_timeout and ibc_transfer_timeout must be non-zero")]
    ZeroTimeout,

    #[error("unknown reply id: {0}")]
    UnknownReplyId(u64),

    #[error("received open ack for port `{port_id}`, expecting `{expected}`")]
    UnexpectedPort {
        port_id:  String,
        expected: String,
    },

    #[error("can't parse counterparty version: {reason}")]
    InvalidOpenAckVersion {
        reason: String,
    },
}

pub type Result<T> = core::result::Result<T, ContractError>;
