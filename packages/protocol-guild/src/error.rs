use cosmwasm_std::OverflowError;

use crate::topology::ChannelClass;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Overflow(#[from] OverflowError),

    #[error("malformed denom trace: {reason}")]
    MalformedTrace {
        reason: String,
    },

    #[error("no open {class} channel pair found for connections `{connection_a}` <> `{connection_b}`")]
    ChannelNotFound {
        class:        ChannelClass,
        connection_a: String,
        connection_b: String,
    },

    #[error("chain `{chain}` is not part of the topology")]
    UnknownChain {
        chain: String,
    },

    #[error("no transfer channel resolved from `{chain}` towards `{counterparty}`")]
    MissingTransferChannel {
        chain:        String,
        counterparty: String,
    },

    #[error("misconfigured split: {reason}")]
    SplitMisconfig {
        reason: String,
    },
}

pub type Result<T> = core::result::Result<T, Error>;
