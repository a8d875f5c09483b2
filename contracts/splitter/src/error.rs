use cosmwasm_std::{OverflowError, StdError};

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ContractError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    Overflow(#[from] OverflowError),

    #[error(transparent)]
    Guild(#[from] protocol_guild::Error),

    #[error("unknown reply id: {0}")]
    UnknownReplyId(u64),
}

pub type Result<T> = core::result::Result<T, ContractError>;
