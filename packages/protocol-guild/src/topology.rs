use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::IbcEndpoint;

use crate::error::{Error, Result};

/// Port bound by the ICS-20 transfer module
pub const TRANSFER_PORT: &str = "transfer";

/// Ports bound by the interchain security modules
pub const PROVIDER_PORT: &str = "provider";
pub const CONSUMER_PORT: &str = "consumer";

// ---------------------------------- listing ----------------------------------

/// One entry of a chain's channel listing, in the shape the relayer prints it.
#[cw_serde]
pub struct ChannelInfo {
    pub state:           ChannelState,
    pub ordering:        ChannelOrder,
    pub counterparty:    IbcEndpoint,
    pub connection_hops: Vec<String>,
    pub version:         String,
    pub port_id:         String,
    pub channel_id:      String,
}

impl ChannelInfo {
    /// The connection the channel is built on. Multihop channels are not a
    /// thing on the chains we deal with, so this is the first hop.
    pub fn connection_id(&self) -> Option<&str> {
        self.connection_hops.first().map(String::as_str)
    }

    pub fn is_open(&self) -> bool {
        self.state == ChannelState::Open
    }
}

#[cw_serde]
pub enum ChannelState {
    #[serde(rename = "STATE_UNINITIALIZED_UNSPECIFIED")]
    Uninitialized,
    #[serde(rename = "STATE_INIT")]
    Init,
    #[serde(rename = "STATE_TRYOPEN")]
    TryOpen,
    #[serde(rename = "STATE_OPEN")]
    Open,
    #[serde(rename = "STATE_CLOSED")]
    Closed,
}

#[cw_serde]
pub enum ChannelOrder {
    #[serde(rename = "ORDER_NONE_UNSPECIFIED")]
    Unspecified,
    #[serde(rename = "ORDER_UNORDERED")]
    Unordered,
    #[serde(rename = "ORDER_ORDERED")]
    Ordered,
}

// ----------------------------------- class -----------------------------------

/// The application a channel belongs to.
#[cw_serde]
#[derive(Copy)]
pub enum ChannelClass {
    /// ICS-20 fungible token transfer
    Transfer,

    /// Cross-chain validation, between a provider chain and its consumer
    Ccv,
}

impl ChannelClass {
    pub fn accepts(&self, channel: &ChannelInfo) -> bool {
        match self {
            ChannelClass::Transfer => channel.port_id == TRANSFER_PORT,
            ChannelClass::Ccv => {
                (channel.port_id == PROVIDER_PORT || channel.port_id == CONSUMER_PORT)
                    && channel.ordering == ChannelOrder::Ordered
            },
        }
    }
}

impl fmt::Display for ChannelClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelClass::Transfer => write!(f, "transfer"),
            ChannelClass::Ccv      => write!(f, "ccv"),
        }
    }
}

// ----------------------------------- pairs -----------------------------------

/// The two ends of a connection between chain A and chain B.
#[cw_serde]
pub struct ConnectionPair {
    pub connection_a: String,
    pub connection_b: String,
}

impl ConnectionPair {
    pub fn new(connection_a: impl Into<String>, connection_b: impl Into<String>) -> Self {
        Self {
            connection_a: connection_a.into(),
            connection_b: connection_b.into(),
        }
    }

    pub fn flipped(&self) -> Self {
        Self {
            connection_a: self.connection_b.clone(),
            connection_b: self.connection_a.clone(),
        }
    }
}

/// A channel on chain A together with its counterparty on chain B.
#[cw_serde]
pub struct ChannelPair {
    pub channel_a: IbcEndpoint,
    pub channel_b: IbcEndpoint,
}

impl ChannelPair {
    pub fn flipped(&self) -> Self {
        Self {
            channel_a: self.channel_b.clone(),
            channel_b: self.channel_a.clone(),
        }
    }
}

// ---------------------------------- lookup -----------------------------------

pub fn find_transfer_channel(
    channels_a: &[ChannelInfo],
    channels_b: &[ChannelInfo],
    connections: &ConnectionPair,
) -> Result<ChannelPair> {
    find_channel_pair(ChannelClass::Transfer, channels_a, channels_b, connections)
}

pub fn find_ccv_channel(
    channels_a: &[ChannelInfo],
    channels_b: &[ChannelInfo],
    connections: &ConnectionPair,
) -> Result<ChannelPair> {
    find_channel_pair(ChannelClass::Ccv, channels_a, channels_b, connections)
}

/// Find the open channel of the given class on chain A, over connection
/// `connection_a`, whose counterparty is an open channel of the same class on
/// chain B over `connection_b` that points back to it.
///
/// Returns `ChannelNotFound` if the relayer hasn't finished the handshake yet;
/// callers are expected to retry later.
pub fn find_channel_pair(
    class: ChannelClass,
    channels_a: &[ChannelInfo],
    channels_b: &[ChannelInfo],
    connections: &ConnectionPair,
) -> Result<ChannelPair> {
    let qualifies = |channel: &&ChannelInfo, connection_id: &str| {
        channel.is_open()
            && class.accepts(channel)
            && channel.connection_id() == Some(connection_id)
    };

    channels_a
        .iter()
        .filter(|a| qualifies(a, connections.connection_a.as_str()))
        .find_map(|a| {
            channels_b
                .iter()
                .filter(|b| qualifies(b, connections.connection_b.as_str()))
                .find(|b| {
                    a.counterparty.channel_id == b.channel_id
                        && a.counterparty.port_id == b.port_id
                        && b.counterparty.channel_id == a.channel_id
                        && b.counterparty.port_id == a.port_id
                })
                .map(|b| ChannelPair {
                    channel_a: IbcEndpoint {
                        port_id:    a.port_id.clone(),
                        channel_id: a.channel_id.clone(),
                    },
                    channel_b: IbcEndpoint {
                        port_id:    b.port_id.clone(),
                        channel_id: b.channel_id.clone(),
                    },
                })
        })
        .ok_or_else(|| Error::ChannelNotFound {
            class,
            connection_a: connections.connection_a.clone(),
            connection_b: connections.connection_b.clone(),
        })
}

// ----------------------------------- Tests -----------------------------------
