//! Turns the relayer's view of the world (raw channel listings per chain plus
//! the connection ids it created) into an explicit `Topology`, and the
//! topology into the messages that deploy the splitter and the forwarders.

use std::collections::BTreeMap;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{IbcEndpoint, Uint128, Uint64};

use crate::{
    denom::DenomTrace,
    error::{Error, Result},
    forwarder,
    split::{DenomSplit, Receiver, RemainderPolicy, SplitConfig, SplitType},
    splitter,
    topology::{find_channel_pair, ChannelClass, ChannelInfo, ConnectionPair},
};

/// A connection the relayer created between two chains, and the kind of
/// channel expected on top of it.
#[cw_serde]
pub struct LinkSpec {
    pub chain_a:     String,
    pub chain_b:     String,
    pub connections: ConnectionPair,
    pub class:       ChannelClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LinkEnd {
    connection_id: String,
    channel:       IbcEndpoint,
}

/// Resolved channels, keyed by (chain, counterparty chain).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Topology {
    transfer: BTreeMap<(String, String), LinkEnd>,
    ccv:      BTreeMap<(String, String), LinkEnd>,
}

/// Resolve every link against the chains' channel listings.
///
/// Fails with `ChannelNotFound` on the first link whose channel handshake
/// hasn't completed; the whole resolution can be retried later.
pub fn resolve_topology(
    listings: &BTreeMap<String, Vec<ChannelInfo>>,
    links: &[LinkSpec],
) -> Result<Topology> {
    let mut topology = Topology::default();

    for link in links {
        let channels_a = channels_of(listings, &link.chain_a)?;
        let channels_b = channels_of(listings, &link.chain_b)?;
        let pair = find_channel_pair(link.class, channels_a, channels_b, &link.connections)?;

        let map = match link.class {
            ChannelClass::Transfer => &mut topology.transfer,
            ChannelClass::Ccv      => &mut topology.ccv,
        };

        map.insert((link.chain_a.clone(), link.chain_b.clone()), LinkEnd {
            connection_id: link.connections.connection_a.clone(),
            channel:       pair.channel_a,
        });
        map.insert((link.chain_b.clone(), link.chain_a.clone()), LinkEnd {
            connection_id: link.connections.connection_b.clone(),
            channel:       pair.channel_b,
        });
    }

    Ok(topology)
}

fn channels_of<'a>(
    listings: &'a BTreeMap<String, Vec<ChannelInfo>>,
    chain: &str,
) -> Result<&'a [ChannelInfo]> {
    listings
        .get(chain)
        .map(Vec::as_slice)
        .ok_or_else(|| Error::UnknownChain {
            chain: chain.into(),
        })
}

impl Topology {
    /// Transfer channel on `chain` leading to `counterparty`
    pub fn transfer_channel(&self, chain: &str, counterparty: &str) -> Result<&IbcEndpoint> {
        self.transfer_end(chain, counterparty).map(|end| &end.channel)
    }

    /// Connection on `chain` carrying the transfer channel to `counterparty`
    pub fn transfer_connection(&self, chain: &str, counterparty: &str) -> Result<&str> {
        self.transfer_end(chain, counterparty).map(|end| end.connection_id.as_str())
    }

    /// CCV channel on `chain` leading to `counterparty`, if the two are in a
    /// provider/consumer relationship
    pub fn ccv_channel(&self, chain: &str, counterparty: &str) -> Option<&IbcEndpoint> {
        self.ccv
            .get(&(chain.to_string(), counterparty.to_string()))
            .map(|end| &end.channel)
    }

    /// Denom of `base_denom` after travelling along `route`, a list of chain
    /// names from the token's origin to its destination.
    pub fn ibc_denom(&self, route: &[&str], base_denom: &str) -> Result<String> {
        let mut trace = DenomTrace::new(base_denom);

        for hop in route.windows(2) {
            let (sender, receiver) = (hop[0], hop[1]);
            let channel = self.transfer_channel(receiver, sender)?;
            trace = trace.received_via(&channel.port_id, &channel.channel_id);
        }

        trace.ibc_denom()
    }

    fn transfer_end(&self, chain: &str, counterparty: &str) -> Result<&LinkEnd> {
        self.transfer
            .get(&(chain.to_string(), counterparty.to_string()))
            .ok_or_else(|| Error::MissingTransferChannel {
                chain:        chain.into(),
                counterparty: counterparty.into(),
            })
    }
}

// -------------------------------- deployment ---------------------------------

#[cw_serde]
pub struct Timeouts {
    pub ica_timeout:          Uint64,
    pub ibc_transfer_timeout: Uint64,
}

/// Builds instantiate messages for a deployment on `local_chain`.
pub struct Deployment<'a> {
    pub topology:    &'a Topology,
    pub local_chain: String,
    pub timeouts:    Timeouts,
}

impl Deployment<'_> {
    /// Forwarder pulling `remote_denom` out of an ICA on `remote_chain` and
    /// sending it to `next_contract`.
    pub fn forwarder_msg(
        &self,
        remote_chain: &str,
        remote_denom: &str,
        next_contract: &str,
    ) -> Result<forwarder::InstantiateMsg> {
        Ok(forwarder::InstantiateMsg {
            next_contract:              next_contract.into(),
            remote_chain_connection_id: self.topology.transfer_connection(&self.local_chain, remote_chain)?.into(),
            remote_chain_channel_id:    self.topology.transfer_channel(remote_chain, &self.local_chain)?.channel_id.clone(),
            denom:                      remote_denom.into(),
            ibc_transfer_timeout:       self.timeouts.ibc_transfer_timeout,
            ica_timeout:                self.timeouts.ica_timeout,
        })
    }

    /// The denom under which tokens forwarded from `remote_chain` arrive
    pub fn forwarded_denom(&self, remote_chain: &str, remote_denom: &str) -> Result<String> {
        self.topology.ibc_denom(&[remote_chain, self.local_chain.as_str()], remote_denom)
    }

    /// Splitter distributing each denom among `(address, share)` receivers.
    /// Splits are validated here so that a bad deployment fails before
    /// anything is sent to the chain.
    pub fn splitter_msg(
        &self,
        splits: Vec<(String, Vec<(String, u128)>)>,
        fallback: Option<Vec<(String, u128)>>,
        remainder_policy: Option<RemainderPolicy>,
    ) -> Result<splitter::InstantiateMsg> {
        let splits = splits
            .into_iter()
            .map(|(denom, receivers)| {
                Ok(DenomSplit {
                    denom,
                    split: SplitType::Custom(split_config(receivers)?),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let fallback_split = fallback
            .map(|receivers| split_config(receivers).map(SplitType::Custom))
            .transpose()?;

        Ok(splitter::InstantiateMsg {
            splits,
            fallback_split,
            remainder_policy,
        })
    }
}

fn split_config(receivers: Vec<(String, u128)>) -> Result<SplitConfig> {
    SplitConfig {
        receivers: receivers
            .into_iter()
            .map(|(addr, share)| Receiver {
                addr,
                share: Uint128::new(share),
            })
            .collect(),
    }
    .validate()
}

// ----------------------------------- Tests -----------------------------------
