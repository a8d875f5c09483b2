use cosmwasm_schema::cw_serde;
use cosmwasm_std::{HexBinary, IbcEndpoint};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Prefix of every ICS-20 voucher denom.
pub const IBC_DENOM_PREFIX: &str = "ibc";

/// DenomTrace is the record of port/channel hops a token has crossed to arrive
/// at the current chain, plus its original denom.
#[cw_serde]
pub struct DenomTrace {
    /// Hops as seen from the receiving chain.
    ///
    /// The most recent hop comes first. For a token travelling
    ///
    ///   chainC --> chainB --> chainA
    ///
    /// the path on chain A is \[A's channel to B, B's channel to C\].
    ///
    /// Note, this is the ICS-20 convention, where the latest hop is prefixed
    /// to the beginning of the trace.
    pub path: Vec<IbcEndpoint>,

    /// The token's denom on its origin chain
    pub base_denom: String,
}

impl DenomTrace {
    pub fn new(base_denom: impl Into<String>) -> Self {
        Self {
            path:       vec![],
            base_denom: base_denom.into(),
        }
    }

    /// Record one more hop. The hop becomes the outermost one.
    pub fn received_via(mut self, port_id: impl Into<String>, channel_id: impl Into<String>) -> Self {
        self.path.insert(0, IbcEndpoint {
            port_id:    port_id.into(),
            channel_id: channel_id.into(),
        });
        self
    }

    /// `port/channel/.../base_denom`
    pub fn full_path(&self) -> String {
        self.path
            .iter()
            .map(|hop| format!("{}/{}/", hop.port_id, hop.channel_id))
            .chain(std::iter::once(self.base_denom.clone()))
            .collect()
    }

    /// The denom a token with this trace carries on the receiving chain.
    pub fn ibc_denom(&self) -> Result<String> {
        self.validate()?;

        if self.path.is_empty() {
            return Ok(self.base_denom.clone());
        }

        Ok(format!("{IBC_DENOM_PREFIX}/{}", hash_path(&self.full_path())))
    }

    fn validate(&self) -> Result<()> {
        if self.base_denom.is_empty() {
            return Err(Error::MalformedTrace {
                reason: "base denom is empty".into(),
            });
        }

        for (idx, hop) in self.path.iter().enumerate() {
            if hop.port_id.is_empty() || hop.channel_id.is_empty() {
                return Err(Error::MalformedTrace {
                    reason: format!("hop {idx} is missing a port or channel id"),
                });
            }
        }

        Ok(())
    }
}

/// Derive the denom of `base_denom` after it crossed `hops`, listed receiving
/// chain first.
pub fn resolve(hops: &[IbcEndpoint], base_denom: &str) -> Result<String> {
    DenomTrace {
        path:       hops.to_vec(),
        base_denom: base_denom.into(),
    }
    .ibc_denom()
}

/// Upper-case hex SHA-256 of the trace path, as ibc-go's transfer module
/// renders it.
fn hash_path(full_path: &str) -> String {
    let hash: HexBinary = Sha256::digest(full_path.as_bytes()).to_vec().into();
    hash.to_hex().to_uppercase()
}

// ----------------------------------- Tests -----------------------------------
