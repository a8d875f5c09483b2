use cosmwasm_schema::cw_serde;
use cosmwasm_std::Timestamp;

/// Lifecycle of the interchain account owned by a forwarder.
#[cw_serde]
pub enum IcaState {
    /// No registration request is outstanding
    Unregistered,

    /// A registration request was sent; the channel handshake has not
    /// completed yet. Past `deadline` the request is considered lost.
    Registering {
        deadline: Timestamp,
    },

    /// The account exists on the remote chain. Never reverts.
    Active {
        address:                  String,
        controller_connection_id: String,
    },
}

/// What the owner of an ICA should do on a tick, given the account's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickStep {
    /// A registration request must be emitted
    Register,

    /// Registration is in flight
    Wait,

    /// Registration timed out; the next tick registers again
    Expired,

    /// The account is usable
    Ready {
        address:                  String,
        controller_connection_id: String,
    },
}

impl IcaState {
    /// Move to `Registering`. Returns whether a registration request needs to
    /// be sent, i.e. false if one is already in flight or the account exists.
    pub fn register(&mut self, deadline: Timestamp) -> bool {
        if *self != IcaState::Unregistered {
            return false;
        }

        *self = IcaState::Registering {
            deadline,
        };
        true
    }

    /// The remote chain confirmed the account. A confirmation arriving after
    /// the registration timed out is still honoured, the address is real.
    /// Confirmations for an already active account are ignored.
    pub fn on_confirmed(&mut self, address: String, controller_connection_id: String) {
        if self.is_active() {
            return;
        }

        *self = IcaState::Active {
            address,
            controller_connection_id,
        };
    }

    pub fn on_timeout(&mut self) {
        if let IcaState::Registering { .. } = self {
            *self = IcaState::Unregistered;
        }
    }

    /// Advance the lifecycle by one tick. `now` is the current block time,
    /// `timeout_secs` is how long a registration may stay in flight.
    pub fn advance(&mut self, now: Timestamp, timeout_secs: u64) -> TickStep {
        match self {
            IcaState::Unregistered => {
                self.register(now.plus_seconds(timeout_secs));
                TickStep::Register
            },
            IcaState::Registering { deadline } => {
                if now >= *deadline {
                    self.on_timeout();
                    TickStep::Expired
                } else {
                    TickStep::Wait
                }
            },
            IcaState::Active { address, controller_connection_id } => TickStep::Ready {
                address:                  address.clone(),
                controller_connection_id: controller_connection_id.clone(),
            },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, IcaState::Active { .. })
    }

    /// The remote address, once the account is active
    pub fn address(&self) -> Option<&str> {
        match self {
            IcaState::Active { address, .. } => Some(address),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IcaState::Unregistered       => "unregistered",
            IcaState::Registering { .. } => "registering",
            IcaState::Active { .. }      => "active",
        }
    }
}

/// The ordered channel under an active ICA. A tx timing out closes it, and
/// registering the account again on the same port reopens it with the same
/// address.
#[cw_serde]
#[derive(Default)]
pub enum IcaChannel {
    #[default]
    Open,

    /// Closed by a timeout; the next tick requests a reopen
    Closed,

    /// A reopen was requested; past `deadline` the request is considered lost
    Reopening {
        deadline: Timestamp,
    },
}

/// What the owner of an active ICA should do with its channel on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStep {
    /// Txs can be submitted
    Usable,

    /// The account must be registered again to reopen the channel
    Reopen,

    /// Reopen is in flight
    Wait,

    /// Reopen timed out; the next tick requests it again
    Expired,
}

impl IcaChannel {
    pub fn on_timeout(&mut self) {
        *self = IcaChannel::Closed;
    }

    pub fn on_open_ack(&mut self) {
        *self = IcaChannel::Open;
    }

    pub fn advance(&mut self, now: Timestamp, timeout_secs: u64) -> ChannelStep {
        match self {
            IcaChannel::Open => ChannelStep::Usable,
            IcaChannel::Closed => {
                *self = IcaChannel::Reopening {
                    deadline: now.plus_seconds(timeout_secs),
                };
                ChannelStep::Reopen
            },
            IcaChannel::Reopening { deadline } => {
                if now >= *deadline {
                    *self = IcaChannel::Closed;
                    ChannelStep::Expired
                } else {
                    ChannelStep::Wait
                }
            },
        }
    }
}

// ----------------------------------- Tests -----------------------------------
