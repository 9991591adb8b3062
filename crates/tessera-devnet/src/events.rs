//! Transaction logs.
//!
//! Every devnet transaction returns a receipt carrying the events its
//! components emitted: token events first, then timelock, governor,
//! airdrop and box, each in emission order. Generated values such as the
//! proposal id are read back by scanning the log for an event by name.

use tessera_airdrop::AirdropEvent;
use tessera_governance::{GovernorEvent, TimelockEvent};
use tessera_token::TokenEvent;
use tessera_types::{BlockContext, Event, Hash};

use crate::error::DevnetError;
use crate::value_box::BoxEvent;

/// One emitted event, tagged by the component that emitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Log {
    Token(TokenEvent),
    Timelock(TimelockEvent),
    Governor(GovernorEvent),
    Airdrop(AirdropEvent),
    Box(BoxEvent),
}

impl Event for Log {
    fn name(&self) -> &'static str {
        match self {
            Log::Token(e) => e.name(),
            Log::Timelock(e) => e.name(),
            Log::Governor(e) => e.name(),
            Log::Airdrop(e) => e.name(),
            Log::Box(e) => e.name(),
        }
    }
}

/// First event in `logs` called `name`.
pub fn find_event<'a>(logs: &'a [Log], name: &str) -> Result<&'a Log, DevnetError> {
    logs.iter()
        .find(|log| log.name() == name)
        .ok_or_else(|| DevnetError::EventNotFound(name.to_string()))
}

/// Outcome of a successful transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Block the transaction was included in
    pub block: BlockContext,
    pub logs: Vec<Log>,
}

impl Receipt {
    pub fn find_event(&self, name: &str) -> Result<&Log, DevnetError> {
        find_event(&self.logs, name)
    }

    pub fn event_names(&self) -> Vec<&'static str> {
        self.logs.iter().map(|log| log.name()).collect()
    }

    /// Id carried by the `ProposalCreated` event.
    pub fn proposal_id(&self) -> Result<Hash, DevnetError> {
        match self.find_event("ProposalCreated")? {
            Log::Governor(GovernorEvent::ProposalCreated { id, .. }) => Ok(*id),
            _ => Err(DevnetError::EventNotFound("ProposalCreated".to_string())),
        }
    }
}
