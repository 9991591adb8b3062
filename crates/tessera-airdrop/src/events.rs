use tessera_types::{Address, Amount, Event};

/// Events emitted by the claim ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirdropEvent {
    Claimed { account: Address, amount: Amount },
}

impl Event for AirdropEvent {
    fn name(&self) -> &'static str {
        match self {
            AirdropEvent::Claimed { .. } => "Claimed",
        }
    }
}
