use tessera_types::{Address, Amount, Event};

/// Events emitted by the token ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    Transfer {
        from: Address,
        to: Address,
        value: Amount,
    },
    Approval {
        owner: Address,
        spender: Address,
        value: Amount,
    },
    DelegateChanged {
        delegator: Address,
        from_delegate: Option<Address>,
        to_delegate: Option<Address>,
    },
    DelegateVotesChanged {
        delegate: Address,
        previous_votes: Amount,
        new_votes: Amount,
    },
}

impl Event for TokenEvent {
    fn name(&self) -> &'static str {
        match self {
            TokenEvent::Transfer { .. } => "Transfer",
            TokenEvent::Approval { .. } => "Approval",
            TokenEvent::DelegateChanged { .. } => "DelegateChanged",
            TokenEvent::DelegateVotesChanged { .. } => "DelegateVotesChanged",
        }
    }
}
