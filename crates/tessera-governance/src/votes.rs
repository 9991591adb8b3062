use tessera_token::{TokenError, VotingPowerLedger};
use tessera_types::{Address, Amount, BlockContext, Timepoint};

/// Historical voting power as seen by the governor.
pub trait Votes {
    fn past_votes(
        &self,
        ctx: &BlockContext,
        account: &Address,
        timepoint: Timepoint,
    ) -> Result<Amount, TokenError>;

    fn past_total_supply(&self, ctx: &BlockContext, timepoint: Timepoint) -> Result<Amount, TokenError>;
}

impl Votes for VotingPowerLedger {
    fn past_votes(
        &self,
        ctx: &BlockContext,
        account: &Address,
        timepoint: Timepoint,
    ) -> Result<Amount, TokenError> {
        VotingPowerLedger::past_votes(self, ctx, account, timepoint)
    }

    fn past_total_supply(&self, ctx: &BlockContext, timepoint: Timepoint) -> Result<Amount, TokenError> {
        VotingPowerLedger::past_total_supply(self, ctx, timepoint)
    }
}
