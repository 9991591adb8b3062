//! Observable facts emitted by state-changing operations.

/// An emitted event. Consumers locate server-generated values (such as a
/// proposal id) by scanning a log for the event with a given name.
pub trait Event {
    /// Event name, e.g. `"ProposalCreated"`.
    fn name(&self) -> &'static str;
}
