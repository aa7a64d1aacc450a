//! Pure state machines: one event in, at most one command out.

/// The decision layer of a session: interprets events, updates internal
/// state, and optionally asks for IO via a command.
///
/// # Guarantees
///
/// - `decide` is synchronous and does no IO
/// - called serially; state lives behind `&mut self`
/// - at most one command per event
pub trait Machine {
    /// Facts fed into the machine.
    type Event;

    /// IO the machine may request.
    type Command;

    fn decide(&mut self, event: &Self::Event) -> Option<Self::Command>;
}
