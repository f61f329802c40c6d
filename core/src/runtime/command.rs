// src/runtime/command.rs

/// Control messages delivered to the receive loop's mailbox.
///
/// Termination additionally closes the mailbox itself so a loop blocked on
/// `recv()` observes shutdown even when the channel is full.
#[derive(Debug)]
pub enum Command {
  /// Gracefully stop the receive loop after the current receive call returns.
  Stop,
}
