// src/runtime/mailbox.rs

//! Type aliases for the receive loop's control mailbox, based on `async-channel`.

use crate::runtime::command::Command;

/// The sending end of the receive loop's mailbox. Cloneable.
pub type MailboxSender = async_channel::Sender<Command>;

/// The receiving end of the receive loop's mailbox.
pub type MailboxReceiver = async_channel::Receiver<Command>;

/// Default capacity for bounded mailboxes.
pub const DEFAULT_MAILBOX_CAPACITY: usize = 16;

/// Creates a new bounded mailbox channel pair.
pub fn mailbox() -> (MailboxSender, MailboxReceiver) {
  async_channel::bounded(DEFAULT_MAILBOX_CAPACITY)
}
