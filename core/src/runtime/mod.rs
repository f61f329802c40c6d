// src/runtime/mod.rs

//! Core asynchronous runtime primitives: mailboxes and reply slots.

mod command;
mod mailbox;
mod reply_slot;

pub use command::Command;
pub use mailbox::{mailbox, MailboxReceiver, MailboxSender, DEFAULT_MAILBOX_CAPACITY};
pub(crate) use reply_slot::ReplySlot;
