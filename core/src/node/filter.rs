// src/node/filter.rs

use std::collections::HashMap;
use tokio::sync::RwLock;

/// A node in the subscription trie.
#[derive(Debug, Default)]
struct FilterNode {
  children: HashMap<u8, FilterNode>,
  /// True when a subscription ends exactly at this node.
  subscribed: bool,
}

/// The node's subscription set: topic prefixes in a byte trie.
///
/// The receive loop consults `matches` on every inbound frame while the
/// owning caller occasionally subscribes or unsubscribes, so the whole trie
/// sits behind a single `RwLock` that is read-locked per dispatch.
#[derive(Debug, Default)]
pub(crate) struct TopicFilter {
  root: RwLock<FilterNode>,
}

impl TopicFilter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a subscription prefix. The set is idempotent: subscribing an
  /// already-present prefix is a no-op, and one unsubscribe removes it.
  pub async fn subscribe(&self, prefix: &str) {
    let mut root = self.root.write().await;
    let mut node = &mut *root;
    for &byte in prefix.as_bytes() {
      node = node.children.entry(byte).or_default();
    }
    if node.subscribed {
      tracing::debug!(prefix = %prefix, "Subscribe ignored: prefix already subscribed");
    } else {
      node.subscribed = true;
      tracing::debug!(prefix = %prefix, "Subscribed");
    }
  }

  /// Removes a subscription prefix, pruning emptied branches.
  /// Returns `false` (logged) if the prefix was not subscribed.
  pub async fn unsubscribe(&self, prefix: &str) -> bool {
    let mut root = self.root.write().await;
    let removed = remove_prefix(&mut root, prefix.as_bytes());
    if removed {
      tracing::debug!(prefix = %prefix, "Unsubscribed");
    } else {
      tracing::debug!(prefix = %prefix, "Unsubscribe ignored: prefix not subscribed");
    }
    removed
  }

  /// True when any subscribed prefix is a prefix of `topic`.
  /// The empty prefix subscribes to all traffic.
  pub async fn matches(&self, topic: &str) -> bool {
    let root = self.root.read().await;
    let mut node = &*root;
    if node.subscribed {
      return true;
    }
    for byte in topic.as_bytes() {
      match node.children.get(byte) {
        Some(child) => {
          node = child;
          if node.subscribed {
            return true;
          }
        }
        None => return false,
      }
    }
    false
  }
}

fn remove_prefix(node: &mut FilterNode, prefix: &[u8]) -> bool {
  match prefix.split_first() {
    None => {
      if node.subscribed {
        node.subscribed = false;
        true
      } else {
        false
      }
    }
    Some((byte, rest)) => {
      let Some(child) = node.children.get_mut(byte) else {
        return false;
      };
      let removed = remove_prefix(child, rest);
      if removed && !child.subscribed && child.children.is_empty() {
        node.children.remove(byte);
      }
      removed
    }
  }
}
