use std::collections::VecDeque;

use crate::{envelope::Envelope, mailbox::Mailbox};

#[cfg(test)]
mod tests;

/// Two-segment cache owned by the mailbox reader.
///
/// The `first` segment holds the reordered front produced by priority
/// reassembly; the `second` segment holds the skipped backlog. Only the
/// thread holding the reader role ever touches either segment.
#[derive(Debug, Default)]
pub(crate) struct MailboxCache {
  first: VecDeque<Envelope>,
  second: VecDeque<Envelope>,
}

impl MailboxCache {
  pub(crate) fn first_is_empty(&self) -> bool {
    self.first.is_empty()
  }

  pub(crate) fn pop_first_front(&mut self) -> Option<Envelope> {
    self.first.pop_front()
  }

  /// Reassembles the `first` segment by draining the whole mailbox at once.
  ///
  /// High-priority envelopes are placed at the running insert point, low
  /// priority ones at the segment end; the insert point snaps to the first
  /// low-priority element so that later high-priority arrivals overtake it.
  /// Skipped entirely while the segment still starts with a high-priority
  /// element from an earlier drain.
  pub(crate) fn refill_first(&mut self, mailbox: &Mailbox) {
    if self.first.front().is_some_and(Envelope::is_high_priority) {
      return;
    }
    let mut insert_at = 0_usize;
    let mut insert_at_end = self.first.is_empty();
    while let Some(envelope) = mailbox.try_pop() {
      if envelope.is_high_priority() {
        self.first.insert(insert_at, envelope);
        insert_at += 1;
      } else {
        self.first.push_back(envelope);
        if insert_at_end {
          insert_at = self.first.len() - 1;
          insert_at_end = false;
        }
      }
    }
  }

  pub(crate) fn push_second_back(&mut self, envelope: Envelope) {
    self.second.push_back(envelope);
  }

  /// Inserts a skipped envelope, keeping the high-before-low partition of the
  /// backlog stable.
  pub(crate) fn insert_second_partitioned(&mut self, envelope: Envelope) {
    if envelope.is_high_priority() {
      let at = self.second.iter().position(|e| !e.is_high_priority()).unwrap_or(self.second.len());
      self.second.insert(at, envelope);
    } else {
      self.second.push_back(envelope);
    }
  }

  pub(crate) fn second_len(&self) -> usize {
    self.second.len()
  }

  pub(crate) fn second_remove(&mut self, index: usize) -> Option<Envelope> {
    self.second.remove(index)
  }

  pub(crate) fn second_insert(&mut self, index: usize, envelope: Envelope) {
    self.second.insert(index, envelope);
  }

  /// Drains both segments, front segment first.
  pub(crate) fn drain_all(&mut self) -> impl Iterator<Item = Envelope> + '_ {
    self.first.drain(..).chain(self.second.drain(..))
  }
}
