//! Cancellation of store operations that have already been handed to the
//! database thread.
//!
//! Dropping a `tokio_rusqlite` call future does not stop its closure, so every
//! operation shares a [`CancelFlag`] with its closure. The async side raises
//! the flag when it stops waiting; the closure checks it between statements
//! and right before `COMMIT`, and bails out so the open transaction is rolled
//! back when it goes out of scope.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use thiserror::Error;

/// Marker carried through [`tokio_rusqlite::Error::Other`] when a closure
/// stops because its flag was raised.
#[derive(Debug, Error)]
#[error("operation cancelled")]
pub(crate) struct Cancelled;

#[derive(Debug, Clone, Default)]
pub(crate) struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
  pub(crate) fn raise(&self) { self.0.store(true, Ordering::SeqCst); }

  pub(crate) fn is_raised(&self) -> bool { self.0.load(Ordering::SeqCst) }

  /// Fail with [`Cancelled`] once the flag is raised.
  pub(crate) fn check(&self) -> tokio_rusqlite::Result<()> {
    if self.is_raised() {
      return Err(tokio_rusqlite::Error::Other(Box::new(Cancelled)));
    }
    Ok(())
  }
}

/// The points between statements where a database-thread closure may stop.
pub(crate) trait Checkpoint {
  fn check(&self) -> tokio_rusqlite::Result<()>;
}

impl Checkpoint for CancelFlag {
  fn check(&self) -> tokio_rusqlite::Result<()> { CancelFlag::check(self) }
}

/// Raises its flag on drop unless [`disarm`](Self::disarm)ed first.
///
/// Held across the `.await` of a store call, so a future dropped mid-flight
/// cancels the closure it spawned.
pub(crate) struct CancelOnDrop {
  flag:  CancelFlag,
  armed: bool,
}

impl CancelOnDrop {
  pub(crate) fn new(flag: CancelFlag) -> Self { Self { flag, armed: true } }

  pub(crate) fn disarm(mut self) { self.armed = false; }
}

impl Drop for CancelOnDrop {
  fn drop(&mut self) {
    if self.armed {
      self.flag.raise();
    }
  }
}
