// kiln-market/src/store/session.rs

//! The "current buyer", the only state that outlives the process.

use parking_lot::RwLock;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug)]
pub struct Session {
  current: RwLock<Option<String>>,
  file: Option<PathBuf>,
}

impl Session {
  /// Restores the persisted buyer id when it names a known buyer, else falls
  /// back to the first buyer. `file = None` keeps the session in memory only.
  pub fn restore(file: Option<PathBuf>, known_buyers: &[String]) -> Self {
    let persisted = file.as_deref().and_then(read_buyer_id);
    let current = persisted
      .filter(|id| known_buyers.contains(id))
      .or_else(|| known_buyers.first().cloned());
    debug!(current_buyer = ?current, "Session restored.");
    Self {
      current: RwLock::new(current),
      file,
    }
  }

  pub fn current(&self) -> Option<String> {
    self.current.read().clone()
  }

  /// Makes `buyer_id` current and persists it. The caller has already checked
  /// the buyer exists; a failed write is logged and otherwise ignored.
  pub fn switch(&self, buyer_id: &str) {
    *self.current.write() = Some(buyer_id.to_string());
    if let Some(path) = &self.file {
      if let Err(e) = fs::write(path, buyer_id) {
        warn!(path = %path.display(), error = %e, "Could not persist the current buyer.");
      }
    }
  }
}

fn read_buyer_id(path: &Path) -> Option<String> {
  let raw = fs::read_to_string(path).ok()?;
  let id = raw.trim();
  (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn buyers() -> Vec<String> {
    vec!["buyer1".to_string(), "buyer2".to_string()]
  }

  #[test]
  fn falls_back_to_the_first_buyer() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session");
    let session = Session::restore(Some(file.clone()), &buyers());
    assert_eq!(session.current().as_deref(), Some("buyer1"));

    fs::write(&file, "buyer42").unwrap();
    let session = Session::restore(Some(file), &buyers());
    assert_eq!(session.current().as_deref(), Some("buyer1"));
  }

  #[test]
  fn switch_survives_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("session");
    Session::restore(Some(file.clone()), &buyers()).switch("buyer2");

    let restored = Session::restore(Some(file), &buyers());
    assert_eq!(restored.current().as_deref(), Some("buyer2"));
  }

  #[test]
  fn unwritable_file_does_not_break_switching() {
    let dir = tempfile::tempdir().unwrap();
    let session = Session::restore(Some(dir.path().join("missing").join("session")), &buyers());
    session.switch("buyer2");
    assert_eq!(session.current().as_deref(), Some("buyer2"));
  }

  #[test]
  fn no_buyers_means_no_current_buyer() {
    assert_eq!(Session::restore(None, &[]).current(), None);
  }
}
