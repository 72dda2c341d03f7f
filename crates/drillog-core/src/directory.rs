//! Hole directory — the distinct hole ids currently stored, used to drive
//! hole filters for [`LogStore::scan_by_hole_ids`].

use std::collections::BTreeSet;

use crate::store::LogStore;

pub struct HoleDirectory;

impl HoleDirectory {
  /// Distinct hole ids in `store`. No open store is not an error: it simply
  /// has no holes.
  pub fn list<S: LogStore>(store: Option<&S>) -> Result<BTreeSet<String>, S::Error> {
    match store {
      Some(store) => store.distinct_hole_ids(),
      None => Ok(BTreeSet::new()),
    }
  }
}
