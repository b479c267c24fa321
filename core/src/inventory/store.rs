use crate::prelude::{ReliefError, ReliefResult};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Durable inventory keyed by resource name.
pub trait InventoryStore: Send + Sync {
    /// Adds `delta` to every row named `name`. Returns how many rows changed.
    fn apply_delta(&self, name: &str, delta: u32) -> ReliefResult<usize>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub updated: usize,
    pub unparseable: usize,
}

/// Rewrites `resourceName,quantity,latitude,longitude` rows, replacing the
/// quantity of rows named `name` with `quantity + delta`. Other rows, row order
/// and line separators are preserved. Matching rows whose quantity is not an
/// integer, or whose new quantity would overflow, are left as they are and
/// counted in `unparseable`.
pub fn rewrite_quantity(text: &str, name: &str, delta: u32) -> Rewrite {
    let mut updated = 0;
    let mut unparseable = 0;
    let rows: Vec<String> = text
        .split('\n')
        .map(|row| {
            let fields: Vec<&str> = row.split(',').collect();
            if fields.len() < 2 || fields[0].trim() != name {
                return row.to_string();
            }
            let Some(total) = fields[1]
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|quantity| quantity.checked_add(i64::from(delta)))
            else {
                unparseable += 1;
                return row.to_string();
            };
            updated += 1;
            let replaced = total.to_string();
            let mut rebuilt = vec![fields[0], replaced.as_str()];
            rebuilt.extend_from_slice(&fields[2..]);
            rebuilt.join(",")
        })
        .collect();

    Rewrite {
        text: rows.join("\n"),
        updated,
        unparseable,
    }
}

/// Inventory kept in a delimited text file, updated by read-modify-write.
/// Clones share one write lock, so updates through the same store never
/// interleave.
#[derive(Debug, Clone)]
pub struct CsvInventoryStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvInventoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }
}

impl InventoryStore for CsvInventoryStore {
    fn apply_delta(&self, name: &str, delta: u32) -> ReliefResult<usize> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let text = fs::read_to_string(&self.path).map_err(|err| {
            ReliefError::PersistenceFailure(format!("reading {}: {}", self.path.display(), err))
        })?;
        let rewrite = rewrite_quantity(&text, name, delta);
        if rewrite.updated > 0 {
            fs::write(&self.path, &rewrite.text).map_err(|err| {
                ReliefError::PersistenceFailure(format!("writing {}: {}", self.path.display(), err))
            })?;
        }
        if rewrite.unparseable > 0 {
            return Err(ReliefError::PersistenceFailure(format!(
                "{} row(s) for {} carry a non-numeric quantity",
                rewrite.unparseable, name
            )));
        }
        Ok(rewrite.updated)
    }
}
