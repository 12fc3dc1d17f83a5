use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::corpus::Edition;
use crate::Result;

/// One lazily initialized value per edition.
///
/// The map lock is only held long enough to hand out the edition's cell, so
/// initializing one edition never blocks readers of another. Within a cell,
/// `get_or_try_init` runs the initializer on exactly one thread; concurrent
/// callers block until it finishes. A failed initializer leaves the cell
/// empty and the next caller tries again.
pub(crate) struct EditionCells<T> {
    cells: Mutex<HashMap<Edition, Arc<OnceCell<T>>>>,
}

impl<T: Clone> EditionCells<T> {
    pub(crate) fn new() -> Self {
        Self {
            cells: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get_or_try_init<F>(&self, edition: Edition, init: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let cell = self.cell(edition);
        cell.get_or_try_init(init).cloned()
    }

    /// Returns the value if the edition is already initialized.
    pub(crate) fn get(&self, edition: Edition) -> Option<T> {
        self.cells
            .lock()
            .get(&edition)
            .and_then(|cell| cell.get().cloned())
    }

    /// Replace the edition's value, initialized or not.
    pub(crate) fn set(&self, edition: Edition, value: T) {
        let cell = OnceCell::new();
        let _ = cell.set(value);
        self.cells.lock().insert(edition, Arc::new(cell));
    }

    fn cell(&self, edition: Edition) -> Arc<OnceCell<T>> {
        self.cells
            .lock()
            .entry(edition)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}
