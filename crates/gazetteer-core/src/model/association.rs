// crates/gazetteer-core/src/model/association.rs
use super::FeatureKey;
use crate::error::{GazetteerError, Result};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// The store's load-scope counter. Closing the scope (`flush_and_clear`)
/// bumps the generation, which detaches every deferred association handed
/// out before.
#[derive(Debug, Default)]
pub(crate) struct LoadScope {
    generation: AtomicU64,
}

impl LoadScope {
    pub(crate) fn ticket(self: &Arc<Self>) -> ScopeTicket {
        ScopeTicket {
            scope: Arc::clone(self),
            opened_at: self.generation.load(Ordering::Acquire),
        }
    }

    pub(crate) fn close(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ScopeTicket {
    scope: Arc<LoadScope>,
    opened_at: u64,
}

impl ScopeTicket {
    #[inline]
    fn is_open(&self) -> bool {
        self.scope.generation.load(Ordering::Acquire) == self.opened_at
    }
}

type Loader<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// An owned collection or reference that may not have been fetched yet.
///
/// Features returned by `get` carry deferred associations: the first read
/// inside the load scope fetches and caches the value, a first read after the
/// scope closed fails with [`GazetteerError::DetachedAccess`]. Features
/// returned by `get_eager`, or built by the caller, are always loaded.
pub struct Association<T> {
    state: State<T>,
}

enum State<T> {
    Loaded(T),
    Deferred {
        cell: OnceCell<T>,
        ticket: ScopeTicket,
        loader: Loader<T>,
    },
}

impl<T> Association<T> {
    pub fn loaded(value: T) -> Self {
        Self {
            state: State::Loaded(value),
        }
    }

    pub(crate) fn deferred(ticket: ScopeTicket, loader: Loader<T>) -> Self {
        Self {
            state: State::Deferred {
                cell: OnceCell::new(),
                ticket,
                loader,
            },
        }
    }

    /// Whether reading won't need the store.
    pub fn is_loaded(&self) -> bool {
        match &self.state {
            State::Loaded(_) => true,
            State::Deferred { cell, .. } => cell.get().is_some(),
        }
    }

    pub(crate) fn get(&self, association: &'static str, owner: Option<FeatureKey>) -> Result<&T> {
        match &self.state {
            State::Loaded(v) => Ok(v),
            State::Deferred {
                cell,
                ticket,
                loader,
            } => {
                if let Some(v) = cell.get() {
                    return Ok(v);
                }
                if !ticket.is_open() {
                    return Err(GazetteerError::DetachedAccess {
                        association,
                        owner: owner.unwrap_or_default(),
                    });
                }
                Ok(cell.get_or_init(|| loader()))
            }
        }
    }

    /// Mutable access; a deferred value is fetched first (same rules as reads)
    /// and the association becomes loaded.
    pub(crate) fn get_mut(
        &mut self,
        association: &'static str,
        owner: Option<FeatureKey>,
    ) -> Result<&mut T> {
        if let State::Deferred {
            cell,
            ticket,
            loader,
        } = &mut self.state
        {
            let value = match cell.take() {
                Some(v) => v,
                None if ticket.is_open() => loader(),
                None => {
                    return Err(GazetteerError::DetachedAccess {
                        association,
                        owner: owner.unwrap_or_default(),
                    })
                }
            };
            self.state = State::Loaded(value);
        }
        match &mut self.state {
            State::Loaded(v) => Ok(v),
            State::Deferred { .. } => unreachable!("deferred state replaced above"),
        }
    }

    /// The value if it is already in memory, without touching the store.
    pub(crate) fn peek(&self) -> Option<&T> {
        match &self.state {
            State::Loaded(v) => Some(v),
            State::Deferred { cell, .. } => cell.get(),
        }
    }
}

impl<T: Clone> Clone for Association<T> {
    fn clone(&self) -> Self {
        let state = match &self.state {
            State::Loaded(v) => State::Loaded(v.clone()),
            State::Deferred {
                cell,
                ticket,
                loader,
            } => State::Deferred {
                cell: cell.clone(),
                ticket: ticket.clone(),
                loader: Arc::clone(loader),
            },
        };
        Self { state }
    }
}

impl<T: Default> Default for Association<T> {
    fn default() -> Self {
        Self::loaded(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Association<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.peek() {
            Some(v) => f.debug_tuple("Loaded").field(v).finish(),
            None => f.write_str("Deferred"),
        }
    }
}
