//! Collection store: catalog, search/filter state and the derived view.
//!
//! Every mutation publishes a fresh immutable [`CollectionState`] snapshot.
//! Observers hold `Arc`s to old snapshots safely; nothing already published is
//! ever modified. Background results carry a ticket so that a slow scan cannot
//! overwrite the result of a newer one.

use std::sync::{Arc, Mutex};

use crate::error::InspectError;
use crate::types::{AppDetailRecord, AppRecord};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Clone, Debug)]
pub struct CollectionState {
    pub full_catalog: Arc<Vec<AppRecord>>,
    /// Always `full_catalog` filtered by `query` and `include_system_packages`.
    pub filtered_view: Vec<AppRecord>,
    pub phase: LoadPhase,
    pub last_error: Option<String>,
    pub query: String,
    pub include_system_packages: bool,
    /// Incremented on every publish.
    pub revision: u64,
}

impl CollectionState {
    fn new(include_system_packages: bool) -> Self {
        Self {
            full_catalog: Arc::new(Vec::new()),
            filtered_view: Vec::new(),
            phase: LoadPhase::Idle,
            last_error: None,
            query: String::new(),
            include_system_packages,
            revision: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    pub fn system_count(&self) -> usize {
        self.full_catalog.iter().filter(|r| r.is_system_package).count()
    }

    fn recompute(&mut self) {
        self.filtered_view = self
            .full_catalog
            .iter()
            .filter(|r| keep(r, &self.query, self.include_system_packages))
            .cloned()
            .collect();
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Whether `record` belongs in the filtered view.
pub fn keep(record: &AppRecord, query: &str, include_system_packages: bool) -> bool {
    (include_system_packages || !record.is_system_package)
        && (query.is_empty()
            || contains_ignore_case(&record.display_name, query)
            || contains_ignore_case(&record.package_id, query))
}

/// Issued by [`CollectionStore::begin_refresh`]; only the latest one commits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshTicket(u64);

struct StoreInner {
    current: Arc<CollectionState>,
    latest_ticket: u64,
}

pub struct CollectionStore {
    inner: Mutex<StoreInner>,
}

impl CollectionStore {
    pub fn new(include_system_packages: bool) -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                current: Arc::new(CollectionState::new(include_system_packages)),
                latest_ticket: 0,
            }),
        }
    }

    pub fn snapshot(&self) -> Arc<CollectionState> {
        self.lock().current.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Copy the current state, apply `f`, recompute the view and publish.
    fn publish(inner: &mut StoreInner, f: impl FnOnce(&mut CollectionState)) {
        let mut next = (*inner.current).clone();
        f(&mut next);
        next.recompute();
        next.revision += 1;
        inner.current = Arc::new(next);
    }

    /// Enter `Loading` and hand out a ticket for the scan about to start.
    pub fn begin_refresh(&self) -> RefreshTicket {
        let mut inner = self.lock();
        inner.latest_ticket += 1;
        let ticket = RefreshTicket(inner.latest_ticket);
        Self::publish(&mut inner, |s| s.phase = LoadPhase::Loading);
        ticket
    }

    /// Commit a finished scan. Returns `false` when a newer refresh superseded it.
    ///
    /// On failure the previous catalog stays visible and only `last_error` changes.
    pub fn complete_refresh(
        &self,
        ticket: RefreshTicket,
        result: Result<Vec<AppRecord>, InspectError>,
    ) -> bool {
        let mut inner = self.lock();
        if ticket.0 != inner.latest_ticket {
            log::debug!("dropping stale refresh {} (latest {})", ticket.0, inner.latest_ticket);
            return false;
        }
        Self::publish(&mut inner, |s| match result {
            Ok(catalog) => {
                s.full_catalog = Arc::new(catalog);
                s.phase = LoadPhase::Loaded;
                s.last_error = None;
            }
            Err(e) => {
                s.phase = LoadPhase::Errored;
                s.last_error = Some(format!("Failed to load apps: {}", e));
            }
        });
        true
    }

    pub fn set_query(&self, query: &str) {
        let mut inner = self.lock();
        if inner.current.query == query {
            return;
        }
        Self::publish(&mut inner, |s| s.query = query.to_string());
    }

    pub fn set_include_system_packages(&self, include: bool) {
        let mut inner = self.lock();
        if inner.current.include_system_packages == include {
            return;
        }
        Self::publish(&mut inner, |s| s.include_system_packages = include);
    }

    /// Flip system package visibility and return the new value.
    pub fn toggle_system_visibility(&self) -> bool {
        let mut inner = self.lock();
        let include = !inner.current.include_system_packages;
        Self::publish(&mut inner, |s| s.include_system_packages = include);
        include
    }
}

impl Default for CollectionStore {
    fn default() -> Self {
        Self::new(false)
    }
}

/// What the detail pane currently shows.
#[derive(Clone, Debug, Default)]
pub enum DetailView {
    #[default]
    Empty,
    Loading(String),
    Ready(Arc<AppDetailRecord>),
    /// The package could not be resolved; retryable.
    Missing(String),
}

impl DetailView {
    pub fn package_id(&self) -> Option<&str> {
        match self {
            DetailView::Empty => None,
            DetailView::Loading(id) | DetailView::Missing(id) => Some(id),
            DetailView::Ready(d) => Some(&d.app.package_id),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetailTicket(u64);

#[derive(Default)]
struct SlotInner {
    view: DetailView,
    latest_ticket: u64,
}

/// Holds at most one detail record; a newer request supersedes older ones.
#[derive(Default)]
pub struct DetailSlot {
    inner: Mutex<SlotInner>,
}

impl DetailSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SlotInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn view(&self) -> DetailView {
        self.lock().view.clone()
    }

    pub fn begin(&self, package_id: &str) -> DetailTicket {
        let mut inner = self.lock();
        inner.latest_ticket += 1;
        inner.view = DetailView::Loading(package_id.to_string());
        DetailTicket(inner.latest_ticket)
    }

    /// Returns `false` when the request was superseded or the view was closed.
    pub fn complete(&self, ticket: DetailTicket, detail: Option<AppDetailRecord>) -> bool {
        let mut inner = self.lock();
        if ticket.0 != inner.latest_ticket {
            return false;
        }
        let DetailView::Loading(id) = &inner.view else {
            return false;
        };
        let id = id.clone();
        inner.view = match detail {
            Some(d) => DetailView::Ready(Arc::new(d)),
            None => DetailView::Missing(id),
        };
        true
    }

    /// Close the view; in-flight builds will be discarded.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.latest_ticket += 1;
        inner.view = DetailView::Empty;
    }
}
