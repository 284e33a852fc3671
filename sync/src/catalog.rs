//! The catalog component: keeps a `ViewState` in step with the remote collection.
//!
//! # Design
//! All mutable state sits behind one `Arc<Shared>`. The view state is held in
//! a `watch` channel so any number of renderers can `subscribe()` and redraw
//! on change; every transition goes through `send_if_modified` and is a single
//! step on the state.
//!
//! List requests are sequenced by `ViewState` itself: the ticket is taken
//! synchronously when a refresh is dispatched, so `Loading` is visible before
//! any network I/O starts and a superseded response can never win.
//!
//! Fire-and-forget work (`mount`, `spawn_refresh`) runs in a `JoinSet` owned
//! by the component. Dropping the component closes the view state first, then
//! aborts the set, so nothing that is still in flight can touch the state.
//!
//! Mutations never patch `entries` locally. A successful create or delete is
//! followed by a full refresh with the active filters.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use catalog_core::{
    ApiError, CatalogClient, EntryForm, EntryId, Filters, FormError, RefreshTicket, ViewState,
};
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::config::CatalogConfig;
use crate::transport::{ReqwestTransport, Transport};

/// Question put to the user before a delete is dispatched.
pub const DELETE_PROMPT: &str = "Delete this movie?";

const CREATE_ACTION: &str = "add entry";
const DELETE_ACTION: &str = "delete entry";

/// A user confirmation step.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Error)]
pub enum CreateError {
    /// Rejected before any request was sent.
    #[error("invalid entry: {0}")]
    Invalid(#[from] FormError),

    /// The remote service refused the entry or could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The user declined; no request was sent.
    Cancelled,
}

struct Shared<T> {
    client: CatalogClient,
    transport: T,
    view: watch::Sender<ViewState>,
    filters: RwLock<Filters>,
}

impl<T: Transport> Shared<T> {
    fn active_filters(&self) -> Filters {
        self.filters
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_filters(&self, filters: Filters) {
        *self.filters.write().unwrap_or_else(PoisonError::into_inner) = filters;
    }

    /// Run `f` on the view state, notifying subscribers only when it reports a change.
    fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> (bool, R)) -> Option<R> {
        let mut out = None;
        self.view.send_if_modified(|state| {
            let (changed, value) = f(state);
            out = Some(value);
            changed
        });
        out
    }

    /// Make `filters` active and take a ticket for the list request.
    fn begin_refresh(&self, filters: Filters) -> Option<RefreshTicket> {
        self.set_filters(filters);
        self.update(|state| {
            let was_loading = state.is_loading();
            let ticket = state.begin_refresh();
            (!was_loading && !state.is_closed(), ticket)
        })
    }

    async fn load(&self, ticket: RefreshTicket, filters: &Filters) -> bool {
        let request = self.client.build_list_entries(filters);
        debug!(seq = ticket.seq(), url = %request.full_url(), "refreshing entries");

        let result = match self.transport.execute(request).await {
            Ok(response) => self.client.parse_list_entries(response),
            Err(err) => Err(err),
        };
        match &result {
            Ok(entries) => debug!(seq = ticket.seq(), count = entries.len(), "list loaded"),
            Err(err) => warn!(seq = ticket.seq(), error = %err, "list request failed"),
        }
        self.view.send_if_modified(|state| state.apply_refresh(ticket, result))
    }

    async fn refresh(&self, filters: Filters) -> bool {
        let Some(ticket) = self.begin_refresh(filters.clone()) else {
            return false;
        };
        self.load(ticket, &filters).await
    }

    fn fail(&self, message: String) {
        self.view.send_if_modified(|state| state.fail(message));
    }
}

/// Live view of the remote catalog.
///
/// Must be created and used inside a Tokio runtime.
pub struct Catalog<T: Transport> {
    shared: Arc<Shared<T>>,
    tasks: Mutex<JoinSet<()>>,
}

impl Catalog<ReqwestTransport> {
    /// Mount against the backend named in `config`.
    pub fn from_config(config: &CatalogConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config.request_timeout())?;
        Ok(Self::mount(CatalogClient::new(&config.backend_url), transport))
    }
}

impl<T: Transport> Catalog<T> {
    /// Create the view state in `Loading` and start the initial fetch with no filters.
    pub fn mount(client: CatalogClient, transport: T) -> Self {
        info!(backend = client.base_url(), "mounting catalog");
        let (view, _) = watch::channel(ViewState::new());
        let catalog = Self {
            shared: Arc::new(Shared {
                client,
                transport,
                view,
                filters: RwLock::new(Filters::default()),
            }),
            tasks: Mutex::new(JoinSet::new()),
        };
        catalog.spawn_refresh(Filters::default());
        catalog
    }

    /// Snapshot of the current view state.
    pub fn state(&self) -> ViewState {
        self.shared.view.borrow().clone()
    }

    /// Receiver that is notified on every view state change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.view.subscribe()
    }

    /// Filters used by the most recent refresh.
    pub fn filters(&self) -> Filters {
        self.shared.active_filters()
    }

    /// Fetch the list for `filters` and apply it.
    ///
    /// Returns `true` if this response was the one applied to the view state,
    /// `false` if a newer refresh superseded it or the component was torn down.
    pub async fn refresh(&self, filters: Filters) -> bool {
        self.shared.refresh(filters).await
    }

    /// User-triggered search.
    pub async fn search(&self, filters: Filters) -> bool {
        self.refresh(filters).await
    }

    /// Refresh with the active filters.
    pub async fn reload(&self) -> bool {
        self.refresh(self.filters()).await
    }

    /// Dispatch a refresh without waiting for it. `Loading` is already set
    /// when this returns; the response is applied by a task bound to this
    /// component.
    pub fn spawn_refresh(&self, filters: Filters) {
        let Some(ticket) = self.shared.begin_refresh(filters.clone()) else {
            return;
        };
        let shared = Arc::clone(&self.shared);
        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        while tasks.try_join_next().is_some() {}
        tasks.spawn(async move {
            shared.load(ticket, &filters).await;
        });
    }

    /// Wait for every task spawned so far to finish.
    pub async fn join_pending(&self) {
        let mut tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));
        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "catalog task did not complete");
            }
        }
    }

    /// Submit the create form.
    ///
    /// An invalid form is rejected without a request and without touching the
    /// view state. On success the list is refreshed and the form cleared; on
    /// failure the error is shown and the form is left as typed.
    pub async fn create(&self, form: &mut EntryForm) -> Result<(), CreateError> {
        let payload = form.to_new_entry()?;

        let result = match self.shared.client.build_create_entry(&payload) {
            Ok(request) => match self.shared.transport.execute(request).await {
                Ok(response) => self.shared.client.parse_create_entry(response),
                Err(err) => Err(err),
            },
            Err(err) => Err(err),
        };

        match result {
            Ok(created) => {
                info!(
                    title = %payload.title,
                    id = created.as_ref().map(|e| e.id.as_str()).unwrap_or("?"),
                    "entry created"
                );
                self.reload().await;
                form.clear();
                Ok(())
            }
            Err(err) => {
                warn!(title = %payload.title, error = %err, "create failed");
                self.shared.fail(err.user_message(CREATE_ACTION));
                Err(err.into())
            }
        }
    }

    /// Delete `id` once `confirm` agrees.
    ///
    /// On success the list is refreshed. On failure the error is shown and
    /// the list is left as it was.
    pub async fn remove(&self, id: &EntryId, confirm: &impl Confirm) -> Result<RemoveOutcome, ApiError> {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(%id, "delete cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }

        let request = self.shared.client.build_delete_entry(id);
        let result = match self.shared.transport.execute(request).await {
            Ok(response) => self.shared.client.parse_delete_entry(response),
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!(%id, "entry deleted");
                self.reload().await;
                Ok(RemoveOutcome::Removed)
            }
            Err(err) => {
                warn!(%id, error = %err, "delete failed");
                self.shared.fail(err.user_message(DELETE_ACTION));
                Err(err)
            }
        }
    }

    /// Tear down: freeze the view state and abort outstanding tasks.
    pub fn shutdown(self) {
        drop(self);
    }
}

impl<T: Transport> Drop for Catalog<T> {
    fn drop(&mut self) {
        self.shared.view.send_modify(ViewState::close);
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .abort_all();
        debug!("catalog unmounted");
    }
}
