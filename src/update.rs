//! The write path: update transports and the coordinator that drives them.
//!
//! Every change a form makes is a pair of statement sets (deletions,
//! insertions) applied atomically by an [`UpdateTransport`]. The
//! [`UpdateCoordinator`] wraps a transport with widget feedback: it locks the
//! control while the write is in flight, unlocks it when the write settles and
//! surfaces failures inline.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture};
use futures::task::{LocalSpawn, LocalSpawnExt};
use oxigraph::model::{NamedNode, Quad};

use crate::error::{FieldOutcome, FormError, UpdateError};
use crate::graph::{MemoryGraph, quad_document};
use crate::widget::{Element, Widget};

/// Remote commit of statement changes.
pub trait UpdateTransport {
    /// Atomically delete `deletions` and insert `insertions`.
    fn update(
        &self,
        deletions: Vec<Quad>,
        insertions: Vec<Quad>,
    ) -> LocalBoxFuture<'static, Result<(), UpdateError>>;

    /// Whether `document` accepts writes.
    fn editable(&self, document: &NamedNode) -> bool;
}

// ---------------------------------------------------------------------------
// In-memory transport
// ---------------------------------------------------------------------------

/// One call made to a [`MemoryTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    pub deletions: Vec<Quad>,
    pub insertions: Vec<Quad>,
}

/// Transport that writes straight into a [`MemoryGraph`].
///
/// Deleting a statement that does not hold is a conflict and nothing is
/// applied. Writes can be held pending until [`release`](Self::release) and a
/// single failure can be injected with [`fail_next`](Self::fail_next).
pub struct MemoryTransport {
    graph: Rc<MemoryGraph>,
    read_only: RefCell<HashSet<NamedNode>>,
    fail_next: RefCell<Option<String>>,
    held: Cell<bool>,
    pending: RefCell<Vec<oneshot::Sender<()>>>,
    requests: RefCell<Vec<UpdateRequest>>,
}

impl MemoryTransport {
    pub fn new(graph: Rc<MemoryGraph>) -> Self {
        Self {
            graph,
            read_only: RefCell::new(HashSet::new()),
            fail_next: RefCell::new(None),
            held: Cell::new(false),
            pending: RefCell::new(Vec::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn graph(&self) -> &Rc<MemoryGraph> {
        &self.graph
    }

    pub fn set_read_only(&self, document: &NamedNode) {
        self.read_only.borrow_mut().insert(document.clone());
    }

    /// Reject the next update with `message`.
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.fail_next.borrow_mut() = Some(message.into());
    }

    /// Keep subsequent writes pending until [`release`](Self::release).
    pub fn hold(&self) {
        self.held.set(true);
    }

    /// Let every pending write proceed and stop holding new ones.
    /// Returns how many writes were released.
    pub fn release(&self) -> usize {
        self.held.set(false);
        let pending = std::mem::take(&mut *self.pending.borrow_mut());
        let count = pending.len();
        for tx in pending {
            let _ = tx.send(());
        }
        count
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Every update requested so far, in call order.
    pub fn requests(&self) -> Vec<UpdateRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<UpdateRequest> {
        self.requests.borrow().last().cloned()
    }

    fn check_writable(&self, quads: &[Quad]) -> Result<(), UpdateError> {
        let read_only = self.read_only.borrow();
        match quads
            .iter()
            .filter_map(quad_document)
            .find(|doc| read_only.contains(doc))
        {
            Some(doc) => Err(UpdateError::ReadOnly {
                document: doc.as_str().to_string(),
            }),
            None => Ok(()),
        }
    }
}

fn apply(graph: &MemoryGraph, deletions: &[Quad], insertions: &[Quad]) -> Result<(), UpdateError> {
    if let Some(missing) = deletions.iter().find(|q| !graph.contains(q)) {
        return Err(UpdateError::Conflict {
            statement: missing.to_string(),
        });
    }
    for quad in deletions {
        graph.remove(quad);
    }
    for quad in insertions {
        graph.insert(quad);
    }
    tracing::debug!(
        deleted = deletions.len(),
        inserted = insertions.len(),
        "applied update"
    );
    Ok(())
}

impl UpdateTransport for MemoryTransport {
    fn update(
        &self,
        deletions: Vec<Quad>,
        insertions: Vec<Quad>,
    ) -> LocalBoxFuture<'static, Result<(), UpdateError>> {
        self.requests.borrow_mut().push(UpdateRequest {
            deletions: deletions.clone(),
            insertions: insertions.clone(),
        });

        if let Some(message) = self.fail_next.borrow_mut().take() {
            return futures::future::ready(Err(UpdateError::Rejected { message })).boxed_local();
        }
        if let Err(e) = self
            .check_writable(&deletions)
            .and_then(|_| self.check_writable(&insertions))
        {
            return futures::future::ready(Err(e)).boxed_local();
        }

        let graph = self.graph.clone();
        if self.held.get() {
            let (tx, rx) = oneshot::channel();
            self.pending.borrow_mut().push(tx);
            async move {
                rx.await.map_err(|_| UpdateError::Abandoned)?;
                apply(&graph, &deletions, &insertions)
            }
            .boxed_local()
        } else {
            futures::future::ready(apply(&graph, &deletions, &insertions)).boxed_local()
        }
    }

    fn editable(&self, document: &NamedNode) -> bool {
        !self.read_only.borrow().contains(document)
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// The single write path shared by every renderer.
#[derive(Clone)]
pub struct UpdateCoordinator {
    transport: Rc<dyn UpdateTransport>,
    spawner: Rc<dyn LocalSpawn>,
}

impl UpdateCoordinator {
    pub fn new(transport: Rc<dyn UpdateTransport>, spawner: Rc<dyn LocalSpawn>) -> Self {
        Self { transport, spawner }
    }

    pub fn editable(&self, document: &NamedNode) -> bool {
        self.transport.editable(document)
    }

    /// Send an update without widget feedback.
    pub fn apply(
        &self,
        deletions: Vec<Quad>,
        insertions: Vec<Quad>,
    ) -> LocalBoxFuture<'static, Result<(), UpdateError>> {
        tracing::debug!(
            deletions = deletions.len(),
            insertions = insertions.len(),
            "submitting update"
        );
        self.transport.update(deletions, insertions)
    }

    /// Run `future` on the local executor after the current render.
    pub fn spawn(&self, future: impl Future<Output = ()> + 'static) {
        if let Err(e) = self.spawner.spawn_local(future) {
            tracing::error!(error = %e, "failed to spawn deferred form work");
        }
    }

    /// Submit an update on behalf of `control`.
    ///
    /// The control is disabled until the write settles and re-enabled either
    /// way. A failure is appended to `feedback` as an error block and handed to
    /// `then` as [`FormError::UpdateFailure`].
    pub fn submit(
        &self,
        control: &Widget,
        feedback: &Widget,
        deletions: Vec<Quad>,
        insertions: Vec<Quad>,
        then: impl FnOnce(FieldOutcome) + 'static,
    ) {
        let document = deletions
            .iter()
            .chain(insertions.iter())
            .find_map(quad_document)
            .map(|d| d.as_str().to_string())
            .unwrap_or_default();

        control.disable();
        let write = self.apply(deletions, insertions);
        let control = control.clone();
        let feedback = feedback.clone();
        let unlock = control.clone();
        let task = async move {
            let result = write.await;
            control.enable();
            match result {
                Ok(()) => then(Ok(())),
                Err(e) => {
                    tracing::error!(document = %document, error = %e, "update failed");
                    let err = FormError::UpdateFailure {
                        document,
                        message: e.to_string(),
                    };
                    feedback.append(&Element::error_block(err.to_string()));
                    then(Err(err));
                }
            }
        };
        if let Err(e) = self.spawner.spawn_local(task) {
            tracing::error!(error = %e, "failed to spawn update");
            unlock.enable();
        }
    }
}

impl std::fmt::Debug for UpdateCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCoordinator").finish_non_exhaustive()
    }
}
