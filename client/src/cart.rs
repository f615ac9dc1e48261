//! Cart controller: optimistic mutations, debounced remote writes.
//!
//! Every user action lands in the local [`CartStore`] first and the UI is
//! told to redraw immediately. The remote side catches up asynchronously:
//! quantity edits are coalesced through the engine's [`DebounceMap`] into
//! one upsert per quiescence window, removals are sent at once. Remote
//! failures become notices; the local cart is never rolled back for a
//! quantity write (the next bulk load reconciles), and removed lines are
//! not restored.

use crate::auth::AuthProvider;
use crate::config::Config;
use crate::error::{ClientError, Result};
use crate::events::{Callbacks, CartChangedListener, ChangeListener, Notice, NoticeSink};
use crate::gateway::SyncGateway;
use rally_engine::{CartStore, DebounceMap, DecrementOutcome, Generation, Product, UserId};
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

struct Tables {
    store: CartStore,
    debounce: DebounceMap,
}

struct Inner<G> {
    gateway: G,
    auth: Arc<dyn AuthProvider>,
    tables: Mutex<Tables>,
    callbacks: Mutex<Callbacks>,
    epoch: Instant,
    window_ms: u64,
}

impl<G> Inner<G> {
    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn callbacks(&self) -> Callbacks {
        self.callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

/// Drives the cart screen: owns the visible line items and keeps the remote
/// cart documents in step with them.
///
/// Cheap to clone; spawned completions re-enter through the shared state.
pub struct CartController<G> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for CartController<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: SyncGateway> CartController<G> {
    /// Create a controller over the given gateway and identity source.
    pub fn new(gateway: G, auth: Arc<dyn AuthProvider>, config: Config) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                auth,
                tables: Mutex::new(Tables {
                    store: CartStore::new(),
                    debounce: DebounceMap::new(config.debounce_window_ms),
                }),
                callbacks: Mutex::new(Callbacks::default()),
                epoch: Instant::now(),
                window_ms: config.debounce_window_ms,
            }),
        }
    }

    /// Install the "data changed" redraw signal.
    pub fn set_on_change(&self, listener: ChangeListener) {
        self.inner
            .callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on_change = Some(listener);
    }

    /// Install the once-per-committed-action cart summary callback.
    pub fn set_on_cart_changed(&self, listener: CartChangedListener) {
        self.inner
            .callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .on_cart_changed = Some(listener);
    }

    /// Install the user-visible message sink.
    pub fn set_notice_sink(&self, sink: NoticeSink) {
        self.inner
            .callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .notices = Some(sink);
    }

    /// Replace the local cart from the remote store.
    ///
    /// Malformed documents (no id) are skipped. This bulk fetch is also the
    /// reconciliation backstop for any quantity write that failed.
    pub async fn load_cart(&self) -> Result<()> {
        let user = self.require_user()?;
        match self.inner.gateway.fetch_cart(user).await {
            Ok(items) => {
                self.inner.tables().store.load(items);
                self.inner.callbacks().changed();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "cart fetch failed");
                self.inner
                    .callbacks()
                    .notify(Notice::Error(format!("Failed to load cart: {err}")));
                Err(ClientError::Gateway(err))
            }
        }
    }

    /// Put a product in the cart (or raise its quantity) and sync.
    pub fn add(&self, product: Product, quantity: u32) -> Result<u32> {
        let user = self.require_user()?;
        let id = product.id.clone();
        let new_quantity = self.inner.tables().store.add(product, quantity)?;

        let cbs = self.inner.callbacks();
        cbs.changed();
        cbs.cart_changed();

        self.schedule_debounced_update(user, &id, i64::from(quantity), new_quantity);
        Ok(new_quantity)
    }

    /// Raise a line's quantity by one. Returns the new quantity.
    pub fn increment(&self, id: &str) -> Result<u32> {
        let user = self.require_user()?;
        let quantity = self.inner.tables().store.increment(id)?;

        let cbs = self.inner.callbacks();
        cbs.changed();
        cbs.cart_changed();

        self.schedule_debounced_update(user, id, 1, quantity);
        Ok(quantity)
    }

    /// Lower a line's quantity by one.
    ///
    /// At quantity 1 the line is removed and a delete is issued instead of a
    /// quantity-0 update.
    pub fn decrement(&self, id: &str) -> Result<DecrementOutcome> {
        let user = self.require_user()?;
        let outcome = self.inner.tables().store.decrement(id)?;

        match outcome {
            DecrementOutcome::Decremented(quantity) => {
                let cbs = self.inner.callbacks();
                cbs.changed();
                cbs.cart_changed();
                self.schedule_debounced_update(user, id, -1, quantity);
            }
            DecrementOutcome::RemoveLine => {
                self.remove_line(id)?;
            }
        }
        Ok(outcome)
    }

    /// Remove a line immediately and issue an unconditional delete.
    ///
    /// The removal is optimistic and final: if the remote delete fails the
    /// line is not restored, the failure is only surfaced as a notice.
    pub fn remove_line(&self, id: &str) -> Result<()> {
        let user = self.require_user()?;
        {
            let mut tables = self.inner.tables();
            // A quantity update for a line that no longer exists is a
            // dropped operation, not an error.
            tables.debounce.cancel(id);
            tables.store.remove(id)?;
        }

        let cbs = self.inner.callbacks();
        cbs.changed();
        cbs.cart_changed();

        let inner = Arc::clone(&self.inner);
        let id = id.to_string();
        tokio::spawn(async move {
            match inner.gateway.delete_cart_line(user, id.clone()).await {
                Ok(()) => {
                    inner
                        .callbacks()
                        .notify(Notice::Info("Item removed from cart".into()));
                }
                Err(err) => {
                    tracing::warn!(product = %id, error = %err, "cart delete failed");
                    inner
                        .callbacks()
                        .notify(Notice::Error(format!("Failed to remove item: {err}")));
                }
            }
        });
        Ok(())
    }

    /// Empty the cart locally and remotely.
    pub async fn clear(&self) -> Result<()> {
        let user = self.require_user()?;
        {
            let mut tables = self.inner.tables();
            tables.debounce.clear();
            tables.store.clear();
        }
        let cbs = self.inner.callbacks();
        cbs.changed();
        cbs.cart_changed();

        if let Err(err) = self.inner.gateway.clear_cart(user).await {
            tracing::warn!(error = %err, "cart clear failed");
            self.inner
                .callbacks()
                .notify(Notice::Error(format!("Failed to clear cart: {err}")));
            return Err(ClientError::Gateway(err));
        }
        Ok(())
    }

    /// Sum of all line totals.
    pub fn totals(&self) -> Decimal {
        self.inner.tables().store.totals()
    }

    /// Current quantity of a line, if present.
    pub fn quantity(&self, id: &str) -> Option<u32> {
        self.inner.tables().store.quantity(id)
    }

    /// Whether the cart holds a line for this id.
    pub fn contains(&self, id: &str) -> bool {
        self.inner.tables().store.contains(id)
    }

    /// Snapshot of the visible line items, in display order.
    pub fn items(&self) -> Vec<Product> {
        self.inner.tables().store.items().to_vec()
    }

    /// Count of visible line items.
    pub fn len(&self) -> usize {
        self.inner.tables().store.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.tables().store.is_empty()
    }

    /// Count of debounced writes not yet flushed.
    pub fn pending_writes(&self) -> usize {
        self.inner.tables().debounce.len()
    }

    fn require_user(&self) -> Result<UserId> {
        match self.inner.auth.current_user_id() {
            Some(user) => Ok(user),
            None => {
                self.inner.callbacks().notify(Notice::SignInRequired);
                Err(ClientError::SignInRequired)
            }
        }
    }

    /// Replace any pending write for `id` and arm a fresh quiescence timer.
    ///
    /// The timer re-checks its generation when it wakes: if another edit
    /// superseded it (or the line was removed), it silently no-ops.
    fn schedule_debounced_update(&self, user: UserId, id: &str, delta: i64, quantity: u32) {
        let generation = {
            let mut tables = self.inner.tables();
            let now = self.inner.now_ms();
            tables.debounce.schedule(id, delta, quantity, now)
        };

        let inner = Arc::clone(&self.inner);
        let id = id.to_string();
        // Capture the deadline now: the window starts at the edit, not at the
        // first poll of the spawned task.
        let deadline = Instant::now() + Duration::from_millis(self.inner.window_ms);
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            flush_debounced(&inner, &id, generation, user).await;
        });
    }
}

async fn flush_debounced<G: SyncGateway>(
    inner: &Inner<G>,
    id: &str,
    generation: Generation,
    user: UserId,
) {
    let flushable = {
        let mut tables = inner.tables();
        match tables.debounce.take(id, generation) {
            Some(write) => tables.store.get(id).cloned().map(|p| (write, p)),
            None => None,
        }
    };
    let Some((write, product)) = flushable else {
        return; // superseded or cancelled
    };

    tracing::debug!(
        product = %id,
        quantity = write.quantity,
        delta = write.delta,
        "flushing debounced cart update"
    );
    if let Err(err) = inner
        .gateway
        .upsert_cart_line(user, product, write.quantity)
        .await
    {
        // Local optimistic quantity is retained; the next load reconciles.
        tracing::warn!(product = %id, error = %err, "cart quantity sync failed");
        inner
            .callbacks()
            .notify(Notice::Error(format!("Failed to update cart: {err}")));
    }
}
