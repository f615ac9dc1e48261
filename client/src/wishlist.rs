//! Wishlist controller: optimistic heart toggling with rollback.
//!
//! A tap flips the displayed membership immediately and records the target
//! captured at tap time; the remote write happens in the background. On
//! failure the state rolls back to the pre-tap value - a wrong heart icon
//! is a more visible defect than a wrong quantity, so unlike cart writes
//! this path reconciles eagerly. Completions of superseded taps are ignored
//! via the engine's tap tokens, so the icon always settles on the last tap's
//! target no matter how the network reorders things.

use crate::auth::AuthProvider;
use crate::error::{ClientError, Result};
use crate::events::{Callbacks, ChangeListener, Notice, NoticeSink};
use crate::gateway::SyncGateway;
use rally_engine::{Product, ProductId, WishlistState};
use std::sync::{Arc, Mutex, MutexGuard};

struct Inner<G> {
    gateway: G,
    auth: Arc<dyn AuthProvider>,
    state: Mutex<WishlistState>,
    callbacks: Mutex<Callbacks>,
}

impl<G> Inner<G> {
    fn state(&self) -> MutexGuard<'_, WishlistState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn callbacks(&self) -> Callbacks {
        self.callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Drives wishlist hearts across product screens.
///
/// Without a signed-in user the controller is an always-empty, read-only
/// view: probes resolve to "not wishlisted" and taps raise a sign-in
/// prompt without touching state or the network.
pub struct WishlistController<G> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for WishlistController<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<G: SyncGateway> WishlistController<G> {
    /// Create a controller over the given gateway and identity source.
    pub fn new(gateway: G, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                auth,
                state: Mutex::new(WishlistState::new()),
                callbacks: Mutex::new(Callbacks::default()),
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

    /// Install the user-visible message sink.
    pub fn set_notice_sink(&self, sink: NoticeSink) {
        self.inner
            .callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .notices = Some(sink);
    }

    /// Bulk-initialize membership from the remote wishlist, once per screen
    /// session. Signed out: leaves the always-empty view, no network call.
    pub async fn init(&self) -> Result<()> {
        let Some(user) = self.inner.auth.current_user_id() else {
            return Ok(());
        };
        match self.inner.gateway.list_wishlist(user).await {
            Ok(ids) => {
                self.inner.state().load(ids);
                self.inner.callbacks().changed();
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "wishlist listing failed");
                self.inner
                    .callbacks()
                    .notify(Notice::Error(format!("Failed to load wishlist: {err}")));
                Err(ClientError::Gateway(err))
            }
        }
    }

    /// Resolve one product's membership for first render.
    ///
    /// A probe only settles the `Unknown` state; it never clobbers an
    /// in-flight toggle. Probe failures display as "not wishlisted", the
    /// same as the original storefront treated them.
    pub async fn probe(&self, id: &str) -> bool {
        let Some(user) = self.inner.auth.current_user_id() else {
            return false;
        };
        let present = match self
            .inner
            .gateway
            .query_wishlist_membership(user, id.to_string())
            .await
        {
            Ok(present) => present,
            Err(err) => {
                tracing::debug!(product = %id, error = %err, "membership probe failed");
                false
            }
        };
        let displayed = {
            let mut state = self.inner.state();
            state.resolve_probe(id, present);
            state.is_wishlisted(id)
        };
        self.inner.callbacks().changed();
        displayed
    }

    /// Toggle membership for a product. Returns the optimistic target.
    ///
    /// The displayed state flips before the remote call is issued; the
    /// completion confirms or rolls back using the token captured at tap
    /// time, never by re-reading state after the await.
    pub fn toggle(&self, id: &str) -> Result<bool> {
        let Some(user) = self.inner.auth.current_user_id() else {
            self.inner.callbacks().notify(Notice::SignInRequired);
            return Err(ClientError::SignInRequired);
        };

        let intent = self.inner.state().tap(id);
        self.inner.callbacks().changed();

        let inner = Arc::clone(&self.inner);
        let id = id.to_string();
        tokio::spawn(async move {
            let result = inner
                .gateway
                .set_wishlist_membership(user, id.clone(), intent.target)
                .await;
            match result {
                Ok(()) => {
                    // Stale tokens no-op: a superseded tap's confirmation
                    // cannot move the displayed state.
                    inner.state().confirm(&id, intent.token);
                }
                Err(err) => {
                    tracing::warn!(product = %id, error = %err, "wishlist toggle failed");
                    inner.state().fail(&id, intent.token);
                    let cbs = inner.callbacks();
                    cbs.notify(Notice::Error(format!("Failed to update wishlist: {err}")));
                    cbs.changed();
                }
            }
        });

        Ok(intent.target)
    }

    /// The state to display for a heart icon.
    pub fn is_wishlisted(&self, id: &str) -> bool {
        self.inner.state().is_wishlisted(id)
    }

    /// Ids currently displayed as wishlisted.
    pub fn wishlist_ids(&self) -> Vec<ProductId> {
        self.inner.state().ids()
    }

    /// Full product documents for the wishlist screen.
    pub async fn fetch_products(&self) -> Result<Vec<Product>> {
        let Some(user) = self.inner.auth.current_user_id() else {
            return Ok(Vec::new());
        };
        match self.inner.gateway.fetch_wishlist(user).await {
            Ok(products) => Ok(products),
            Err(err) => {
                tracing::warn!(error = %err, "wishlist fetch failed");
                self.inner
                    .callbacks()
                    .notify(Notice::Error(format!("Failed to load wishlist: {err}")));
                Err(ClientError::Gateway(err))
            }
        }
    }

    /// Empty the wishlist locally and remotely.
    pub async fn clear(&self) -> Result<()> {
        let Some(user) = self.inner.auth.current_user_id() else {
            self.inner.callbacks().notify(Notice::SignInRequired);
            return Err(ClientError::SignInRequired);
        };
        self.inner.state().load(Vec::new());
        self.inner.callbacks().changed();

        if let Err(err) = self.inner.gateway.clear_wishlist(user).await {
            tracing::warn!(error = %err, "wishlist clear failed");
            self.inner
                .callbacks()
                .notify(Notice::Error(format!("Failed to clear wishlist: {err}")));
            return Err(ClientError::Gateway(err));
        }
        Ok(())
    }
}
