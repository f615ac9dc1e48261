//! Callbacks the surrounding screens hook into.
//!
//! The controllers never render anything. They fire a "data changed" signal
//! after every successful or rolled-back mutation so the visible list
//! redraws, a cart-changed callback once per committed cart action so order
//! summaries recompute, and notices for everything the user should see as a
//! transient message.

use std::sync::Arc;

/// "Data changed" notification: redraw the visible list.
///
/// A dropped notification means a stale UI, so controllers fire it on every
/// state change, including rollbacks.
pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

/// Fired exactly once per committed cart quantity/removal action - not once
/// per network round trip.
pub type CartChangedListener = Arc<dyn Fn() + Send + Sync>;

/// A user-visible message. The toast-equivalent surface: remote failures
/// and sign-in prompts arrive here, never as panics or propagated errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The action needs a signed-in user
    SignInRequired,
    /// A remote operation failed; the message is from the gateway
    Error(String),
    /// Informational confirmation (e.g. "item removed")
    Info(String),
}

/// Receiver for [`Notice`]s.
pub type NoticeSink = Arc<dyn Fn(Notice) + Send + Sync>;

/// Callback bundle shared by both controllers.
#[derive(Clone, Default)]
pub(crate) struct Callbacks {
    pub on_change: Option<ChangeListener>,
    pub on_cart_changed: Option<CartChangedListener>,
    pub notices: Option<NoticeSink>,
}

impl Callbacks {
    pub fn changed(&self) {
        if let Some(cb) = &self.on_change {
            cb();
        }
    }

    pub fn cart_changed(&self) {
        if let Some(cb) = &self.on_cart_changed {
            cb();
        }
    }

    pub fn notify(&self, notice: Notice) {
        if let Some(sink) = &self.notices {
            sink(notice);
        }
    }
}
