//! Optimistic wishlist membership state machine.
//!
//! Membership is binary per product and flips immediately on a tap, before
//! the remote store confirms. The table records the target captured at tap
//! time together with a per-id generation; completions carry that token
//! back, so an out-of-order or superseded completion can never move the
//! displayed state away from the last tap's target (last-tap-wins).
//!
//! The table is owned by the controller and keyed by product id - membership
//! is never stashed on a rendering element.

use crate::{Generation, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Membership state for one (user, product) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Membership {
    /// No probe has resolved yet
    Unknown,
    /// Confirmed not wishlisted
    Out,
    /// Confirmed wishlisted
    In,
    /// A toggle is in flight
    #[serde(rename_all = "camelCase")]
    Pending {
        /// Displayed (optimistic) state, captured at tap time
        target: bool,
        /// Displayed state just before the tap; restored on failure
        prior: bool,
    },
}

/// Proof of which tap a completion belongs to.
///
/// Captured when the tap is taken, presented back on confirm/fail. A token
/// from a superseded tap is stale and its completion is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapToken {
    generation: Generation,
}

/// What a tap decided: the membership to write remotely, plus the token the
/// eventual completion must present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleIntent {
    /// Desired membership: `true` = add to wishlist, `false` = remove
    pub target: bool,
    /// Token identifying this tap
    pub token: TapToken,
}

/// Membership table for all products on screen.
#[derive(Debug, Clone, Default)]
pub struct WishlistState {
    states: HashMap<ProductId, Membership>,
    generations: HashMap<ProductId, Generation>,
}

impl WishlistState {
    /// Create an empty table; every product starts [`Membership::Unknown`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Bulk-initialize from the remote wishlist listing.
    ///
    /// Replaces the whole table: listed ids become [`Membership::In`],
    /// everything else reverts to [`Membership::Unknown`]. Duplicate ids in
    /// the listing collapse to one entry.
    pub fn load(&mut self, ids: impl IntoIterator<Item = ProductId>) {
        self.states.clear();
        for id in ids {
            self.states.insert(id, Membership::In);
        }
    }

    /// Resolve a membership probe for one product.
    ///
    /// Only moves `Unknown` to a confirmed state; a probe landing after the
    /// user already tapped must not clobber the in-flight toggle.
    pub fn resolve_probe(&mut self, id: impl Into<ProductId>, present: bool) {
        let id = id.into();
        let state = self.states.entry(id).or_insert(Membership::Unknown);
        if *state == Membership::Unknown {
            *state = if present { Membership::In } else { Membership::Out };
        }
    }

    /// Register a tap: flip the displayed state and record the target.
    ///
    /// An `Unknown` product is treated as not wishlisted, so the first tap
    /// targets membership. Returns the intent the controller sends to the
    /// gateway.
    pub fn tap(&mut self, id: impl Into<ProductId>) -> ToggleIntent {
        let id = id.into();
        let displayed = self.is_wishlisted(&id);
        let target = !displayed;

        let generation = self.bump(&id);
        self.states.insert(
            id,
            Membership::Pending {
                target,
                prior: displayed,
            },
        );

        ToggleIntent {
            target,
            token: TapToken { generation },
        }
    }

    /// Confirm the tap identified by `token`: `Pending` settles on its
    /// target. Stale tokens no-op.
    pub fn confirm(&mut self, id: &str, token: TapToken) {
        if !self.is_current(id, token) {
            return;
        }
        if let Some(Membership::Pending { target, .. }) = self.states.get(id).copied() {
            self.states.insert(id.to_string(), confirmed(target));
        }
    }

    /// Fail the tap identified by `token`: roll back to the pre-tap state.
    /// Stale tokens no-op.
    pub fn fail(&mut self, id: &str, token: TapToken) {
        if !self.is_current(id, token) {
            return;
        }
        if let Some(Membership::Pending { prior, .. }) = self.states.get(id).copied() {
            self.states.insert(id.to_string(), confirmed(prior));
        }
    }

    /// The state to display: last confirmed or optimistic membership, never
    /// a transient broken value.
    pub fn is_wishlisted(&self, id: &str) -> bool {
        match self.states.get(id) {
            Some(Membership::In) => true,
            Some(Membership::Pending { target, .. }) => *target,
            Some(Membership::Unknown) | Some(Membership::Out) | None => false,
        }
    }

    /// Raw state for one product.
    pub fn state(&self, id: &str) -> Membership {
        self.states.get(id).copied().unwrap_or(Membership::Unknown)
    }

    /// Ids currently displayed as wishlisted.
    pub fn ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<_> = self
            .states
            .keys()
            .filter(|id| self.is_wishlisted(id))
            .cloned()
            .collect();
        ids.sort();
        ids
    }

    /// Count of ids currently displayed as wishlisted.
    pub fn len(&self) -> usize {
        self.states.keys().filter(|id| self.is_wishlisted(id)).count()
    }

    /// Check if nothing is displayed as wishlisted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_current(&self, id: &str, token: TapToken) -> bool {
        self.generations.get(id).copied() == Some(token.generation)
    }

    fn bump(&mut self, id: &str) -> Generation {
        let entry = self.generations.entry(id.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }
}

fn confirmed(present: bool) -> Membership {
    if present {
        Membership::In
    } else {
        Membership::Out
    }
}
