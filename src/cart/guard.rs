//! Repeat guard
//!
//! Double taps on the add or remove buttons arrive as two events a few
//! milliseconds apart. [`DebouncedCart`] applies the first and drops repeats
//! of the same action on the same line until the window has passed.

use jiff::{SignedDuration, Timestamp};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::{
    cart::Cart,
    products::{Pizza, PizzaId, Portion},
};

/// Default repeat window.
pub const DEFAULT_WINDOW: SignedDuration = SignedDuration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Action {
    Add,
    Remove,
}

/// Whether a guarded cart operation went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    /// The operation was applied with this result.
    Applied(T),

    /// The operation repeated a recent one and was dropped.
    Ignored,
}

/// A cart that ignores rapid repeats of the same operation.
#[derive(Debug, Clone)]
pub struct DebouncedCart {
    cart: Cart,
    window: SignedDuration,
    last_applied: FxHashMap<(Action, PizzaId, Portion), Timestamp>,
}

impl DebouncedCart {
    /// Guard a cart with the default window.
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        Self::with_window(cart, DEFAULT_WINDOW)
    }

    /// Guard a cart with a custom window.
    #[must_use]
    pub fn with_window(cart: Cart, window: SignedDuration) -> Self {
        Self {
            cart,
            window,
            last_applied: FxHashMap::default(),
        }
    }

    /// Add one unit unless the same add was applied within the window.
    pub fn add_item(&mut self, pizza: &Pizza<'_>, portion: Portion, now: Timestamp) -> GuardOutcome<u32> {
        if !self.admit((Action::Add, pizza.id, portion), now) {
            return GuardOutcome::Ignored;
        }

        GuardOutcome::Applied(self.cart.add_item(pizza, portion))
    }

    /// Remove one unit unless the same removal was applied within the window.
    pub fn remove_item(
        &mut self,
        pizza: PizzaId,
        portion: Portion,
        now: Timestamp,
    ) -> GuardOutcome<Option<u32>> {
        if !self.admit((Action::Remove, pizza, portion), now) {
            return GuardOutcome::Ignored;
        }

        GuardOutcome::Applied(self.cart.remove_item(pizza, portion))
    }

    /// The guarded cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Mutable access to the cart, bypassing the guard.
    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Release the cart.
    #[must_use]
    pub fn into_inner(self) -> Cart {
        self.cart
    }

    fn admit(&mut self, key: (Action, PizzaId, Portion), now: Timestamp) -> bool {
        // A clock that stepped back does not count as a repeat.
        let recent = self.last_applied.get(&key).is_some_and(|last| {
            let elapsed = now.duration_since(*last);

            !elapsed.is_negative() && elapsed < self.window
        });

        if recent {
            trace!(action = ?key.0, pizza = %key.1, portion = ?key.2, "ignoring repeat");
            return false;
        }

        self.last_applied.insert(key, now);

        true
    }
}
