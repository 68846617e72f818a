//! Order flow
//!
//! One order attempt moves `Idle → Validating`, then either
//! `Invalid → Idle` with the errors handed back, or `Dispatching → Done`.
//! A link that fails to open sends the attempt back to `Idle` with the cart
//! intact.

use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    cart::Cart,
    catalog::Catalog,
    dispatch::{DispatchError, DispatchReport, Dispatcher},
    order::{OrderDraft, OrderError, Selection, compose},
};

/// Errors that end an order attempt.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The order could not be composed.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The order could not be sent.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Where an order attempt is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowState {
    /// Waiting for the customer to submit
    #[default]
    Idle,

    /// Checking the draft
    Validating,

    /// The draft was refused
    Invalid,

    /// Sending the order
    Dispatching,

    /// The order was sent
    Done,
}

/// Drives order attempts through validation and dispatch.
#[derive(Debug)]
pub struct OrderFlow {
    dispatcher: Dispatcher,
    state: FlowState,
    trail: SmallVec<[FlowState; 5]>,
}

impl OrderFlow {
    /// Create a flow sending orders through `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            state: FlowState::Idle,
            trail: SmallVec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> FlowState {
        self.state
    }

    /// States visited by the latest attempt, starting from `Idle`.
    pub fn trail(&self) -> &[FlowState] {
        &self.trail
    }

    /// Submit the contents of a cart. The cart is cleared once the order is sent.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] if the draft is refused or the link cannot be
    /// opened. The cart is unchanged in both cases.
    pub async fn submit_cart(
        &mut self,
        draft: &OrderDraft,
        cart: &mut Cart,
        catalog: &Catalog<'_>,
    ) -> Result<DispatchReport, FlowError> {
        self.begin();

        let order = match compose(draft, Selection::Cart(&*cart), catalog) {
            Ok(order) => order,
            Err(error) => return Err(self.refuse(error)),
        };

        self.enter(FlowState::Dispatching);

        let result = self.dispatcher.dispatch_cart(&order, cart).await;

        self.finish(result)
    }

    /// Submit a combo by name.
    ///
    /// # Errors
    ///
    /// Returns a [`FlowError`] if the draft is refused or the link cannot be
    /// opened.
    pub async fn submit_combo(
        &mut self,
        draft: &OrderDraft,
        combo: &str,
        catalog: &Catalog<'_>,
    ) -> Result<DispatchReport, FlowError> {
        self.begin();

        let order = match compose(draft, Selection::Combo(combo), catalog) {
            Ok(order) => order,
            Err(error) => return Err(self.refuse(error)),
        };

        self.enter(FlowState::Dispatching);

        let result = self.dispatcher.dispatch(&order).await;

        self.finish(result)
    }

    fn begin(&mut self) {
        self.trail.clear();
        self.state = FlowState::Idle;
        self.trail.push(FlowState::Idle);
        self.enter(FlowState::Validating);
    }

    fn refuse(&mut self, error: OrderError) -> FlowError {
        if matches!(error, OrderError::Invalid(_)) {
            self.enter(FlowState::Invalid);
        }

        self.enter(FlowState::Idle);

        error.into()
    }

    fn finish(
        &mut self,
        result: Result<DispatchReport, DispatchError>,
    ) -> Result<DispatchReport, FlowError> {
        match result {
            Ok(report) => {
                self.enter(FlowState::Done);
                info!(order_logged = report.order_logged(), "order complete");

                Ok(report)
            }
            Err(error) => {
                self.enter(FlowState::Idle);

                Err(error.into())
            }
        }
    }

    fn enter(&mut self, state: FlowState) {
        debug!(from = ?self.state, to = ?state, "order flow");

        self.state = state;
        self.trail.push(state);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rusty_money::{Money, iso::ARS};
    use testresult::TestResult;

    use crate::{
        dispatch::{LaunchError, MockLinkOpener, MockOrderLog},
        order::{ContactDetails, DeliveryMethod},
        products::{Pizza, PizzaId, Portion},
    };

    use super::*;

    fn draft() -> OrderDraft {
        OrderDraft {
            contact: ContactDetails {
                name: "Ana".to_string(),
                address: "San Martín 123".to_string(),
                phone: "3442475466".to_string(),
                special_instructions: String::new(),
            },
            delivery: DeliveryMethod::Deliver,
            ..OrderDraft::default()
        }
    }

    fn flow(opener: MockLinkOpener, order_log: MockOrderLog) -> OrderFlow {
        OrderFlow::new(Dispatcher::new(
            Arc::new(opener),
            Arc::new(order_log),
            "3442475466",
        ))
    }

    #[tokio::test]
    async fn valid_cart_runs_to_done() -> TestResult {
        let catalog = Catalog::with_pizzas(ARS, [Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS))])?;
        let mut cart = Cart::new();

        if let Some(pizza) = catalog.pizza(PizzaId::new(1)) {
            cart.add_item(pizza, Portion::Whole);
        }

        let mut opener = MockLinkOpener::new();
        opener.expect_open().once().return_once(|_| Ok(()));

        let mut order_log = MockOrderLog::new();
        order_log.expect_submit().once().return_once(|_| Ok(()));

        let mut flow = flow(opener, order_log);

        flow.submit_cart(&draft(), &mut cart, &catalog).await?;

        assert_eq!(flow.state(), FlowState::Done);
        assert_eq!(
            flow.trail(),
            &[
                FlowState::Idle,
                FlowState::Validating,
                FlowState::Dispatching,
                FlowState::Done
            ]
        );
        assert!(cart.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn invalid_draft_returns_to_idle_without_dispatching() {
        let catalog = Catalog::new(ARS);
        let mut cart = Cart::new();

        let mut opener = MockLinkOpener::new();
        opener.expect_open().never();

        let mut order_log = MockOrderLog::new();
        order_log.expect_submit().never();

        let mut flow = flow(opener, order_log);

        let result = flow.submit_cart(&draft(), &mut cart, &catalog).await;

        assert!(matches!(
            result,
            Err(FlowError::Order(OrderError::Invalid(_)))
        ));
        assert_eq!(flow.state(), FlowState::Idle);
        assert_eq!(
            flow.trail(),
            &[
                FlowState::Idle,
                FlowState::Validating,
                FlowState::Invalid,
                FlowState::Idle
            ]
        );
    }

    #[tokio::test]
    async fn launch_failure_returns_to_idle_with_cart_intact() -> TestResult {
        let catalog = Catalog::with_pizzas(ARS, [Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS))])?;
        let mut cart = Cart::new();

        if let Some(pizza) = catalog.pizza(PizzaId::new(1)) {
            cart.add_item(pizza, Portion::Whole);
        }

        let mut opener = MockLinkOpener::new();
        opener
            .expect_open()
            .once()
            .return_once(|_| Err(LaunchError::MissingNumber));

        let mut order_log = MockOrderLog::new();
        order_log.expect_submit().never();

        let mut flow = flow(opener, order_log);

        let result = flow.submit_cart(&draft(), &mut cart, &catalog).await;

        assert!(matches!(result, Err(FlowError::Dispatch(_))));
        assert_eq!(flow.state(), FlowState::Idle);
        assert_eq!(cart.total_items(), 1);

        Ok(())
    }
}
