//! Integration tests for the whole ordering path: a cart built from the
//! classic menu fixture, validated and composed, then sent through mocked
//! link opener and order log.

use std::sync::Arc;

use jiff::{SignedDuration, Timestamp, civil::time};
use testresult::TestResult;

use pizzeria::{
    cart::{Cart, DebouncedCart, GuardOutcome},
    catalog::Catalog,
    dispatch::{Dispatcher, MockLinkOpener, MockOrderLog, OrderLogError},
    fixtures::Fixture,
    order::{
        ContactDetails, DeliveryMethod, FlowError, FlowState, OrderDraft, OrderError, OrderField,
        OrderFlow,
        form::{ITEMS_FIELD, RATING_FIELD, TOTAL_FIELD},
    },
    products::{PizzaId, Portion},
};

fn menu() -> Result<Catalog<'static>, pizzeria::fixtures::FixtureError> {
    Fixture::new().load_menu("classic")
}

fn draft() -> OrderDraft {
    OrderDraft {
        contact: ContactDetails {
            name: "Ana".to_string(),
            address: "San Martín 123".to_string(),
            phone: "3442 123456".to_string(),
            special_instructions: "Tocar timbre".to_string(),
        },
        desired_time: Some(time(21, 0, 0, 0)),
        delivery: DeliveryMethod::Deliver,
        rating: Some(5),
        ..OrderDraft::default()
    }
}

fn at(millis: i64) -> Timestamp {
    Timestamp::UNIX_EPOCH + SignedDuration::from_millis(millis)
}

#[tokio::test]
async fn cart_order_is_sent_and_logged() -> TestResult {
    let catalog = menu()?;
    let muzzarella = catalog.pizza(PizzaId::new(1)).ok_or("missing Muzzarella")?;

    // A double click on "add" only counts once.
    let mut guarded = DebouncedCart::new(Cart::new());

    assert_eq!(guarded.add_item(muzzarella, Portion::Whole, at(0)), GuardOutcome::Applied(1));
    assert_eq!(guarded.add_item(muzzarella, Portion::Whole, at(30)), GuardOutcome::Ignored);
    assert_eq!(guarded.add_item(muzzarella, Portion::Whole, at(500)), GuardOutcome::Applied(2));
    assert_eq!(guarded.add_item(muzzarella, Portion::Half, at(510)), GuardOutcome::Applied(1));

    let mut opener = MockLinkOpener::new();
    opener
        .expect_open()
        .once()
        .withf(|url| {
            url.starts_with("https://wa.me/3442475466?text=")
                && url.contains("2x%20Muzzarella")
                && url.contains("1x%20Muzzarella%20%28media%29")
                && url.contains("Total%3A%20%2425500.00")
        })
        .return_once(|_| Ok(()));

    let mut order_log = MockOrderLog::new();
    order_log
        .expect_submit()
        .once()
        .withf(|payload| {
            payload.get(TOTAL_FIELD) == Some("25500.00")
                && payload.get(RATING_FIELD) == Some("5")
                && payload.get(ITEMS_FIELD) == Some("2x Muzzarella, 1x Muzzarella (media)")
        })
        .return_once(|_| Ok(()));

    let mut flow = OrderFlow::new(Dispatcher::new(
        Arc::new(opener),
        Arc::new(order_log),
        "3442475466",
    ));

    let report = flow
        .submit_cart(&draft(), guarded.cart_mut(), &catalog)
        .await?;

    assert!(report.order_logged(), "order log accepted the order");
    assert_eq!(flow.state(), FlowState::Done);
    assert!(guarded.cart().is_empty(), "cart is cleared once sent");

    Ok(())
}

#[tokio::test]
async fn combo_order_survives_order_log_outage() -> TestResult {
    let catalog = menu()?;

    let mut opener = MockLinkOpener::new();
    opener
        .expect_open()
        .once()
        .withf(|url| url.contains("combo%20Familiar") && url.contains("Precio%3A%20%2430000.00"))
        .return_once(|_| Ok(()));

    let mut order_log = MockOrderLog::new();
    order_log
        .expect_submit()
        .once()
        .withf(|payload| payload.get(ITEMS_FIELD) == Some("Familiar"))
        .return_once(|_| Err(OrderLogError::UnexpectedStatus(503)));

    let mut flow = OrderFlow::new(Dispatcher::new(
        Arc::new(opener),
        Arc::new(order_log),
        "3442475466",
    ));

    let report = flow.submit_combo(&draft(), "Familiar", &catalog).await?;

    assert!(!report.order_logged(), "order log outage is reported");
    assert_eq!(flow.state(), FlowState::Done, "outage does not fail the order");

    Ok(())
}

#[tokio::test]
async fn pickup_order_without_phone_is_refused() -> TestResult {
    let catalog = menu()?;
    let mut cart = Cart::new();

    cart.add_item(
        catalog.pizza(PizzaId::new(3)).ok_or("missing Fugazzeta")?,
        Portion::Whole,
    );

    let mut opener = MockLinkOpener::new();
    opener.expect_open().never();

    let mut order_log = MockOrderLog::new();
    order_log.expect_submit().never();

    let mut flow = OrderFlow::new(Dispatcher::new(
        Arc::new(opener),
        Arc::new(order_log),
        "3442475466",
    ));

    let draft = OrderDraft {
        contact: ContactDetails {
            name: "Ana".to_string(),
            ..ContactDetails::default()
        },
        delivery: DeliveryMethod::PickUp,
        ..OrderDraft::default()
    };

    let result = flow.submit_cart(&draft, &mut cart, &catalog).await;

    let Err(FlowError::Order(OrderError::Invalid(errors))) = result else {
        panic!("expected validation errors");
    };

    assert_eq!(errors.first_field(), Some(OrderField::Phone));
    assert!(!errors.has(OrderField::Address), "address is optional for pickup");
    assert_eq!(flow.state(), FlowState::Idle);
    assert_eq!(cart.total_items(), 1, "cart is kept for another attempt");

    Ok(())
}
