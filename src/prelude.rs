//! Pizzeria prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, DebouncedCart, GuardOutcome},
    catalog::{
        Catalog, CatalogError, CatalogLoader, CatalogSource, FileSource, MenuQuery,
        PromotionFilter, SpreadsheetSource,
    },
    combos::{ComboOffer, ComboPricing},
    dispatch::{
        CommandOpener, DispatchError, DispatchReport, Dispatcher, GoogleFormsLog, LaunchError,
        LinkOpener, OrderLog, OrderLogError,
    },
    fixtures::{Fixture, FixtureError},
    order::{
        ComposedOrder, ContactDetails, DeliveryMethod, FlowError, FlowState, OrderDraft,
        OrderError, OrderFlow, Selection, ValidationErrors, compose,
    },
    pricing::PricingError,
    products::{Pizza, PizzaId, Portion},
    schedule::{OpeningHours, OpeningWindow},
    summary::OrderSummary,
};
