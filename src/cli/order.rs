use std::{
    io::{self, Write},
    sync::Arc,
};

use clap::Args;
use jiff::civil::{Date, DateTime, Time};
use pizzeria::{
    cart::Cart,
    catalog::Catalog,
    combos::ComboPricing,
    dispatch::{CommandOpener, Dispatcher, GoogleFormsLog, LinkOpener, LoggingOpener, whatsapp_url},
    order::{
        ContactDetails, DeliveryMethod, FlowError, OrderDraft, OrderError, OrderFlow, Selection,
        compose,
    },
    products::{PizzaId, Portion},
    schedule::OpeningHours,
    summary::OrderSummary,
};
use tracing::warn;

use crate::{
    cli::{load_catalog, local_now, output_error},
    config::{CatalogConfig, ScheduleConfig, StoreConfig},
};

#[derive(Debug, Args)]
pub(crate) struct OrderArgs {
    #[command(flatten)]
    catalog: CatalogConfig,

    #[command(flatten)]
    store: StoreConfig,

    #[command(flatten)]
    schedule: ScheduleConfig,

    /// Add a whole pizza by id; repeat to add more
    #[arg(long = "pizza", value_name = "ID")]
    pizzas: Vec<u32>,

    /// Add half a pizza by id; repeat to add more
    #[arg(long = "half", value_name = "ID")]
    halves: Vec<u32>,

    /// Order a combo by name instead of pizzas
    #[arg(long, conflicts_with_all = ["pizzas", "halves"])]
    combo: Option<String>,

    /// Customer name
    #[arg(long, default_value = "")]
    name: String,

    /// Contact phone
    #[arg(long, default_value = "")]
    phone: String,

    /// Delivery address
    #[arg(long, default_value = "")]
    address: String,

    /// Special instructions for the kitchen or the driver
    #[arg(long, default_value = "")]
    instructions: String,

    /// Pick the order up instead of having it delivered
    #[arg(long)]
    pickup: bool,

    /// Desired date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<Date>,

    /// Desired time (HH:MM)
    #[arg(long)]
    time: Option<Time>,

    /// Rating for the shop, from 0 to 5
    #[arg(long)]
    rating: Option<u8>,

    /// Print the order and link without sending anything
    #[arg(long)]
    dry_run: bool,
}

impl OrderArgs {
    /// The customer's details, refusing desired dates before `today`.
    fn draft(&self, today: Date) -> OrderDraft {
        OrderDraft {
            contact: ContactDetails {
                name: self.name.clone(),
                address: self.address.clone(),
                phone: self.phone.clone(),
                special_instructions: self.instructions.clone(),
            },
            desired_date: self.date,
            desired_time: self.time,
            earliest_date: Some(today),
            delivery: if self.pickup {
                DeliveryMethod::PickUp
            } else {
                DeliveryMethod::Deliver
            },
            rating: self.rating,
        }
    }

    fn cart(&self, catalog: &Catalog<'_>) -> Cart {
        let mut cart = Cart::new();

        let picks = self
            .pizzas
            .iter()
            .map(|id| (*id, Portion::Whole))
            .chain(self.halves.iter().map(|id| (*id, Portion::Half)));

        for (id, portion) in picks {
            match catalog.pizza(PizzaId::new(id)) {
                Some(pizza) => {
                    cart.add_item(pizza, portion);
                }
                None => warn!(pizza = id, "not on the menu, leaving it out"),
            }
        }

        cart
    }

    fn dispatcher(&self) -> Result<Dispatcher, String> {
        let opener: Arc<dyn LinkOpener> = match &self.store.open_command {
            Some(command) => Arc::new(
                CommandOpener::from_command_line(command)
                    .ok_or_else(|| "open command is empty".to_string())?,
            ),
            None => Arc::new(LoggingOpener),
        };

        Ok(Dispatcher::new(
            opener,
            Arc::new(GoogleFormsLog::new(&self.store.form_url)),
            &self.store.whatsapp_number,
        ))
    }
}

pub(crate) async fn run(args: &OrderArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.catalog).await?;
    let now = local_now(&args.schedule)?;
    let mut out = io::stdout().lock();

    warn_if_closed(now, &mut out)?;

    let draft = args.draft(now.date());
    let mut cart = args.cart(&catalog);

    if args.dry_run {
        return preview(args, &draft, &cart, &catalog, &mut out);
    }

    if let Some(summary) = summary(args.combo.as_deref(), &cart, &catalog)? {
        summary.write_to(&mut out).map_err(|error| error.to_string())?;
    }

    let mut flow = OrderFlow::new(args.dispatcher()?);

    let result = match &args.combo {
        Some(combo) => flow.submit_combo(&draft, combo, &catalog).await,
        None => flow.submit_cart(&draft, &mut cart, &catalog).await,
    };

    match result {
        Ok(report) => {
            writeln!(out, "¡Pedido listo! Si WhatsApp no se abrió, usá este enlace:")
                .and_then(|()| writeln!(out, "{}", report.url))
                .map_err(output_error)?;

            Ok(())
        }
        Err(FlowError::Order(OrderError::Invalid(errors))) => {
            for error in errors.errors() {
                writeln!(out, "• {error}").map_err(output_error)?;
            }

            Err("el pedido no se envió".to_string())
        }
        Err(error) => Err(format!("failed to send order: {error}")),
    }
}

/// What the customer is about to order, when it can be priced yet.
fn summary<'a>(
    combo: Option<&str>,
    cart: &Cart,
    catalog: &Catalog<'a>,
) -> Result<Option<OrderSummary<'a>>, String> {
    let summary = match combo {
        Some(name) => match catalog.combo(name) {
            Some(combo) => ComboPricing::resolve(combo, catalog)
                .map(|pricing| Some(OrderSummary::from_combo(&pricing))),
            None => Ok(None),
        },
        None if cart.is_empty() => Ok(None),
        None => OrderSummary::from_cart(cart, catalog).map(Some),
    };

    summary.map_err(|error| format!("failed to price order: {error}"))
}

fn preview(
    args: &OrderArgs,
    draft: &OrderDraft,
    cart: &Cart,
    catalog: &Catalog<'_>,
    mut out: impl Write,
) -> Result<(), String> {
    let selection = match &args.combo {
        Some(combo) => Selection::Combo(combo),
        None => Selection::Cart(cart),
    };

    let order = match compose(draft, selection, catalog) {
        Ok(order) => order,
        Err(OrderError::Invalid(errors)) => {
            for error in errors.errors() {
                writeln!(out, "• {error}").map_err(output_error)?;
            }

            return Err("el pedido no es válido".to_string());
        }
        Err(error) => return Err(format!("failed to compose order: {error}")),
    };

    let url = whatsapp_url(&args.store.whatsapp_number, &order.message)
        .map_err(|error| error.to_string())?;

    order
        .summary
        .write_to(&mut out)
        .map_err(|error| error.to_string())?;

    writeln!(out, "{}\n\n{url}", order.message).map_err(output_error)?;

    Ok(())
}

fn warn_if_closed(now: DateTime, mut out: impl Write) -> Result<(), String> {
    let hours = OpeningHours::default();

    if hours.is_open_at(now) {
        return Ok(());
    }

    warn!(%now, "ordering while closed");

    let next = hours.next_opening(now).map_or_else(String::new, |at| {
        format!(" Abrimos {}.", at.strftime("%Y-%m-%d a las %H:%M"))
    });

    writeln!(
        out,
        "Ahora estamos cerrados; tu pedido se preparará cuando abramos.{next}"
    )
    .map_err(output_error)
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use jiff::civil::date;
    use pizzeria::fixtures::menu_from_str;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        args: OrderArgs,
    }

    const MENU: &str = r#"
pizzas:
  - { id: 1, name: Muzzarella, price: "10 ARS", half_price: "6 ARS" }
combos:
  - { name: Pareja, pizzas: [1], price: "9 ARS" }
"#;

    fn today() -> Date {
        date(2024, 6, 1)
    }

    fn parse(args: &[&str]) -> Result<OrderArgs, clap::Error> {
        Harness::try_parse_from(std::iter::once("order").chain(args.iter().copied()))
            .map(|harness| harness.args)
    }

    #[test]
    fn builds_cart_and_draft_from_flags() -> TestResult {
        let catalog = menu_from_str(MENU)?;
        let args = parse(&[
            "--pizza", "1", "--pizza", "1", "--half", "1", "--pizza", "42", "--name", "Ana",
            "--phone", "3442", "--pickup", "--time", "21:30",
        ])?;

        let cart = args.cart(&catalog);
        let draft = args.draft(today());

        assert_eq!(cart.total_items(), 3, "unknown ids are left out");
        assert_eq!(cart.total_price_display(&catalog)?, "26.00");
        assert_eq!(draft.delivery, DeliveryMethod::PickUp);
        assert_eq!(draft.desired_time_label().as_deref(), Some("21:30"));

        Ok(())
    }

    #[test]
    fn combo_conflicts_with_pizzas() {
        assert!(
            parse(&["--combo", "Pareja", "--pizza", "1"]).is_err(),
            "combo and pizzas cannot be mixed"
        );
    }

    #[test]
    fn preview_prints_message_and_link() -> TestResult {
        let catalog = menu_from_str(MENU)?;
        let args = parse(&[
            "--combo", "Pareja", "--name", "Ana", "--phone", "3442", "--pickup", "--dry-run",
        ])?;

        let mut out = Vec::new();

        preview(&args, &args.draft(today()), &Cart::new(), &catalog, &mut out)?;

        let printed = String::from_utf8(out)?;

        assert!(
            printed.contains("Hola, me gustaría ordenar el combo Pareja:"),
            "message missing from {printed}"
        );
        assert!(
            printed.contains("https://wa.me/3442475466?text="),
            "link missing from {printed}"
        );

        Ok(())
    }

    #[test]
    fn preview_lists_every_invalid_field() -> TestResult {
        let catalog = menu_from_str(MENU)?;
        let args = parse(&["--pizza", "1"])?;
        let mut out = Vec::new();

        let result = preview(&args, &args.draft(today()), &args.cart(&catalog), &catalog, &mut out);

        let printed = String::from_utf8(out)?;

        assert!(result.is_err(), "an order without contact details is refused");
        assert!(
            printed.contains("Por favor completa el campo"),
            "field errors missing from {printed}"
        );

        Ok(())
    }

    #[test]
    fn preview_refuses_a_date_that_already_passed() -> TestResult {
        let catalog = menu_from_str(MENU)?;
        let args = parse(&[
            "--pizza", "1", "--name", "Ana", "--phone", "3442", "--pickup", "--date",
            "2024-05-31",
        ])?;
        let mut out = Vec::new();

        let result = preview(&args, &args.draft(today()), &args.cart(&catalog), &catalog, &mut out);

        assert!(result.is_err(), "a past date is refused");
        assert_eq!(String::from_utf8(out)?, "• La fecha de entrega 2024-05-31 ya pasó\n");

        Ok(())
    }
}
