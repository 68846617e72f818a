use std::io::{self, Write};

use clap::Args;
use pizzeria::{
    catalog::{Catalog, MenuQuery, PromotionFilter},
    combos::ComboPricing,
    pricing::display_price,
    products::Portion,
    summary::styled_table,
};
use rust_decimal::Decimal;
use tabled::builder::Builder;

use crate::{
    cli::{load_catalog, output_error},
    config::CatalogConfig,
};

#[derive(Debug, Args)]
pub(crate) struct MenuArgs {
    #[command(flatten)]
    catalog: CatalogConfig,

    /// Also list each pizza's ingredients
    #[arg(long)]
    recipes: bool,

    /// Only list pizzas whose name or description contains this text
    #[arg(long, value_name = "TEXT", default_value = "")]
    search: String,

    /// Filter pizzas by promotion: all, only or none
    #[arg(long, value_name = "FILTER", default_value = "all")]
    promotions: PromotionFilter,
}

pub(crate) async fn run(args: &MenuArgs) -> Result<(), String> {
    let catalog = load_catalog(&args.catalog).await?;
    let query = MenuQuery::new(&args.search, args.promotions);

    write_menu(&catalog, &query, args.recipes, io::stdout().lock())
}

fn write_menu(
    catalog: &Catalog<'_>,
    query: &MenuQuery,
    recipes: bool,
    mut out: impl Write,
) -> Result<(), String> {
    if catalog.is_empty() {
        writeln!(out, "El menú está vacío.").map_err(output_error)?;

        return Ok(());
    }

    let mut matches = catalog.search(query).peekable();

    if matches.peek().is_none() {
        writeln!(out, "Ninguna pizza coincide con la búsqueda.").map_err(output_error)?;

        return Ok(());
    }

    let mut pizzas = Builder::default();
    let mut header = vec!["#", "Pizza", "Entera", "Media", "Puntaje", "Promo"];

    if recipes {
        header.push("Receta");
    }

    pizzas.push_record(header);

    for pizza in matches {
        let mut record = vec![
            pizza.id.to_string(),
            pizza.name.clone(),
            display_price(&pizza.price),
            display_price(&pizza.unit_price(Portion::Half)),
            rating(pizza.rating),
            pizza.promotion.clone().unwrap_or_default(),
        ];

        if recipes {
            record.push(pizza.recipe.join(", "));
        }

        pizzas.push_record(record);
    }

    writeln!(out, "\n{}", styled_table(pizzas, 2..5)).map_err(output_error)?;

    // Combos are listed only for the full menu.
    if catalog.combos().is_empty() || !query.is_unfiltered() {
        return Ok(());
    }

    let mut combos = Builder::default();

    combos.push_record(["Combo", "Pizzas", "Original", "Especial", "Descuento", "Promo"]);

    for combo in catalog.combos() {
        let pricing = ComboPricing::resolve(combo, catalog)
            .map_err(|error| format!("failed to price combo {}: {error}", combo.name))?;

        let names = pricing
            .pizzas()
            .iter()
            .map(|pizza| pizza.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        combos.push_record([
            combo.name.clone(),
            names,
            display_price(&pricing.original_price()),
            display_price(&pricing.special_price()),
            pricing
                .discount_points()
                .map_or_else(|| "-".to_string(), |points| format!("{points}%")),
            combo.promo.clone().unwrap_or_default(),
        ]);
    }

    writeln!(out, "{}", styled_table(combos, 2..5)).map_err(output_error)?;

    Ok(())
}

fn rating(rating: Decimal) -> String {
    if rating.is_zero() {
        "-".to_string()
    } else {
        format!("{rating} ★")
    }
}

#[cfg(test)]
mod tests {
    use pizzeria::fixtures::menu_from_str;
    use testresult::TestResult;

    use super::*;

    const MENU: &str = r#"
pizzas:
  - { id: 1, name: Muzzarella, price: "10 ARS", rating: 4.5, recipe: [salsa, queso] }
  - { id: 2, name: Napolitana, description: Tomate y ajo, price: "10 ARS", promotion: 2x1 }
combos:
  - { name: Pareja, pizzas: [1, 2, 99], price: "15 ARS" }
"#;

    #[test]
    fn menu_lists_pizzas_and_combo_discounts() -> TestResult {
        let catalog = menu_from_str(MENU)?;
        let mut out = Vec::new();

        write_menu(&catalog, &MenuQuery::default(), true, &mut out)?;

        let printed = String::from_utf8(out)?;

        assert!(printed.contains("Muzzarella"), "pizza missing from {printed}");
        assert!(printed.contains("$5.00"), "half price missing from {printed}");
        assert!(printed.contains("salsa, queso"), "recipe missing from {printed}");
        assert!(printed.contains("25%"), "discount missing from {printed}");

        Ok(())
    }

    #[test]
    fn empty_menu_says_so() -> TestResult {
        let mut out = Vec::new();

        write_menu(
            &Catalog::new(rusty_money::iso::ARS),
            &MenuQuery::default(),
            false,
            &mut out,
        )?;

        assert_eq!(String::from_utf8(out)?, "El menú está vacío.\n");

        Ok(())
    }

    #[test]
    fn search_narrows_the_pizza_list() -> TestResult {
        let catalog = menu_from_str(MENU)?;
        let mut out = Vec::new();

        write_menu(&catalog, &MenuQuery::new("AJO", PromotionFilter::Only), false, &mut out)?;

        let printed = String::from_utf8(out)?;

        assert!(printed.contains("Napolitana"), "match missing from {printed}");
        assert!(!printed.contains("Muzzarella"), "non-match listed in {printed}");
        assert!(!printed.contains("Pareja"), "combos listed in {printed}");

        Ok(())
    }

    #[test]
    fn search_without_matches_says_so() -> TestResult {
        let catalog = menu_from_str(MENU)?;
        let mut out = Vec::new();

        write_menu(&catalog, &MenuQuery::new("anchoas", PromotionFilter::All), false, &mut out)?;

        assert_eq!(String::from_utf8(out)?, "Ninguna pizza coincide con la búsqueda.\n");

        Ok(())
    }
}
