//! Combos
//!
//! A combo is a fixed bundle of pizzas sold at a flat special price. The
//! original price is never stored; it is derived from whatever the current
//! catalog resolves for the combo's pizza ids.

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    catalog::Catalog,
    pricing::{PricingError, sum},
    products::{Pizza, PizzaId},
};

/// A combo offer from the combos sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboOffer<'a> {
    /// Combo name, unique within a catalog
    pub name: String,

    /// Pizzas in the combo, without duplicates, in sheet order
    pub pizza_ids: SmallVec<[PizzaId; 4]>,

    /// Flat price of the whole combo
    pub special_price: Money<'a, Currency>,

    /// Promotion label
    pub promo: Option<String>,
}

impl<'a> ComboOffer<'a> {
    /// Creates a combo, dropping repeated pizza ids.
    pub fn new(
        name: impl Into<String>,
        pizza_ids: impl IntoIterator<Item = PizzaId>,
        special_price: Money<'a, Currency>,
    ) -> Self {
        let mut ids: SmallVec<[PizzaId; 4]> = SmallVec::new();

        for id in pizza_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        Self {
            name: name.into(),
            pizza_ids: ids,
            special_price,
            promo: None,
        }
    }

    /// Sets the promotion label.
    #[must_use]
    pub fn with_promo(mut self, promo: impl Into<String>) -> Self {
        self.promo = Some(promo.into());
        self
    }
}

/// A combo resolved against a catalog.
#[derive(Debug, Clone)]
pub struct ComboPricing<'c, 'a> {
    combo: &'c ComboOffer<'a>,
    pizzas: SmallVec<[&'c Pizza<'a>; 4]>,
    missing: SmallVec<[PizzaId; 2]>,
    original_price: Money<'a, Currency>,
}

impl<'c, 'a> ComboPricing<'c, 'a> {
    /// Resolves a combo's pizzas and derives its original price.
    ///
    /// Ids that are not in the catalog are left out of the price and listed in
    /// [`ComboPricing::missing`].
    ///
    /// # Errors
    ///
    /// Returns a [`PricingError`] if the pizza prices cannot be summed.
    pub fn resolve(
        combo: &'c ComboOffer<'a>,
        catalog: &'c Catalog<'a>,
    ) -> Result<Self, PricingError> {
        let mut pizzas: SmallVec<[&'c Pizza<'a>; 4]> = SmallVec::new();
        let mut missing: SmallVec<[PizzaId; 2]> = SmallVec::new();

        for id in &combo.pizza_ids {
            match catalog.pizza(*id) {
                Some(pizza) => pizzas.push(pizza),
                None => {
                    debug!(combo = %combo.name, pizza = %id, "combo references unknown pizza");
                    missing.push(*id);
                }
            }
        }

        let original_price = sum(
            pizzas.iter().map(|pizza| pizza.price),
            catalog.currency(),
        )?;

        Ok(Self {
            combo,
            pizzas,
            missing,
            original_price,
        })
    }

    /// The combo being priced.
    pub fn combo(&self) -> &'c ComboOffer<'a> {
        self.combo
    }

    /// Pizzas that resolved against the catalog.
    pub fn pizzas(&self) -> &[&'c Pizza<'a>] {
        &self.pizzas
    }

    /// Ids that did not resolve.
    pub fn missing(&self) -> &[PizzaId] {
        &self.missing
    }

    /// Sum of the resolved pizzas' full prices.
    pub fn original_price(&self) -> Money<'a, Currency> {
        self.original_price
    }

    /// The combo's flat price.
    pub fn special_price(&self) -> Money<'a, Currency> {
        self.combo.special_price
    }

    /// Amount saved against buying the pizzas separately.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the currencies differ.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.original_price.sub(self.combo.special_price)
    }

    /// Discount as a fraction of the original price.
    ///
    /// `None` when the original price is zero, which happens when none of the
    /// combo's pizzas resolved.
    pub fn discount(&self) -> Option<Percentage> {
        self.discount_ratio().map(Percentage::from)
    }

    /// Discount in whole percentage points, rounding halves up.
    ///
    /// An original price of 20.00 and a special price of 15.00 gives `25`.
    pub fn discount_points(&self) -> Option<i64> {
        let points = self.discount_ratio()? * Decimal::ONE_HUNDRED;

        (points + Decimal::new(5, 1)).floor().to_i64()
    }

    fn discount_ratio(&self) -> Option<Decimal> {
        let original = Decimal::from(self.original_price.to_minor_units());

        if original.is_zero() {
            return None;
        }

        let special = Decimal::from(self.combo.special_price.to_minor_units());

        (original - special).checked_div(original)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::ARS;
    use testresult::TestResult;

    use crate::catalog::CatalogError;

    use super::*;

    fn catalog() -> Result<Catalog<'static>, CatalogError> {
        Catalog::with_pizzas(
            ARS,
            [
                Pizza::new(1, "Muzzarella", Money::from_minor(1000, ARS)),
                Pizza::new(2, "Napolitana", Money::from_minor(1000, ARS)),
                Pizza::new(3, "Calabresa", Money::from_minor(1200, ARS)),
            ],
        )
    }

    #[test]
    fn new_drops_repeated_ids() {
        let combo = ComboOffer::new(
            "Pareja",
            [PizzaId::new(1), PizzaId::new(2), PizzaId::new(1)],
            Money::from_minor(1500, ARS),
        );

        assert_eq!(combo.pizza_ids.as_slice(), &[PizzaId::new(1), PizzaId::new(2)]);
    }

    #[test]
    fn original_price_sums_resolved_pizzas() -> TestResult {
        let catalog = catalog()?;
        let combo = ComboOffer::new(
            "Pareja",
            [PizzaId::new(1), PizzaId::new(2)],
            Money::from_minor(1500, ARS),
        );

        let pricing = ComboPricing::resolve(&combo, &catalog)?;

        assert_eq!(pricing.original_price(), Money::from_minor(2000, ARS));
        assert_eq!(pricing.savings()?, Money::from_minor(500, ARS));
        assert_eq!(pricing.discount_points(), Some(25));
        assert!(pricing.discount().is_some(), "expected a discount");

        Ok(())
    }

    #[test]
    fn unknown_ids_are_excluded_from_original_price() -> TestResult {
        let catalog = catalog()?;
        let combo = ComboOffer::new(
            "Fantasma",
            [PizzaId::new(3), PizzaId::new(42)],
            Money::from_minor(1000, ARS),
        );

        let pricing = ComboPricing::resolve(&combo, &catalog)?;

        assert_eq!(pricing.original_price(), Money::from_minor(1200, ARS));
        assert_eq!(pricing.pizzas().len(), 1);
        assert_eq!(pricing.missing(), &[PizzaId::new(42)]);

        Ok(())
    }

    #[test]
    fn discount_is_undefined_when_nothing_resolves() -> TestResult {
        let catalog = catalog()?;
        let combo = ComboOffer::new("Vacio", [PizzaId::new(99)], Money::from_minor(1000, ARS));

        let pricing = ComboPricing::resolve(&combo, &catalog)?;

        assert_eq!(pricing.original_price(), Money::from_minor(0, ARS));
        assert_eq!(pricing.discount_points(), None);
        assert!(pricing.discount().is_none(), "expected no discount");

        Ok(())
    }

    #[test]
    fn discount_points_round_half_up() -> TestResult {
        let catalog = Catalog::with_pizzas(ARS, [Pizza::new(1, "Especial", Money::from_minor(800, ARS))])?;

        // 1 / 8 = 12.5%
        let combo = ComboOffer::new("Octavo", [PizzaId::new(1)], Money::from_minor(700, ARS));
        let pricing = ComboPricing::resolve(&combo, &catalog)?;

        assert_eq!(pricing.discount_points(), Some(13));

        Ok(())
    }

    #[test]
    fn special_price_above_original_gives_negative_discount() -> TestResult {
        let catalog = catalog()?;
        let combo = ComboOffer::new("Caro", [PizzaId::new(1)], Money::from_minor(1100, ARS));

        let pricing = ComboPricing::resolve(&combo, &catalog)?;

        assert_eq!(pricing.discount_points(), Some(-10));

        Ok(())
    }
}
