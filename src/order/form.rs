//! Order log form payload
//!
//! Orders are logged by submitting a Google Form. The field ids below belong
//! to that form and must not change.

use smallvec::SmallVec;

use crate::{order::OrderDraft, pricing::format_amount, summary::OrderSummary};

/// Customer name
pub const NAME_FIELD: &str = "entry.2020561029";
/// Delivery address
pub const ADDRESS_FIELD: &str = "entry.1741915942";
/// Contact phone
pub const PHONE_FIELD: &str = "entry.1517497244";
/// `Enviar` or `Retirar`
pub const DELIVERY_FIELD: &str = "entry.1807112285";
/// Special instructions
pub const INSTRUCTIONS_FIELD: &str = "entry.1563818822";
/// Rating, 0 to 5
pub const RATING_FIELD: &str = "entry.1020783902";
/// Desired date and time
pub const DESIRED_TIME_FIELD: &str = "entry.195003812";
/// Items line, or the combo name
pub const ITEMS_FIELD: &str = "entry.1789182107";
/// Total amount
pub const TOTAL_FIELD: &str = "entry.849798555";

/// Ordered form fields for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPayload {
    fields: SmallVec<[(&'static str, String); 9]>,
}

impl FormPayload {
    /// Build the payload for a validated draft.
    #[must_use]
    pub fn new(draft: &OrderDraft, summary: &OrderSummary<'_>) -> Self {
        let contact = &draft.contact;

        let items = summary
            .combo_name()
            .map_or_else(|| summary.items_line(), ToString::to_string);

        let fields = [
            (NAME_FIELD, contact.name.trim().to_string()),
            (ADDRESS_FIELD, contact.address.trim().to_string()),
            (PHONE_FIELD, contact.phone.trim().to_string()),
            (DELIVERY_FIELD, draft.delivery.label().to_string()),
            (INSTRUCTIONS_FIELD, contact.special_instructions.trim().to_string()),
            (RATING_FIELD, draft.rating.unwrap_or_default().to_string()),
            (DESIRED_TIME_FIELD, draft.desired_time_label().unwrap_or_default()),
            (ITEMS_FIELD, items),
            (TOTAL_FIELD, format_amount(&summary.total())),
        ];

        Self {
            fields: SmallVec::from_iter(fields),
        }
    }

    /// Fields in submission order.
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// Look up a field value by id.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == field)
            .map(|(_, value)| value.as_str())
    }
}
