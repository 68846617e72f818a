//! Customer message
//!
//! The text sent to the pizzeria over WhatsApp.

use crate::{
    order::{DeliveryMethod, OrderDraft},
    pricing::format_amount,
    summary::{OrderSummary, SummarySource},
};

/// Compose the message for a validated draft.
#[must_use]
pub fn compose_message(draft: &OrderDraft, summary: &OrderSummary<'_>) -> String {
    let total = format_amount(&summary.total());

    let mut lines = match summary.source() {
        SummarySource::Cart => vec![
            "Hola, me gustaría ordenar:".to_string(),
            summary.items_line(),
            format!("Total: ${total}"),
        ],
        SummarySource::Combo { name, .. } => {
            let pizzas = summary
                .lines()
                .iter()
                .filter_map(|line| line.name.as_deref())
                .collect::<Vec<_>>()
                .join(", ");

            vec![
                format!("Hola, me gustaría ordenar el combo {name}:"),
                format!("Pizzas: {pizzas}"),
                format!("Precio: ${total}"),
            ]
        }
    };

    push_contact(&mut lines, draft);

    lines.join("\n")
}

fn push_contact(lines: &mut Vec<String>, draft: &OrderDraft) {
    let contact = &draft.contact;

    lines.push(format!("Nombre: {}", contact.name.trim()));

    if draft.delivery == DeliveryMethod::Deliver {
        lines.push(format!("Dirección: {}", contact.address.trim()));
    }

    lines.push(format!("Teléfono: {}", contact.phone.trim()));

    if let Some(desired) = draft.desired_time_label() {
        lines.push(format!("Hora deseada: {desired}"));
    }

    let instructions = contact.special_instructions.trim();

    if !instructions.is_empty() {
        lines.push(format!("Instrucciones especiales: {instructions}"));
    }

    if let Some(rating) = draft.rating {
        lines.push(format!("Puntaje: {rating}"));
    }

    lines.push(format!("Para: {}", draft.delivery.label()));
}
