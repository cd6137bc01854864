use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{core::score::ScoredOffer, quantity::Cost};

/// Render the scored batch the way `peek` shows it.
pub fn build_offers_table(offers: &[ScoredOffer]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec!["Supplier", "Plan", "Price", "Term", "Fee", "Estimated", "Savings"]);
    for offer in offers {
        table.add_row(vec![
            Cell::new(&offer.supplier_company).add_attribute(Attribute::Dim),
            Cell::new(&offer.display_company),
            Cell::new(offer.price).set_alignment(CellAlignment::Right),
            Cell::new(format!("{} mo", offer.term_length)).set_alignment(CellAlignment::Right),
            Cell::new(offer.monthly_fee).set_alignment(CellAlignment::Right),
            Cell::new(offer.estimated_monthly_cost).set_alignment(CellAlignment::Right),
            Cell::new(offer.savings_vs_current).set_alignment(CellAlignment::Right).fg(
                if offer.savings_vs_current > Cost::ZERO { Color::Green } else { Color::Red },
            ),
        ]);
    }
    table
}
