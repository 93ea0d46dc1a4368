use scraper::ElementRef;

use super::has_class;
use crate::model::{Order, Param};

/// Label text identifying the order date on the Japanese storefront.
const ORDER_DATE_LABEL: &str = "注文日";
/// Reserved param label holding the unstripped total text.
const TOTAL_ORIG_LABEL: &str = "totalOrig";

#[derive(Debug, Clone, Copy)]
enum Rule {
    AnchorClass(&'static str),
    LabelIs(&'static str),
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Id,
    Total,
    OrderedAt,
}

/// Closed rule set, evaluated in order; first match wins and anything left
/// over goes to the generic params bucket.
const RULES: &[(Rule, Slot)] = &[
    (Rule::AnchorClass("yohtmlc-order-id"), Slot::Id),
    (Rule::AnchorClass("yohtmlc-order-total"), Slot::Total),
    (Rule::LabelIs(ORDER_DATE_LABEL), Slot::OrderedAt),
];

/// Assign one label/value pair to the order under construction. `anchor` is
/// the nearest ancestor of the label that contains the value.
pub fn classify(order: &mut Order, label: &str, value: &str, anchor: ElementRef) {
    let slot = RULES.iter().find_map(|(rule, slot)| {
        let hit = match rule {
            Rule::AnchorClass(class) => has_class(anchor, class),
            Rule::LabelIs(term) => label == *term,
        };
        hit.then_some(*slot)
    });

    match slot {
        Some(Slot::Id) => order.id = value.to_string(),
        Some(Slot::Total) => {
            order.total = strip_amount(value);
            order.params.push(Param {
                label: TOTAL_ORIG_LABEL.to_string(),
                value: value.to_string(),
            });
        }
        Some(Slot::OrderedAt) => order.ordered_at = value.to_string(),
        None => order.params.push(Param {
            label: label.to_string(),
            value: value.to_string(),
        }),
    }
}

/// Keep ASCII digits and the decimal point; currency symbols, thousands
/// separators and non-ASCII digits are discarded, not converted.
fn strip_amount(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

// ── Tests ──
