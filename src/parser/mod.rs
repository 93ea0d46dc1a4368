pub mod fields;
pub mod items;

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::model::Order;

static ORDER_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".order").unwrap());
static LABEL_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".order-info .label").unwrap());
static VALUE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".value").unwrap());
static DETAILS_LINK_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".yohtmlc-order-details-link").unwrap());
static ITEM_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".yohtmlc-item").unwrap());

/// Extract every order on one history page, in document order.
/// An empty Vec is the pagination terminator.
pub fn extract_orders(doc: &Html, base_url: &str) -> Vec<Order> {
    doc.select(&ORDER_SEL)
        .map(|order_el| extract_order(order_el, base_url))
        .collect()
}

fn extract_order(order_el: ElementRef, base_url: &str) -> Order {
    let mut order = Order::default();

    for label_el in order_el.select(&LABEL_SEL) {
        // Labels and values are siblings at varying nesting depth, so the
        // value is located by ancestor proximity rather than a fixed path.
        // A label with no reachable value is skipped.
        let Some((anchor, value_el)) = find_value_anchor(label_el) else {
            continue;
        };
        let label = inner_text(label_el);
        let value = inner_text(value_el);
        fields::classify(&mut order, &label, &value, anchor);
    }

    order.url = order_el
        .select(&DETAILS_LINK_SEL)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(|href| format!("{base_url}{href}"))
        .unwrap_or_default();

    order.items = order_el
        .select(&ITEM_SEL)
        .map(|item_el| items::extract_item(item_el, base_url))
        .collect();

    order
}

/// Ascend from the label's parent until an ancestor subtree contains a value
/// marker; stop after `<body>` so a malformed tree cannot loop forever.
fn find_value_anchor(label_el: ElementRef) -> Option<(ElementRef, ElementRef)> {
    for anchor in label_el.ancestors().filter_map(ElementRef::wrap) {
        if let Some(value_el) = anchor.select(&VALUE_SEL).next() {
            return Some((anchor, value_el));
        }
        if anchor.value().name() == "body" {
            break;
        }
    }
    None
}

/// Whitespace-collapsed display text of an element and its descendants.
pub(crate) fn inner_text(el: ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn has_class(el: ElementRef, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_fixture(name: &str) -> Html {
        let html =
            std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        Html::parse_document(&html)
    }

    const BASE: &str = "https://www.amazon.co.jp";

    #[test]
    fn history_page_orders() {
        let doc = parse_fixture("order_history");
        let orders = extract_orders(&doc, BASE);
        assert_eq!(orders.len(), 2);

        let first = &orders[0];
        assert_eq!(first.id, "503-1234567-0123456");
        assert_eq!(first.ordered_at, "2020/05/01");
        assert_eq!(first.total, "1234");
        assert_eq!(
            first.url,
            "https://www.amazon.co.jp/gp/css/summary/edit.html?orderID=503-1234567-0123456"
        );
        assert!(first
            .params
            .iter()
            .any(|p| p.label == "totalOrig" && p.value == "￥1,234"));
    }

    #[test]
    fn items_preserve_document_order() {
        let doc = parse_fixture("order_history");
        let orders = extract_orders(&doc, BASE);
        let items = &orders[0].items;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "テスト商品 その1");
        assert_eq!(items[0].kind, "kindle");
        assert_eq!(items[0].url, "https://www.amazon.co.jp/gp/product/B08XYZ1234");
        assert_eq!(items[1].title, "テスト商品 その2");
        assert_eq!(items[1].kind, "");
    }

    #[test]
    fn unknown_label_lands_in_params() {
        let doc = parse_fixture("order_history");
        let orders = extract_orders(&doc, BASE);
        let second = &orders[1];
        assert!(second
            .params
            .iter()
            .any(|p| p.label == "お届け先" && p.value == "山田太郎"));
        // Labels consumed into named fields never duplicate into params.
        assert!(!second.params.iter().any(|p| p.label == "注文日"));
    }

    #[test]
    fn order_without_details_link_or_items() {
        let doc = parse_fixture("order_history");
        let orders = extract_orders(&doc, BASE);
        assert_eq!(orders[1].url, "");
        assert!(orders[1].items.is_empty());
    }

    #[test]
    fn empty_page_terminates() {
        let doc = parse_fixture("empty_page");
        assert!(extract_orders(&doc, BASE).is_empty());
    }

    #[test]
    fn dangling_label_is_skipped() {
        // No value marker anywhere: the pair is dropped, not an error.
        let doc = Html::parse_document(
            r#"<div class="order"><div class="order-info">
                 <span class="label">配送オプション</span>
               </div></div>"#,
        );
        let orders = extract_orders(&doc, BASE);
        assert_eq!(orders.len(), 1);
        assert!(orders[0].params.is_empty());
        assert_eq!(orders[0].id, "");
    }

    #[test]
    fn value_found_at_varying_depth() {
        // Label nested two levels below the row that holds the value.
        let doc = Html::parse_document(
            r#"<div class="order"><div class="order-info">
                 <div class="a-row">
                   <div class="a-column"><div><span class="label">注文日</span></div></div>
                   <div class="a-column"><span class="value">2021/01/02</span></div>
                 </div>
               </div></div>"#,
        );
        let orders = extract_orders(&doc, BASE);
        assert_eq!(orders[0].ordered_at, "2021/01/02");
    }
}
