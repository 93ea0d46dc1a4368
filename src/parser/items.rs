use scraper::ElementRef;

use super::inner_text;
use crate::model::Item;

/// Product-page link prefix.
const PRODUCT_PATH: &str = "/gp/product/";
/// Marker phrase identifying a digital edition.
const KINDLE_MARKER: &str = "Kindle 版";
const KINDLE_TYPE: &str = "kindle";

/// Scan every descendant of one line-item subtree. A later product link
/// overwrites an earlier one (inherited last-match-wins); the digital-edition
/// check is independent of the link check.
pub fn extract_item(item_el: ElementRef, base_url: &str) -> Item {
    let mut item = Item::default();

    for el in item_el.descendants().skip(1).filter_map(ElementRef::wrap) {
        if el.value().name() == "a" {
            if let Some(href) = el.value().attr("href") {
                if href.starts_with(PRODUCT_PATH) {
                    item.url = format!("{base_url}{href}");
                    item.title = inner_text(el);
                }
            }
        }
        if inner_text(el).contains(KINDLE_MARKER) {
            item.kind = KINDLE_TYPE.to_string();
        }
    }

    item
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    const BASE: &str = "https://www.amazon.co.jp";

    fn extract(html: &str) -> Item {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse(".yohtmlc-item").unwrap();
        let item_el = doc.select(&sel).next().unwrap();
        extract_item(item_el, BASE)
    }

    #[test]
    fn product_link_and_title() {
        let item = extract(
            r#"<div class="yohtmlc-item">
                 <a href="/gp/product/B08XYZ1234"> テスト商品 </a>
               </div>"#,
        );
        assert_eq!(item.url, "https://www.amazon.co.jp/gp/product/B08XYZ1234");
        assert_eq!(item.title, "テスト商品");
        assert_eq!(item.kind, "");
    }

    #[test]
    fn kindle_marker_sets_type() {
        let item = extract(
            r#"<div class="yohtmlc-item">
                 <a href="/gp/product/B08XYZ1234">本のタイトル</a>
                 <span>Kindle 版</span>
               </div>"#,
        );
        assert_eq!(item.kind, "kindle");
        assert_eq!(item.title, "本のタイトル");
    }

    #[test]
    fn last_product_link_wins() {
        let item = extract(
            r#"<div class="yohtmlc-item">
                 <a href="/gp/product/AAA">最初</a>
                 <a href="/gp/product/BBB">最後</a>
               </div>"#,
        );
        assert_eq!(item.url, "https://www.amazon.co.jp/gp/product/BBB");
        assert_eq!(item.title, "最後");
    }

    #[test]
    fn non_product_links_ignored() {
        let item = extract(
            r#"<div class="yohtmlc-item">
                 <a href="/gp/help/contact">お問い合わせ</a>
                 <a>リンクなし</a>
               </div>"#,
        );
        assert_eq!(item, Item::default());
    }

    #[test]
    fn unrecognized_subtree_yields_empty_item() {
        let item = extract(r#"<div class="yohtmlc-item"><span>配達済み</span></div>"#);
        assert_eq!(item.url, "");
        assert_eq!(item.title, "");
        assert_eq!(item.kind, "");
        assert!(item.params.is_empty());
    }
}
