use serde::{Deserialize, Serialize};

/// A label/value pair that did not map to a named field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub label: String,
    pub value: String,
}

/// One purchase transaction. Built fresh per page parse, fully populated
/// before it is appended to the result, never mutated afterward.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Order identifier; empty if not recoverable.
    pub id: String,
    /// Order date exactly as the page presents it (not reparsed).
    pub ordered_at: String,
    /// Total with everything but ASCII digits and `.` stripped.
    pub total: String,
    /// Absolute link to the order detail page, or empty.
    pub url: String,
    /// Recognized attributes that have no named slot, in extraction order.
    /// The unstripped total text is kept here under the label `totalOrig`.
    pub params: Vec<Param>,
    /// Line items in document order.
    pub items: Vec<Item>,
}

/// One product line within an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Absolute link to the product page, or empty.
    pub url: String,
    /// Product display text, trimmed, or empty.
    pub title: String,
    /// Coarse classification tag (e.g. "kindle"), or empty.
    #[serde(rename = "type")]
    pub kind: String,
    /// Reserved for extensibility; unused by current extraction rules.
    pub params: Vec<Param>,
}
