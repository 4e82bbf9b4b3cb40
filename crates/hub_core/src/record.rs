/// One acquired catalog item.
///
/// A record's position in the store is its identity; indices are dense,
/// zero-based and shift on deletion. No persistent id is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub title: String,
    /// Display-only price string, e.g. "$49.99".
    pub price: String,
    pub description: String,
    pub source_url: Option<String>,
    pub domain: Option<String>,
    /// Local file references for the record's images, possibly empty.
    pub images: Vec<String>,
}

/// Prices the backend emits when no real price is known; these are left
/// out of the assistant prompt.
const PLACEHOLDER_PRICES: [&str; 3] = ["Contact for pricing", "$0.00", "Free"];

impl Record {
    /// Assembles the labelled text block substituted into a prompt template.
    ///
    /// Empty fields are dropped entirely so the assistant never sees a bare
    /// `PRICE:` label. Returns an empty string when nothing usable is left.
    pub fn product_text(&self) -> String {
        let mut parts = Vec::new();

        let title = self.title.trim();
        if !title.is_empty() {
            parts.push(format!("TITLE: {title}"));
        }

        let price = self.price.trim();
        if !price.is_empty() && !PLACEHOLDER_PRICES.contains(&price) {
            parts.push(format!("PRICE: {price}"));
        }

        let description = self.description.trim();
        if !description.is_empty() {
            parts.push(format!("DESCRIPTION: {description}"));
        }

        parts.join("\n\n")
    }
}
