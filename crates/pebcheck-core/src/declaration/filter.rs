//! Declaration page selection.

use super::patterns::DECLARATION_HEADER;

/// True when a page's text carries the declaration header signature.
pub fn is_declaration_page(text: &str) -> bool {
    DECLARATION_HEADER.is_match(text)
}

/// Select the pages whose content matches the declaration signature,
/// preserving page order. An empty result means "no declaration content
/// found" and is a valid outcome, not an error.
pub fn select_pages(pages: &[String]) -> Vec<String> {
    pages
        .iter()
        .filter(|p| is_declaration_page(p))
        .cloned()
        .collect()
}
