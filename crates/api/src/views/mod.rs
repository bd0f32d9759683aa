//! Server-rendered HTML.
//!
//! All dynamic text goes through maud's escaping; URLs taken from invitation
//! documents are additionally filtered by [`safe_url`] before they land in an
//! attribute.

pub mod card;
pub mod page;
pub mod script;

pub use card::{card, card_document};
pub use page::{error_page, invitation_page, not_found_page};

use shared::validation::validate_media_url;

/// Returns `url` if it is an http(s) URL or a site-relative path.
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    validate_media_url(url).is_ok().then_some(url)
}
