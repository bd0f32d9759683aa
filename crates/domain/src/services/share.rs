//! Share text, compose links and export file names.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::models::InvitationData;

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub const WHATSAPP_COMPOSE_BASE: &str = "https://wa.me/?text=";
pub const DEFAULT_DOWNLOAD_NAME: &str = "wedding-invitation";
pub const SHARE_TITLE: &str = "Wedding Invitation";

pub fn encode_uri_component(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// Public card link for `id`. Without an id the bare site root is shared.
pub fn public_url(base: &str, id: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match id {
        Some(id) => format!("{}/invitation/{}", base, id),
        None => base.to_string(),
    }
}

/// Plain-text summary with `*bold*` markers understood by chat apps.
pub fn share_text(data: &InvitationData, url: &str) -> String {
    let mut text = String::from("✨ *Wedding Invitation* ✨\n\n");
    text.push_str("You are cordially invited to the wedding of\n");
    text.push_str(&format!("*{}* & *{}*\n\n", data.bride_name, data.groom_name));

    text.push_str(&format!("📅 *Date:* {}\n", data.date_line()));
    text.push_str(&format!("⏰ *Time:* {}\n\n", data.main_time));

    text.push_str(&format!(
        "📍 *Venue:*\n{}\n{}\n",
        data.venue_name, data.venue_city
    ));
    if let Some(link) = data.map_link() {
        text.push_str(&format!("🗺️ Map: {}\n\n", link));
    }

    text.push_str("--------------\n");
    text.push_str("*Events Schedule:*\n");
    for item in &data.schedule {
        text.push_str(&format!("• *{}*: {}\n", item.name, item.details));
    }
    text.push('\n');

    text.push_str("Tap below to view the full invitation card & photos:\n");
    text.push_str("👇👇👇\n");
    text.push_str(url);
    text.push('\n');
    text
}

/// One-line message sent alongside a shared card image.
pub fn short_share_message(data: &InvitationData, url: &str) -> String {
    format!(
        "You are cordially invited to the wedding of {} & {}. Click here to see the invitation: {}",
        data.bride_name, data.groom_name, url
    )
}

pub fn whatsapp_compose_url(text: &str) -> String {
    format!("{}{}", WHATSAPP_COMPOSE_BASE, encode_uri_component(text))
}

fn file_stem(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect();
    cleaned.trim_matches(|c| c == '.' || c == ' ').to_string()
}

/// File name for the download button.
pub fn download_file_name(file_name: Option<&str>, fallback: bool) -> String {
    let stem = file_name
        .map(file_stem)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_NAME.to_string());
    if fallback {
        format!("{}-fallback.png", stem)
    } else {
        format!("{}.png", stem)
    }
}

/// File name used when a shared image has to be downloaded instead.
pub fn share_file_name(data: &InvitationData, fallback: bool) -> String {
    let stem = file_stem(&format!("{}-{}", data.bride_name, data.groom_name));
    if fallback {
        format!("{}-invite-fallback.png", stem)
    } else {
        format!("{}-invite.png", stem)
    }
}

/// File name attached to a native share-sheet payload.
pub fn share_sheet_file_name(fallback: bool) -> &'static str {
    if fallback {
        "invitation-fallback.png"
    } else {
        "invitation.png"
    }
}
