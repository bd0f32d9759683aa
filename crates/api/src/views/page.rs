//! Full pages: document head with social metadata, plus body.

use domain::services::metadata::PageMetadata;
use domain::services::RenderedCard;
use maud::{html, Markup, DOCTYPE};

use super::card::card;
use super::script::CARD_SCRIPT_PATH;

pub const NOT_FOUND_HEADING: &str = "निमंत्रण सापडले नाही";
const NOT_FOUND_BODY: &str = "The invitation you are looking for does not exist or has been removed.";
const SHARE_LABEL: &str = "WhatsApp वर पाठवा";

fn head(meta: &PageMetadata) -> Markup {
    html! {
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            title { (meta.title) }
            @if let Some(description) = &meta.description {
                meta name="description" content=(description);
            }
            @if let Some(og) = &meta.open_graph {
                meta property="og:title" content=(og.title);
                meta property="og:description" content=(og.description);
                @if let Some(url) = &og.url {
                    meta property="og:url" content=(url);
                }
                @if let Some(locale) = &og.locale {
                    meta property="og:locale" content=(locale);
                }
                @if let Some(kind) = &og.kind {
                    meta property="og:type" content=(kind);
                }
                @for image in &og.images {
                    meta property="og:image" content=(image.url);
                    @if let Some(width) = image.width {
                        meta property="og:image:width" content=(width);
                    }
                    @if let Some(height) = image.height {
                        meta property="og:image:height" content=(height);
                    }
                    @if let Some(alt) = &image.alt {
                        meta property="og:image:alt" content=(alt);
                    }
                }
            }
            @if let Some(twitter) = &meta.twitter {
                meta name="twitter:card" content=(twitter.card);
                meta name="twitter:title" content=(twitter.title);
                meta name="twitter:description" content=(twitter.description);
                @for image in &twitter.images {
                    meta name="twitter:image" content=(image);
                }
            }
        }
    }
}

fn layout(meta: &PageMetadata, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="mr" {
            (head(meta))
            body { (body) }
        }
    }
}

/// Public invitation page with a chat share link under the card.
pub fn invitation_page(meta: &PageMetadata, rendered: &RenderedCard, compose_url: &str) -> Markup {
    layout(
        meta,
        html! {
            main class="invitation-page" {
                (card(rendered))
                nav class="share-actions" {
                    a class="share-whatsapp" href=(compose_url) target="_blank" rel="noopener noreferrer" {
                        (SHARE_LABEL)
                    }
                }
            }
            script src=(CARD_SCRIPT_PATH) defer {}
        },
    )
}

pub fn not_found_page(meta: &PageMetadata) -> Markup {
    layout(
        meta,
        html! {
            main class="not-found" {
                h1 { (NOT_FOUND_HEADING) }
                p { (NOT_FOUND_BODY) }
                a href="/" { "Create your own invitation" }
            }
        },
    )
}

/// Page shown when storage fails; `message` is user-facing.
pub fn error_page(meta: &PageMetadata, message: &str) -> Markup {
    layout(
        meta,
        html! {
            main class="error" {
                p { (message) }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domain::models::InvitationData;
    use domain::services::{metadata, render_card, SiteDefaults};

    #[test]
    fn test_invitation_page_carries_social_tags() {
        let mut data = InvitationData::initial();
        data.og_image_url = Some("/uploads/couple.jpg".to_string());
        let site = SiteDefaults::default();
        let meta = metadata::for_invitation(&data, "https://patrika.test/invitation/abc", &site);

        let html = invitation_page(&meta, &render_card(&data, Utc::now()), "https://wa.me/?text=x")
            .into_string();

        assert!(html.contains(r#"property="og:title""#));
        assert!(html.contains(r#"name="twitter:card" content="summary_large_image""#));
        assert!(html.contains("https://patrikaa.vercel.app/uploads/couple.jpg"));
        assert!(html.contains(r#"href="https://wa.me/?text=x""#));
        assert!(html.contains(r#"<script src="/assets/card.js" defer></script>"#));
    }

    #[test]
    fn test_not_found_page() {
        let html = not_found_page(&metadata::not_found()).into_string();
        assert!(html.contains(NOT_FOUND_HEADING));
        assert!(html.contains("<title>Invitation Not Found</title>"));
        assert!(!html.contains("og:title"));
        assert!(!html.contains("<script"));
    }
}
