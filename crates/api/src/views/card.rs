//! Card markup.
//!
//! Lays out a [`RenderedCard`] inside `div#invitation-card`. Every section
//! carries the `fade-in-element` class so the rasterizer can settle the
//! entry animations before capture.

use domain::models::{GalleryLayout, MediaKind};
use domain::services::export::{CARD_ELEMENT_ID, SETTLE_SELECTOR};
use domain::services::render::{
    BannerView, BrandingView, CountdownView, CoupleView, CustomView, DateView, PartyBlock,
    RenderedCard, RenderedSection, ScheduleView, StyledText, VenueView, WelcomeView,
};
use maud::{html, Markup, DOCTYPE};

use super::safe_url;
use super::script::BANNER_REVEAL_OFFSET_PX;

const SECTION_CLASS: &str = "card-section fade-in-element";

fn styled(tag_class: &str, text: &StyledText) -> Markup {
    let class = format!("{} {}", tag_class, text.classes());
    let style = text.style.color.as_ref().map(|c| format!("color: {}", c));
    html! {
        span class=(class.trim()) style=[style] { (text.text) }
    }
}

fn party(block: &PartyBlock) -> Markup {
    html! {
        div class={ "party " (block.align.class()) } {
            p class="honorific" { (block.honorific) }
            p { (styled("party-name", &block.name)) }
            p { (styled("party-parents", &block.parents)) }
        }
    }
}

fn welcome(view: &WelcomeView) -> Markup {
    html! {
        section id="welcome" class=(SECTION_CLASS) {
            p class="invocation" { (view.invocation) }
            div class="couple-grid" {
                (party(&view.left))
                div class="divider" aria-hidden="true" { (view.divider) }
                (party(&view.right))
            }
            p class="connector" { (view.connector) }
            h1 { (styled("wedding-header", &view.header)) }
        }
    }
}

fn couple(view: &CoupleView) -> Markup {
    let layout = match view.layout {
        GalleryLayout::Carousel => "gallery gallery-carousel",
        GalleryLayout::Grid => "gallery gallery-grid",
    };
    html! {
        section id="couple" class=(SECTION_CLASS) {
            @if let Some(title) = &view.title {
                h2 class="gallery-title" { (title) }
            }
            div class=(layout) {
                @for item in &view.media {
                    @if let Some(url) = safe_url(&item.url) {
                        @match item.kind {
                            MediaKind::Image => {
                                img class="gallery-item" src=(url) alt="" loading="lazy";
                            }
                            MediaKind::Video => {
                                video class="gallery-item" src=(url) controls playsinline {}
                            }
                        }
                    }
                }
            }
        }
    }
}

fn countdown(view: &CountdownView) -> Markup {
    let value = &view.value;
    let units = [value.days, value.hours, value.minutes, value.seconds];
    html! {
        div class="countdown" data-target=(view.target.to_rfc3339()) {
            @for (amount, label) in units.iter().zip(view.labels.iter()) {
                div class="countdown-unit" {
                    span class="countdown-value" { (format!("{:02}", amount)) }
                    span class="countdown-label" { (label) }
                }
            }
        }
    }
}

fn date(view: &DateView) -> Markup {
    html! {
        section id="date" class=(SECTION_CLASS) {
            h2 { (styled("date-heading", &view.heading)) }
            @if let Some(c) = &view.countdown {
                (countdown(c))
            }
            div class="date-block" {
                p { (styled("main-day", &view.day)) }
                div class="date-row" {
                    (styled("main-month", &view.month))
                    (styled("main-date", &view.date))
                    (styled("main-time", &view.time))
                }
                p { (styled("main-year", &view.year)) }
            }
            p class="request-message" { (styled("", &view.request_message)) }
        }
    }
}

fn schedule(view: &ScheduleView) -> Markup {
    html! {
        section id="schedule" class=(SECTION_CLASS) {
            h2 { (styled("schedule-title", &view.title)) }
            ul class="schedule" {
                @for (index, entry) in view.items.iter().enumerate() {
                    @if index > 0 {
                        li class="schedule-divider" aria-hidden="true" { (view.divider) }
                    }
                    li class="schedule-entry" {
                        (styled("schedule-name", &entry.name))
                        (styled("schedule-details", &entry.details))
                    }
                }
            }
        }
    }
}

fn venue(view: &VenueView) -> Markup {
    html! {
        section id="venue" class=(SECTION_CLASS) {
            h2 class="venue-heading" { (view.heading) }
            p { (styled("venue-name", &view.name)) }
            p { (styled("venue-city", &view.city)) }
            @if let Some(link) = view.map_link.as_deref().and_then(safe_url) {
                a class="map-button" href=(link) target="_blank" rel="noopener noreferrer" {
                    (view.map_button_label)
                }
            }
            p class="venue-closing" { (view.closing) }
        }
    }
}

fn custom(view: &CustomView) -> Markup {
    html! {
        section id=(view.id) class=(SECTION_CLASS) {
            h2 { (styled("custom-title", &view.title)) }
            @if let Some(url) = view.image_url.as_deref().and_then(safe_url) {
                img class="custom-image" src=(url) alt="" loading="lazy";
            }
            p class="custom-content" { (styled("", &view.content)) }
        }
    }
}

fn section(section: &RenderedSection) -> Markup {
    match section {
        RenderedSection::Welcome(v) => welcome(v),
        RenderedSection::Couple(v) => couple(v),
        RenderedSection::Date(v) => date(v),
        RenderedSection::Schedule(v) => schedule(v),
        RenderedSection::Venue(v) => venue(v),
        RenderedSection::Custom(v) => custom(v),
    }
}

fn banner(view: &BannerView) -> Markup {
    html! {
        div class={ "top-banner " (view.classes) }
            style={ "color: " (view.color) }
            data-reveal-offset=(BANNER_REVEAL_OFFSET_PX) {
            span aria-hidden="true" { (view.glyph) }
            span class="top-banner-text" { (view.text) }
            span aria-hidden="true" { (view.glyph) }
        }
    }
}

fn branding(view: &BrandingView) -> Markup {
    html! {
        footer class="branding" {
            @if let Some(logo) = view.logo_url.as_deref().and_then(safe_url) {
                img class="branding-logo" src=(logo) alt="";
            }
            @if let Some(text) = &view.text {
                p class="branding-text" { (text) }
            }
            @if let Some(contact) = &view.contact {
                p class="branding-contact" { (contact) }
            }
        }
    }
}

/// The card element itself.
pub fn card(card: &RenderedCard) -> Markup {
    html! {
        div id=(CARD_ELEMENT_ID) class={ "invitation-card " (card.theme.class) } {
            @if card.theme.falling_leaves {
                div class="falling-leaves" aria-hidden="true" {}
            }
            @if let Some(b) = &card.top_banner {
                (banner(b))
            }
            @for s in &card.sections {
                (section(s))
            }
            @if let Some(b) = &card.branding {
                (branding(b))
            }
        }
    }
}

/// Self-contained document holding only the card, posted to the rasterizer.
pub fn card_document(rendered: &RenderedCard) -> String {
    let settle = format!("{} {{ opacity: 1; transform: none; }}", SETTLE_SELECTOR);
    html! {
        (DOCTYPE)
        html lang="mr" {
            head {
                meta charset="utf-8";
                style { (settle) }
            }
            body { (card(rendered)) }
        }
    }
    .into_string()
}
