//! Card renderer.
//!
//! [`render_card`] maps an invitation document to an ordered list of view
//! models, one per visual section. Each section resolves its own display
//! values (text defaults and the four style overlays), so the HTML layer only
//! has to lay the views out. Rendering never fails: sections that have
//! nothing to show are skipped.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    GalleryLayout, HostSide, InvitationData, MediaItem, ResolvedStyle, SectionId, StyleField,
};
use crate::services::countdown::{self, CountdownValue, COUNTDOWN_LABELS};
use shared::validation::validate_css_color;

pub const INVOCATION: &str = "|| श्री गणेशाय नमः ||";
pub const WELCOME_CONNECTOR: &str = "यांचा";
pub const BRIDE_HONORIFIC: &str = "चि. सौ. कां.";
pub const GROOM_HONORIFIC: &str = "चि.";
pub const DATE_HEADING: &str = "शुभ मुहूर्त";
pub const VENUE_HEADING: &str = "विवाह स्थळ";
pub const MAP_BUTTON_LABEL: &str = "नकाशा पहा";
pub const VENUE_CLOSING: &str = "आपली उपस्थिती प्रार्थनीय आहे.";
pub const SCHEDULE_DIVIDER: &str = "❦";
pub const BANNER_GLYPH: &str = "✦";
/// Swastik between the two families in the welcome section.
pub const WELCOME_DIVIDER_GLYPH: &str = "卐";

const BANNER_DEFAULT_FONT: &str = "font-headline";
const BANNER_DEFAULT_SIZE: &str = "text-xs sm:text-sm";
const BANNER_DEFAULT_COLOR: &str = "hsl(var(--primary-foreground))";
const CUSTOM_TITLE_FONT: &str = "font-headline";
const CUSTOM_CONTENT_FONT: &str = "font-serif";

/// A piece of text with its resolved style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledText {
    pub text: String,
    pub style: ResolvedStyle,
}

impl StyledText {
    fn field(data: &InvitationData, field: StyleField, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: data.style.resolve(field),
        }
    }

    pub fn classes(&self) -> String {
        self.style.classes()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Party {
    Bride,
    Groom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
}

impl Align {
    pub fn class(&self) -> &'static str {
        match self {
            Align::Left => "text-left",
            Align::Right => "text-right",
        }
    }
}

/// Name and parents line of one side of the couple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyBlock {
    pub party: Party,
    pub align: Align,
    pub honorific: &'static str,
    pub name: StyledText,
    pub parents: StyledText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WelcomeView {
    pub invocation: &'static str,
    pub left: PartyBlock,
    pub right: PartyBlock,
    pub divider: &'static str,
    pub connector: &'static str,
    pub header: StyledText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoupleView {
    pub title: Option<String>,
    pub layout: GalleryLayout,
    pub media: Vec<MediaItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountdownView {
    pub target: DateTime<Utc>,
    pub value: CountdownValue,
    pub labels: [&'static str; 4],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateView {
    pub heading: StyledText,
    pub countdown: Option<CountdownView>,
    pub day: StyledText,
    pub month: StyledText,
    pub date: StyledText,
    pub time: StyledText,
    pub year: StyledText,
    pub request_message: StyledText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntryView {
    pub name: StyledText,
    pub details: StyledText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleView {
    pub title: StyledText,
    pub items: Vec<ScheduleEntryView>,
    pub divider: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VenueView {
    pub heading: &'static str,
    pub name: StyledText,
    pub city: StyledText,
    pub map_link: Option<String>,
    pub map_button_label: &'static str,
    pub closing: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomView {
    pub id: String,
    pub title: StyledText,
    pub content: StyledText,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RenderedSection {
    Welcome(WelcomeView),
    Couple(CoupleView),
    Date(DateView),
    Schedule(ScheduleView),
    Venue(VenueView),
    Custom(CustomView),
}

impl RenderedSection {
    pub fn token(&self) -> &str {
        match self {
            RenderedSection::Welcome(_) => "welcome",
            RenderedSection::Couple(_) => "couple",
            RenderedSection::Date(_) => "date",
            RenderedSection::Schedule(_) => "schedule",
            RenderedSection::Venue(_) => "venue",
            RenderedSection::Custom(view) => &view.id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BannerView {
    pub text: String,
    pub classes: String,
    pub color: String,
    pub glyph: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrandingView {
    pub logo_url: Option<String>,
    pub text: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThemeView {
    pub class: String,
    pub falling_leaves: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCard {
    pub theme: ThemeView,
    pub top_banner: Option<BannerView>,
    pub sections: Vec<RenderedSection>,
    pub branding: Option<BrandingView>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn bride_block(data: &InvitationData, align: Align) -> PartyBlock {
    PartyBlock {
        party: Party::Bride,
        align,
        honorific: BRIDE_HONORIFIC,
        name: StyledText::field(data, StyleField::BrideName, data.bride_name.clone()),
        parents: StyledText::field(data, StyleField::BrideParents, data.bride_parents_text()),
    }
}

fn groom_block(data: &InvitationData, align: Align) -> PartyBlock {
    PartyBlock {
        party: Party::Groom,
        align,
        honorific: GROOM_HONORIFIC,
        name: StyledText::field(data, StyleField::GroomName, data.groom_name.clone()),
        parents: StyledText::field(data, StyleField::GroomParents, data.groom_parents_text()),
    }
}

fn welcome(data: &InvitationData) -> WelcomeView {
    // The host family sits on the left, its block right-aligned towards the divider.
    let (left, right) = match data.host_side {
        HostSide::Bride => (bride_block(data, Align::Right), groom_block(data, Align::Left)),
        HostSide::Groom => (groom_block(data, Align::Right), bride_block(data, Align::Left)),
    };

    WelcomeView {
        invocation: INVOCATION,
        left,
        right,
        divider: WELCOME_DIVIDER_GLYPH,
        connector: WELCOME_CONNECTOR,
        header: StyledText::field(data, StyleField::WeddingHeader, data.wedding_header_text()),
    }
}

fn couple(data: &InvitationData) -> Option<CoupleView> {
    let media = data.media_items().into_owned();
    if media.is_empty() {
        return None;
    }
    let config = data.gallery_config.clone().unwrap_or_default();
    Some(CoupleView {
        title: non_empty(&config.title),
        layout: config.layout,
        media,
    })
}

fn countdown_view(data: &InvitationData, now: DateTime<Utc>) -> Option<CountdownView> {
    let config = data.countdown.as_ref().filter(|c| c.is_enabled)?;
    let target = countdown::parse_target(config.target_date.as_deref()?)?;
    Some(CountdownView {
        target,
        value: countdown::remaining(target, now),
        labels: COUNTDOWN_LABELS,
    })
}

fn date(data: &InvitationData, now: DateTime<Utc>) -> DateView {
    DateView {
        heading: StyledText::field(data, StyleField::ShubhMuhhurt, DATE_HEADING),
        countdown: countdown_view(data, now),
        day: StyledText::field(data, StyleField::MainDay, data.main_day.clone()),
        month: StyledText::field(data, StyleField::MainMonth, data.month_text()),
        date: StyledText::field(data, StyleField::MainDate, data.main_date.clone()),
        time: StyledText::field(data, StyleField::MainTime, data.main_time.clone()),
        year: StyledText::field(data, StyleField::MainYear, data.main_year.clone()),
        request_message: StyledText::field(
            data,
            StyleField::RequestMessage,
            data.request_message_text(),
        ),
    }
}

fn schedule(data: &InvitationData) -> ScheduleView {
    ScheduleView {
        title: StyledText::field(
            data,
            StyleField::ScheduleSectionTitle,
            data.schedule_title_text(),
        ),
        items: data
            .schedule
            .iter()
            .map(|item| ScheduleEntryView {
                name: StyledText::field(data, StyleField::ScheduleName, item.name.clone()),
                details: StyledText::field(data, StyleField::ScheduleDetails, item.details.clone()),
            })
            .collect(),
        divider: SCHEDULE_DIVIDER,
    }
}

fn venue(data: &InvitationData) -> VenueView {
    VenueView {
        heading: VENUE_HEADING,
        name: StyledText::field(data, StyleField::Place, data.venue_name.clone()),
        city: StyledText::field(data, StyleField::VenueCity, data.venue_city.clone()),
        map_link: data.map_link().map(str::to_string),
        map_button_label: MAP_BUTTON_LABEL,
        closing: VENUE_CLOSING,
    }
}

fn custom_text(text: &str, font: &Option<String>, default_font: &str, bold: Option<bool>) -> StyledText {
    StyledText {
        text: text.to_string(),
        style: ResolvedStyle {
            font: non_empty(font).unwrap_or_else(|| default_font.to_string()),
            bold: bold.unwrap_or(false),
            size: String::new(),
            color: None,
        },
    }
}

fn custom(data: &InvitationData, id: &str) -> Option<CustomView> {
    let section = data.custom_section(id)?;
    Some(CustomView {
        id: section.id.clone(),
        title: custom_text(
            &section.title,
            &section.font_title,
            CUSTOM_TITLE_FONT,
            section.bold_title,
        ),
        content: custom_text(
            &section.content,
            &section.font_content,
            CUSTOM_CONTENT_FONT,
            section.bold_content,
        ),
        image_url: non_empty(&section.image_url),
    })
}

fn render_section(data: &InvitationData, id: &SectionId, now: DateTime<Utc>) -> Option<RenderedSection> {
    match id {
        SectionId::Welcome => Some(RenderedSection::Welcome(welcome(data))),
        SectionId::Couple => couple(data).map(RenderedSection::Couple),
        SectionId::Date => Some(RenderedSection::Date(date(data, now))),
        SectionId::Schedule => Some(RenderedSection::Schedule(schedule(data))),
        SectionId::Venue => Some(RenderedSection::Venue(venue(data))),
        SectionId::Custom(id) => custom(data, id).map(RenderedSection::Custom),
        SectionId::Unknown(_) => None,
    }
}

/// Renders the body sections in the given order, skipping tokens that have
/// nothing to render.
pub fn render_sections(
    data: &InvitationData,
    order: &[SectionId],
    now: DateTime<Utc>,
) -> Vec<RenderedSection> {
    order
        .iter()
        .filter_map(|id| render_section(data, id, now))
        .collect()
}

fn top_banner(data: &InvitationData) -> Option<BannerView> {
    let banner = data.top_banner.as_ref().filter(|b| b.enabled)?;
    let style = ResolvedStyle {
        font: non_empty(&banner.font).unwrap_or_else(|| BANNER_DEFAULT_FONT.to_string()),
        bold: banner.bold.unwrap_or(false),
        size: non_empty(&banner.font_size).unwrap_or_else(|| BANNER_DEFAULT_SIZE.to_string()),
        color: None,
    };
    Some(BannerView {
        text: banner.text.clone(),
        classes: style.classes(),
        color: non_empty(&banner.color)
            .filter(|c| validate_css_color(c).is_ok())
            .unwrap_or_else(|| BANNER_DEFAULT_COLOR.to_string()),
        glyph: BANNER_GLYPH,
    })
}

fn branding(data: &InvitationData) -> Option<BrandingView> {
    let branding = data.branding.as_ref().filter(|b| b.is_enabled)?;
    Some(BrandingView {
        logo_url: non_empty(&branding.logo_url),
        text: non_empty(&branding.text),
        contact: non_empty(&branding.contact),
    })
}

/// Renders the whole card using the document's own section order.
pub fn render_card(data: &InvitationData, now: DateTime<Utc>) -> RenderedCard {
    RenderedCard {
        theme: ThemeView {
            class: data.theme.css_class().to_string(),
            falling_leaves: data.theme.has_falling_leaves(),
        },
        top_banner: top_banner(data),
        sections: render_sections(data, &data.effective_section_order(), now),
        branding: branding(data),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Branding, Countdown, CustomSection, MediaKind, Theme, TopBanner};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()
    }

    fn tokens(sections: &[RenderedSection]) -> Vec<String> {
        sections.iter().map(|s| s.token().to_string()).collect()
    }

    #[test]
    fn test_empty_document_renders_with_defaults() {
        let data: InvitationData = serde_json::from_str("{}").unwrap();
        let card = render_card(&data, now());

        // Couple has no media, so it is skipped.
        assert_eq!(tokens(&card.sections), vec!["welcome", "date", "schedule", "venue"]);
        assert!(card.top_banner.is_none());
        assert!(card.branding.is_none());
        assert_eq!(card.theme.class, "default");

        let RenderedSection::Welcome(welcome) = &card.sections[0] else {
            panic!("expected welcome section");
        };
        assert_eq!(welcome.header.text, "शुभविवाह");
        assert_eq!(welcome.header.style.font, "font-custom-header");
        assert_eq!(welcome.left.name.style.size, "text-xl sm:text-3xl");
    }

    #[test]
    fn test_reordering_changes_only_order() {
        let mut data = InvitationData::initial();
        data.gallery = vec![MediaItem::image("https://img.example/1.jpg")];

        let forward = [
            SectionId::Welcome,
            SectionId::Couple,
            SectionId::Date,
            SectionId::Schedule,
            SectionId::Venue,
        ];
        let mut backward = forward.clone();
        backward.reverse();

        let a = render_sections(&data, &forward, now());
        let mut b = render_sections(&data, &backward, now());
        assert_eq!(tokens(&b), vec!["venue", "schedule", "date", "couple", "welcome"]);
        b.reverse();
        assert_eq!(a, b);
    }

    #[test]
    fn test_unknown_and_dangling_tokens_are_skipped() {
        let data = InvitationData::initial();
        let order = [
            SectionId::Unknown("mystery".into()),
            SectionId::Custom("custom-missing".into()),
            SectionId::Venue,
        ];
        assert_eq!(tokens(&render_sections(&data, &order, now())), vec!["venue"]);
    }

    #[test]
    fn test_legacy_couple_image_renders_one_item() {
        let mut data = InvitationData::initial();
        data.couple_image_url = Some("https://img.example/couple.jpg".into());
        let view = couple(&data).unwrap();
        assert_eq!(view.media.len(), 1);

        data.gallery = vec![
            MediaItem::image("https://img.example/1.jpg"),
            MediaItem {
                kind: MediaKind::Video,
                url: "https://img.example/2.mp4".into(),
            },
            MediaItem::image("https://img.example/3.jpg"),
        ];
        assert_eq!(couple(&data).unwrap().media.len(), 3);
    }

    #[test]
    fn test_host_side_swaps_blocks_as_a_unit() {
        let mut data = InvitationData::initial();
        let bride_hosted = welcome(&data);
        data.host_side = HostSide::Groom;
        let groom_hosted = welcome(&data);

        assert_eq!(bride_hosted.left.party, Party::Bride);
        assert_eq!(bride_hosted.left.align, Align::Right);
        assert_eq!(groom_hosted.left.party, Party::Groom);
        assert_eq!(groom_hosted.left.align, Align::Right);
        assert_eq!(groom_hosted.right.party, Party::Bride);

        // Text stays with its party.
        assert_eq!(groom_hosted.right.name.text, "प्रेरणा पाटील");
        assert_eq!(groom_hosted.right.honorific, BRIDE_HONORIFIC);
        assert_eq!(groom_hosted.left.parents.text, data.groom_parents_text());
        assert_eq!(bride_hosted.left.name, groom_hosted.right.name);
    }

    #[test]
    fn test_countdown_in_the_past_is_zero() {
        let mut data = InvitationData::initial();
        data.countdown = Some(Countdown {
            is_enabled: true,
            target_date: Some("2020-01-01T00:00:00Z".into()),
        });
        let view = date(&data, now()).countdown.unwrap();
        assert!(view.value.is_zero());
    }

    #[test]
    fn test_countdown_requires_enabled_and_parsable_target() {
        let mut data = InvitationData::initial();
        data.countdown = Some(Countdown {
            is_enabled: false,
            target_date: Some("2026-07-26T18:00:00+05:30".into()),
        });
        assert!(date(&data, now()).countdown.is_none());

        data.countdown = Some(Countdown {
            is_enabled: true,
            target_date: Some("not a date".into()),
        });
        assert!(date(&data, now()).countdown.is_none());

        data.countdown = Some(Countdown {
            is_enabled: true,
            target_date: Some("2026-07-02T00:00:00Z".into()),
        });
        let view = date(&data, now()).countdown.unwrap();
        assert_eq!(view.value.days, 1);
        assert_eq!(view.labels[0], "दिवस");
    }

    #[test]
    fn test_overrides_reach_the_view() {
        let mut data = InvitationData::initial();
        data.style.set_font(StyleField::Place, "font-yatra");
        data.style.set_color(StyleField::Place, Some("#8b0000".into()));
        let view = venue(&data);
        assert_eq!(view.name.style.font, "font-yatra");
        assert_eq!(view.name.style.color.as_deref(), Some("#8b0000"));
        assert_eq!(view.city.style.font, "font-body");
    }

    #[test]
    fn test_custom_section_defaults() {
        let mut data = InvitationData::initial();
        data.custom_sections.push(CustomSection {
            id: "custom-ab12cd34".into(),
            title: "आशीर्वाद".into(),
            content: "line one\nline two".into(),
            image_url: Some("".into()),
            bold_content: Some(true),
            ..Default::default()
        });
        let view = custom(&data, "custom-ab12cd34").unwrap();
        assert_eq!(view.title.classes(), "font-headline");
        assert_eq!(view.content.classes(), "font-serif font-bold");
        assert!(view.image_url.is_none());
    }

    #[test]
    fn test_top_banner_and_branding() {
        let mut data = InvitationData::initial();
        data.top_banner = Some(TopBanner {
            enabled: true,
            text: "लग्नाला नक्की या".into(),
            bold: Some(true),
            ..Default::default()
        });
        data.branding = Some(Branding {
            is_enabled: true,
            text: Some("Patrika Studio".into()),
            ..Default::default()
        });
        data.theme = Theme::AutumnFloral;

        let card = render_card(&data, now());
        let banner = card.top_banner.unwrap();
        assert_eq!(banner.classes, "font-headline font-bold text-xs sm:text-sm");
        assert_eq!(banner.color, "hsl(var(--primary-foreground))");
        let branding = card.branding.unwrap();
        assert_eq!(branding.text.as_deref(), Some("Patrika Studio"));
        assert!(branding.logo_url.is_none());
        assert!(card.theme.falling_leaves);

        data.top_banner.as_mut().unwrap().enabled = false;
        assert!(render_card(&data, now()).top_banner.is_none());
    }

    #[test]
    fn test_unknown_theme_renders_with_default_class() {
        let data: InvitationData =
            serde_json::from_value(serde_json::json!({"theme": "theme-midnight"})).unwrap();
        let card = render_card(&data, now());

        assert_eq!(card.theme.class, "default");
        assert!(!card.theme.falling_leaves);
        assert_eq!(data.theme.token(), "theme-midnight");
    }

    #[test]
    fn test_unsafe_banner_color_falls_back_to_default() {
        let mut data = InvitationData::initial();
        data.top_banner = Some(TopBanner {
            enabled: true,
            text: "शुभ विवाह".into(),
            color: Some("red;background:url(https://evil.example/b)".into()),
            ..Default::default()
        });
        let banner = render_card(&data, now()).top_banner.unwrap();
        assert_eq!(banner.color, BANNER_DEFAULT_COLOR);

        data.top_banner.as_mut().unwrap().color = Some("#ffd700".into());
        assert_eq!(render_card(&data, now()).top_banner.unwrap().color, "#ffd700");
    }

    #[test]
    fn test_sections_serialize_with_kind_tag() {
        let data = InvitationData::initial();
        let card = render_card(&data, now());
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["sections"][0]["kind"], "welcome");
        assert_eq!(json["sections"][3]["heading"], VENUE_HEADING);
    }
}
