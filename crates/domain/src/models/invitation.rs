//! Invitation document model.
//!
//! Every field is optional on the wire. Content strings default to empty,
//! presentation fields fall back to built-in defaults through the accessor
//! methods below, so an empty JSON object is a renderable invitation.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

use super::style::StyleOverrides;
use super::theme::Theme;

pub const DEFAULT_MAIN_MONTH: &str = "जुलै";
pub const DEFAULT_WEDDING_HEADER: &str = "शुभविवाह";
pub const DEFAULT_SCHEDULE_TITLE: &str = "कार्यक्रमाची रूपरेषा";
pub const DEFAULT_REQUEST_MESSAGE: &str = "या शुभमुहूर्तावर करण्याचे योजिले आहे, तरी या मंगलप्रसंगी आपण उपस्थित राहून वधू-वरास शुभाशीर्वाद द्यावेत, ह्यासाठीचे हे अग्रहाचे निमंत्रण.";

/// Render order used when a document carries no `sectionOrder`.
pub static DEFAULT_SECTION_ORDER: [SectionId; 5] = [
    SectionId::Welcome,
    SectionId::Couple,
    SectionId::Date,
    SectionId::Schedule,
    SectionId::Venue,
];

/// One entry of the event schedule. Array position is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleItem {
    pub name: String,
    pub details: String,
}

impl ScheduleItem {
    pub fn new(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: details.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(rename = "type", default)]
    pub kind: MediaKind,
    pub url: String,
}

impl MediaItem {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            kind: MediaKind::Image,
            url: url.into(),
        }
    }
}

/// Which family is hosting; decides the left/right placement of the couple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostSide {
    #[default]
    Bride,
    Groom,
}

/// Section identifier token in `sectionOrder`.
///
/// Custom sections are referenced by their full id, which always starts with
/// `custom-`. Tokens this build cannot render are kept so they survive a
/// save, and are skipped by the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SectionId {
    Welcome,
    Couple,
    Date,
    Schedule,
    Venue,
    Custom(String),
    Unknown(String),
}

pub const CUSTOM_SECTION_PREFIX: &str = "custom-";

impl SectionId {
    pub fn parse(token: &str) -> Self {
        match token {
            "welcome" => SectionId::Welcome,
            "couple" => SectionId::Couple,
            "date" => SectionId::Date,
            "schedule" => SectionId::Schedule,
            "venue" => SectionId::Venue,
            t if t.starts_with(CUSTOM_SECTION_PREFIX) => SectionId::Custom(t.to_string()),
            t => SectionId::Unknown(t.to_string()),
        }
    }

    pub fn token(&self) -> &str {
        match self {
            SectionId::Welcome => "welcome",
            SectionId::Couple => "couple",
            SectionId::Date => "date",
            SectionId::Schedule => "schedule",
            SectionId::Venue => "venue",
            SectionId::Custom(id) | SectionId::Unknown(id) => id,
        }
    }
}

impl Serialize for SectionId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.token())
    }
}

impl<'de> Deserialize<'de> for SectionId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        Ok(SectionId::parse(&token))
    }
}

/// Free-form card section with its own typography.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomSection {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold_title: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold_content: Option<bool>,
}

/// Sticky announcement strip at the top of the card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopBanner {
    pub enabled: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Countdown {
    pub is_enabled: bool,
    /// ISO 8601 instant, or a local date-time interpreted in IST.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
}

/// Creator/vendor footer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Branding {
    pub is_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryLayout {
    #[default]
    Carousel,
    Grid,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GalleryConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub layout: GalleryLayout,
}

/// Edit-lock timestamp. Documents imported from the hosted document store
/// carry `{seconds, nanoseconds}`; newer ones an RFC 3339 string or a plain
/// `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EditExpiry {
    Stamp { seconds: i64, nanoseconds: u32 },
    Text(String),
}

impl EditExpiry {
    pub fn from_instant(at: DateTime<Utc>) -> Self {
        EditExpiry::Text(at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
    }

    /// Instant the lock takes effect, if the value can be interpreted.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            EditExpiry::Stamp {
                seconds,
                nanoseconds,
            } => Utc.timestamp_opt(*seconds, *nanoseconds).single(),
            EditExpiry::Text(text) => {
                let text = text.trim();
                DateTime::parse_from_rfc3339(text)
                    .map(|dt| dt.with_timezone(&Utc))
                    .ok()
                    .or_else(|| {
                        NaiveDate::parse_from_str(text, "%Y-%m-%d")
                            .ok()
                            .and_then(|d| d.and_hms_opt(0, 0, 0))
                            .map(|dt| Utc.from_utc_datetime(&dt))
                    })
            }
        }
    }

    /// Uninterpretable values never lock the document.
    pub fn has_passed(&self, now: DateTime<Utc>) -> bool {
        self.instant().map(|at| at <= now).unwrap_or(false)
    }
}

/// The full content and style record of one wedding invitation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvitationData {
    pub bride_name: String,
    pub bride_father: String,
    pub bride_mother: String,
    pub groom_name: String,
    pub groom_father: String,
    pub groom_mother: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bride_parents_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groom_parents_details: Option<String>,

    pub main_date: String,
    pub main_day: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_month: Option<String>,
    pub main_time: String,
    pub main_year: String,

    pub venue_name: String,
    pub venue_city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub venue_map_link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wedding_header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_section_title: Option<String>,
    pub schedule: Vec<ScheduleItem>,

    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_adjustments: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub couple_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub og_image_url: Option<String>,
    pub gallery: Vec<MediaItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery_config: Option<GalleryConfig>,
    pub custom_sections: Vec<CustomSection>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_order: Option<Vec<SectionId>>,
    pub host_side: HostSide,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_banner: Option<TopBanner>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countdown: Option<Countdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_expiry_date: Option<EditExpiry>,

    #[serde(flatten)]
    pub style: StyleOverrides,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl InvitationData {
    /// Sample document a new invitation starts from.
    pub fn initial() -> Self {
        Self {
            bride_name: "प्रेरणा पाटील".into(),
            bride_father: "राम पाटील".into(),
            bride_mother: "आशा पाटील".into(),
            groom_name: "सुमित पवार".into(),
            groom_father: "अजय पवार".into(),
            groom_mother: "सीमा पवार".into(),
            main_date: "२६".into(),
            main_day: "रविवार".into(),
            main_time: "सायंकाळी ०६:१६ वाजता".into(),
            main_year: "२०२६".into(),
            venue_name: "सिद्धिविनायक लॉन".into(),
            venue_city: "छत्रपती संभाजीनगर (औरंगाबाद)".into(),
            venue_map_link: Some("https://maps.app.goo.gl/PXjDf2mTkkCrYUBB9".into()),
            schedule: vec![
                ScheduleItem::new("हळदी समारंभ", "शुक्रवार, २४ जुलै । स. १०:०० वाजता"),
                ScheduleItem::new("संगीत संध्या", "शुक्रवार, २४ जुलै । सायं. ०७:०० वाजता"),
                ScheduleItem::new("लग्न समारंभ", "शनिवार, २५ जुलै । दु. १२:३० वाजता"),
                ScheduleItem::new("स्वागत समारंभ", "शनिवार, २५ जुलै । सायं. ०७:०० वाजता"),
            ],
            theme: Theme::ClassicMaroon,
            couple_image_url: Some(String::new()),
            section_order: Some(vec![
                SectionId::Welcome,
                SectionId::Date,
                SectionId::Schedule,
                SectionId::Venue,
            ]),
            host_side: HostSide::Bride,
            ..Default::default()
        }
    }

    pub fn bride_parents_text(&self) -> String {
        self.bride_parents_details.clone().unwrap_or_else(|| {
            format!(
                "श्री. {} व श्रीमती {} यांची ज्येष्ठ कन्या",
                self.bride_father, self.bride_mother
            )
        })
    }

    pub fn groom_parents_text(&self) -> String {
        self.groom_parents_details.clone().unwrap_or_else(|| {
            format!(
                "श्री. {} व श्रीमती {} यांचे ज्येष्ठ चिरंजीव",
                self.groom_father, self.groom_mother
            )
        })
    }

    pub fn month_text(&self) -> &str {
        non_empty(&self.main_month).unwrap_or(DEFAULT_MAIN_MONTH)
    }

    pub fn wedding_header_text(&self) -> &str {
        non_empty(&self.wedding_header).unwrap_or(DEFAULT_WEDDING_HEADER)
    }

    /// An explicitly empty message stays empty; only an absent one defaults.
    pub fn request_message_text(&self) -> &str {
        self.request_message
            .as_deref()
            .unwrap_or(DEFAULT_REQUEST_MESSAGE)
    }

    pub fn schedule_title_text(&self) -> &str {
        non_empty(&self.schedule_section_title).unwrap_or(DEFAULT_SCHEDULE_TITLE)
    }

    pub fn couple_image(&self) -> Option<&str> {
        non_empty(&self.couple_image_url)
    }

    pub fn og_image(&self) -> Option<&str> {
        non_empty(&self.og_image_url)
    }

    pub fn map_link(&self) -> Option<&str> {
        non_empty(&self.venue_map_link)
    }

    /// Media shown in the couple section. A non-empty gallery wins; otherwise
    /// the legacy single couple image, if any.
    pub fn media_items(&self) -> Cow<'_, [MediaItem]> {
        if !self.gallery.is_empty() {
            Cow::Borrowed(&self.gallery)
        } else if let Some(url) = self.couple_image() {
            Cow::Owned(vec![MediaItem::image(url)])
        } else {
            Cow::Borrowed(&[])
        }
    }

    /// `{mainDay}, {mainDate} {mainYear}`, as used in share text and AI prompts.
    pub fn date_line(&self) -> String {
        format!("{}, {} {}", self.main_day, self.main_date, self.main_year)
    }

    pub fn effective_section_order(&self) -> Cow<'_, [SectionId]> {
        match &self.section_order {
            Some(order) => Cow::Borrowed(order),
            None => Cow::Borrowed(&DEFAULT_SECTION_ORDER),
        }
    }

    pub fn custom_section(&self, id: &str) -> Option<&CustomSection> {
        self.custom_sections.iter().find(|s| s.id == id)
    }

    /// True once `editExpiryDate` is in the past relative to `now`.
    pub fn is_edit_locked(&self, now: DateTime<Utc>) -> bool {
        self.edit_expiry_date
            .as_ref()
            .map(|e| e.has_passed(now))
            .unwrap_or(false)
    }
}

/// Applies `patch` onto `base` with document-store merge semantics: objects
/// merge key by key recursively, everything else (arrays included) replaces.
pub fn merge_document(base: &mut serde_json::Value, patch: serde_json::Value) {
    use serde_json::Value;

    match (base, patch) {
        (Value::Object(base_map), Value::Object(patch_map)) => {
            for (key, value) in patch_map {
                match base_map.get_mut(&key) {
                    Some(existing) if existing.is_object() && value.is_object() => {
                        merge_document(existing, value)
                    }
                    _ => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, patch) => *base = patch,
    }
}

/// A stored invitation with its storage identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationRecord {
    pub id: String,
    pub owner_id: Uuid,
    pub data: InvitationData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// List entry for the owner dashboard and admin tools.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationSummary {
    pub id: String,
    pub owner_id: Uuid,
    pub bride_name: String,
    pub groom_name: String,
    pub theme: Theme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edit_expiry_date: Option<EditExpiry>,
    pub updated_at: DateTime<Utc>,
}

impl From<&InvitationRecord> for InvitationSummary {
    fn from(record: &InvitationRecord) -> Self {
        Self {
            id: record.id.clone(),
            owner_id: record.owner_id,
            bride_name: record.data.bride_name.clone(),
            groom_name: record.data.groom_name.clone(),
            theme: record.data.theme.clone(),
            edit_expiry_date: record.data.edit_expiry_date.clone(),
            updated_at: record.updated_at,
        }
    }
}
