//! Editor mutations.
//!
//! Each [`EditorCommand`] takes the current document and returns a new one
//! with exactly one field path replaced. Map-valued fields (the style overlay)
//! are shallow-merged: setting one font key keeps its siblings.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::invitation::CUSTOM_SECTION_PREFIX;
use crate::models::{
    Branding, Countdown, CustomSection, GalleryConfig, HostSide, InvitationData, MediaItem,
    MediaKind, ScheduleItem, SectionId, SizeStep, StyleField, Theme, TopBanner,
};
use crate::models::style::step_size;
use crate::services::suggestion::Suggestion;
use shared::validation::{validate_css_color, validate_media_url};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("{collection} index {index} is out of range (len {len})")]
    IndexOutOfRange {
        collection: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Custom section not found: {0}")]
    UnknownCustomSection(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid URL for {field}: {url}")]
    InvalidUrl { field: &'static str, url: String },
}

/// Plain-text fields editable through [`EditorCommand::SetField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextField {
    BrideName,
    BrideFather,
    BrideMother,
    GroomName,
    GroomFather,
    GroomMother,
    BrideParentsDetails,
    GroomParentsDetails,
    MainDate,
    MainDay,
    MainMonth,
    MainTime,
    MainYear,
    VenueName,
    VenueCity,
    VenueMapLink,
    WeddingHeader,
    RequestMessage,
    ScheduleSectionTitle,
    CoupleImageUrl,
    OgImageUrl,
    SuggestedMessage,
    DesignAdjustments,
}

/// One editor action, as posted by the form UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditorCommand {
    SetField {
        field: TextField,
        value: String,
    },
    SetTheme {
        theme: Theme,
    },
    SetHostSide {
        host_side: HostSide,
    },
    AddScheduleItem,
    UpdateScheduleItem {
        index: usize,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        details: Option<String>,
    },
    RemoveScheduleItem {
        index: usize,
    },
    AddGalleryItem {
        #[serde(default)]
        kind: MediaKind,
        url: String,
    },
    RemoveGalleryItem {
        index: usize,
    },
    SetFont {
        field: StyleField,
        font: String,
    },
    SetBold {
        field: StyleField,
        bold: bool,
    },
    SetFontSize {
        field: StyleField,
        size: String,
    },
    StepFontSize {
        field: StyleField,
        step: SizeStep,
    },
    SetColor {
        field: StyleField,
        #[serde(default)]
        color: Option<String>,
    },
    SetTopBanner {
        banner: TopBanner,
    },
    SetCountdown {
        countdown: Countdown,
    },
    SetBranding {
        branding: Branding,
    },
    SetGalleryConfig {
        config: GalleryConfig,
    },
    AddCustomSection {
        title: String,
        #[serde(default)]
        content: String,
        #[serde(default)]
        image_url: Option<String>,
    },
    UpdateCustomSection {
        id: String,
        #[serde(default)]
        title: Option<String>,
        #[serde(default)]
        content: Option<String>,
        #[serde(default)]
        image_url: Option<String>,
        #[serde(default)]
        font_title: Option<String>,
        #[serde(default)]
        bold_title: Option<bool>,
        #[serde(default)]
        font_content: Option<String>,
        #[serde(default)]
        bold_content: Option<bool>,
    },
    RemoveCustomSection {
        id: String,
    },
    SetSectionOrder {
        order: Vec<SectionId>,
    },
    MoveSection {
        from: usize,
        to: usize,
    },
    ApplySuggestion {
        suggestion: Suggestion,
    },
}

fn check_index(collection: &'static str, index: usize, len: usize) -> Result<(), EditError> {
    if index < len {
        Ok(())
    } else {
        Err(EditError::IndexOutOfRange {
            collection,
            index,
            len,
        })
    }
}

fn text_slot(data: &mut InvitationData, field: TextField) -> TextSlot<'_> {
    use TextField::*;
    match field {
        BrideName => TextSlot::Required(&mut data.bride_name),
        BrideFather => TextSlot::Required(&mut data.bride_father),
        BrideMother => TextSlot::Required(&mut data.bride_mother),
        GroomName => TextSlot::Required(&mut data.groom_name),
        GroomFather => TextSlot::Required(&mut data.groom_father),
        GroomMother => TextSlot::Required(&mut data.groom_mother),
        BrideParentsDetails => TextSlot::Optional(&mut data.bride_parents_details),
        GroomParentsDetails => TextSlot::Optional(&mut data.groom_parents_details),
        MainDate => TextSlot::Required(&mut data.main_date),
        MainDay => TextSlot::Required(&mut data.main_day),
        MainMonth => TextSlot::Optional(&mut data.main_month),
        MainTime => TextSlot::Required(&mut data.main_time),
        MainYear => TextSlot::Required(&mut data.main_year),
        VenueName => TextSlot::Required(&mut data.venue_name),
        VenueCity => TextSlot::Required(&mut data.venue_city),
        VenueMapLink => TextSlot::Optional(&mut data.venue_map_link),
        WeddingHeader => TextSlot::Optional(&mut data.wedding_header),
        RequestMessage => TextSlot::Optional(&mut data.request_message),
        ScheduleSectionTitle => TextSlot::Optional(&mut data.schedule_section_title),
        CoupleImageUrl => TextSlot::Optional(&mut data.couple_image_url),
        OgImageUrl => TextSlot::Optional(&mut data.og_image_url),
        SuggestedMessage => TextSlot::Optional(&mut data.suggested_message),
        DesignAdjustments => TextSlot::Optional(&mut data.design_adjustments),
    }
}

enum TextSlot<'a> {
    Required(&'a mut String),
    Optional(&'a mut Option<String>),
}

fn check_color(color: &str) -> Result<(), EditError> {
    validate_css_color(color).map_err(|_| EditError::InvalidColor(color.to_string()))
}

fn check_url(field: &'static str, url: Option<&str>) -> Result<(), EditError> {
    match url.map(str::trim).filter(|u| !u.is_empty()) {
        Some(u) => validate_media_url(u).map_err(|_| EditError::InvalidUrl {
            field,
            url: u.to_string(),
        }),
        None => Ok(()),
    }
}

/// Checks every value that ends up inside a `style` attribute or a URL
/// attribute on the public page. Empty values are allowed.
pub fn validate_document(data: &InvitationData) -> Result<(), EditError> {
    for (_, color) in data.style.colors() {
        if !color.trim().is_empty() {
            check_color(color)?;
        }
    }
    if let Some(color) = data.top_banner.as_ref().and_then(|b| b.color.as_deref()) {
        if !color.trim().is_empty() {
            check_color(color)?;
        }
    }

    for item in &data.gallery {
        check_url("gallery", Some(&item.url))?;
    }
    check_url("coupleImageUrl", data.couple_image_url.as_deref())?;
    check_url("ogImageUrl", data.og_image_url.as_deref())?;
    check_url("venueMapLink", data.venue_map_link.as_deref())?;
    for section in &data.custom_sections {
        check_url("customSections", section.image_url.as_deref())?;
    }
    check_url(
        "branding.logoUrl",
        data.branding.as_ref().and_then(|b| b.logo_url.as_deref()),
    )?;
    Ok(())
}

fn new_custom_section_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", CUSTOM_SECTION_PREFIX, &suffix[..8])
}

/// Applies one command to a copy of `data`.
pub fn apply(data: &InvitationData, command: EditorCommand) -> Result<InvitationData, EditError> {
    let mut next = data.clone();

    match command {
        EditorCommand::SetField { field, value } => match text_slot(&mut next, field) {
            TextSlot::Required(slot) => *slot = value,
            TextSlot::Optional(slot) => *slot = Some(value),
        },
        EditorCommand::SetTheme { theme } => next.theme = theme,
        EditorCommand::SetHostSide { host_side } => next.host_side = host_side,
        EditorCommand::AddScheduleItem => next.schedule.push(ScheduleItem::default()),
        EditorCommand::UpdateScheduleItem {
            index,
            name,
            details,
        } => {
            check_index("schedule", index, next.schedule.len())?;
            let item = &mut next.schedule[index];
            if let Some(name) = name {
                item.name = name;
            }
            if let Some(details) = details {
                item.details = details;
            }
        }
        EditorCommand::RemoveScheduleItem { index } => {
            check_index("schedule", index, next.schedule.len())?;
            next.schedule.remove(index);
        }
        EditorCommand::AddGalleryItem { kind, url } => {
            let url = url.trim();
            if !url.is_empty() {
                next.gallery.push(MediaItem {
                    kind,
                    url: url.to_string(),
                });
            }
        }
        EditorCommand::RemoveGalleryItem { index } => {
            check_index("gallery", index, next.gallery.len())?;
            next.gallery.remove(index);
        }
        EditorCommand::SetFont { field, font } => next.style.set_font(field, font),
        EditorCommand::SetBold { field, bold } => next.style.set_bold(field, bold),
        EditorCommand::SetFontSize { field, size } => next.style.set_size(field, size),
        EditorCommand::StepFontSize { field, step } => {
            let current = next.style.resolve(field).size;
            next.style.set_size(field, step_size(&current, step));
        }
        EditorCommand::SetColor { field, color } => {
            let color = color.filter(|c| !c.trim().is_empty());
            if let Some(c) = &color {
                check_color(c)?;
            }
            next.style.set_color(field, color);
        }
        EditorCommand::SetTopBanner { banner } => {
            if let Some(c) = banner.color.as_deref().filter(|c| !c.trim().is_empty()) {
                check_color(c)?;
            }
            next.top_banner = Some(banner);
        }
        EditorCommand::SetCountdown { countdown } => next.countdown = Some(countdown),
        EditorCommand::SetBranding { branding } => next.branding = Some(branding),
        EditorCommand::SetGalleryConfig { config } => next.gallery_config = Some(config),
        EditorCommand::AddCustomSection {
            title,
            content,
            image_url,
        } => {
            let id = new_custom_section_id();
            next.custom_sections.push(CustomSection {
                id: id.clone(),
                title,
                content,
                image_url: image_url.filter(|u| !u.trim().is_empty()),
                ..Default::default()
            });
            let mut order = next.effective_section_order().into_owned();
            order.push(SectionId::Custom(id));
            next.section_order = Some(order);
        }
        EditorCommand::UpdateCustomSection {
            id,
            title,
            content,
            image_url,
            font_title,
            bold_title,
            font_content,
            bold_content,
        } => {
            let section = next
                .custom_sections
                .iter_mut()
                .find(|s| s.id == id)
                .ok_or_else(|| EditError::UnknownCustomSection(id.clone()))?;
            if let Some(title) = title {
                section.title = title;
            }
            if let Some(content) = content {
                section.content = content;
            }
            if let Some(url) = image_url {
                section.image_url = Some(url).filter(|u| !u.trim().is_empty());
            }
            if font_title.is_some() {
                section.font_title = font_title;
            }
            if bold_title.is_some() {
                section.bold_title = bold_title;
            }
            if font_content.is_some() {
                section.font_content = font_content;
            }
            if bold_content.is_some() {
                section.bold_content = bold_content;
            }
        }
        EditorCommand::RemoveCustomSection { id } => {
            let before = next.custom_sections.len();
            next.custom_sections.retain(|s| s.id != id);
            if next.custom_sections.len() == before {
                return Err(EditError::UnknownCustomSection(id));
            }
            if let Some(order) = next.section_order.as_mut() {
                order.retain(|s| s.token() != id);
            }
        }
        EditorCommand::SetSectionOrder { order } => next.section_order = Some(order),
        EditorCommand::MoveSection { from, to } => {
            let mut order = next.effective_section_order().into_owned();
            check_index("sectionOrder", from, order.len())?;
            check_index("sectionOrder", to, order.len())?;
            let section = order.remove(from);
            order.insert(to, section);
            next.section_order = Some(order);
        }
        EditorCommand::ApplySuggestion { suggestion } => {
            next.suggested_message = Some(suggestion.suggested_message);
            next.design_adjustments = Some(suggestion.design_adjustments);
        }
    }

    Ok(next)
}

/// Applies a batch in order. The batch is all-or-nothing: the first failing
/// command aborts it and `data` is returned to the caller untouched. The
/// result must pass [`validate_document`].
pub fn apply_all(
    data: &InvitationData,
    commands: impl IntoIterator<Item = EditorCommand>,
) -> Result<InvitationData, EditError> {
    let next = commands
        .into_iter()
        .try_fold(data.clone(), |current, command| apply(&current, command))?;
    validate_document(&next)?;
    Ok(next)
}
