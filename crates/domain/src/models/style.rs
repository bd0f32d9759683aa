//! Typography and color overrides for card text.
//!
//! On the wire an invitation carries four sparse maps (`fonts`, `boldText`,
//! `fontSizes`, `colors`) keyed by logical field name. In memory they are
//! folded into one [`StyleOverrides`] lookup, and every read goes through
//! [`StyleOverrides::resolve`], which falls back to the per-field defaults in
//! [`StyleField::defaults`]. A document with no overlay maps at all is valid.

use serde::{Deserialize, Serialize};
use shared::validation::validate_css_color;
use std::collections::BTreeMap;

/// Logical text fields that accept style overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleField {
    BrideName,
    GroomName,
    BrideParents,
    GroomParents,
    WeddingHeader,
    ShubhMuhhurt,
    MainDay,
    MainMonth,
    MainDate,
    MainTime,
    MainYear,
    RequestMessage,
    ScheduleSectionTitle,
    ScheduleName,
    ScheduleDetails,
    Place,
    VenueCity,
}

/// Built-in style of a field when no override is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefaults {
    pub font: &'static str,
    pub size: &'static str,
    /// Bold state used when rendering.
    pub bold: bool,
    /// Bold state pre-selected in the editor's toggle.
    pub editor_bold: bool,
}

impl StyleField {
    pub const ALL: [StyleField; 17] = [
        StyleField::BrideName,
        StyleField::GroomName,
        StyleField::BrideParents,
        StyleField::GroomParents,
        StyleField::WeddingHeader,
        StyleField::ShubhMuhhurt,
        StyleField::MainDay,
        StyleField::MainMonth,
        StyleField::MainDate,
        StyleField::MainTime,
        StyleField::MainYear,
        StyleField::RequestMessage,
        StyleField::ScheduleSectionTitle,
        StyleField::ScheduleName,
        StyleField::ScheduleDetails,
        StyleField::Place,
        StyleField::VenueCity,
    ];

    /// Key used in the overlay maps.
    pub fn key(&self) -> &'static str {
        match self {
            StyleField::BrideName => "brideName",
            StyleField::GroomName => "groomName",
            StyleField::BrideParents => "brideParents",
            StyleField::GroomParents => "groomParents",
            StyleField::WeddingHeader => "weddingHeader",
            StyleField::ShubhMuhhurt => "shubhMuhhurt",
            StyleField::MainDay => "mainDay",
            StyleField::MainMonth => "mainMonth",
            StyleField::MainDate => "mainDate",
            StyleField::MainTime => "mainTime",
            StyleField::MainYear => "mainYear",
            StyleField::RequestMessage => "requestMessage",
            StyleField::ScheduleSectionTitle => "scheduleSectionTitle",
            StyleField::ScheduleName => "scheduleName",
            StyleField::ScheduleDetails => "scheduleDetails",
            StyleField::Place => "place",
            StyleField::VenueCity => "venueCity",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    pub fn defaults(&self) -> FieldDefaults {
        let (font, size, editor_bold) = match self {
            StyleField::BrideName | StyleField::GroomName => {
                ("font-headline", "text-xl sm:text-3xl", true)
            }
            StyleField::BrideParents | StyleField::GroomParents => ("font-body", "text-xs", false),
            StyleField::WeddingHeader => ("font-custom-header", "text-4xl sm:text-6xl", false),
            StyleField::ShubhMuhhurt => ("font-headline", "text-2xl sm:text-4xl", true),
            StyleField::MainDay => ("font-serif", "text-2xl", false),
            StyleField::MainMonth | StyleField::MainTime => ("font-body", "text-xl", false),
            StyleField::MainDate => ("font-headline", "text-6xl sm:text-9xl", false),
            StyleField::MainYear => ("font-body", "text-5xl", false),
            StyleField::RequestMessage => ("font-serif", "text-lg", false),
            StyleField::ScheduleSectionTitle => ("font-headline", "text-2xl sm:text-4xl", false),
            StyleField::ScheduleName => ("font-headline", "text-xl sm:text-3xl", false),
            StyleField::ScheduleDetails => ("font-serif", "text-xl", false),
            StyleField::Place => ("font-headline", "text-2xl sm:text-5xl", true),
            StyleField::VenueCity => ("font-body", "text-xl sm:text-3xl", false),
        };
        FieldDefaults {
            font,
            size,
            bold: false,
            editor_bold,
        }
    }
}

/// Fully resolved style for one piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub font: String,
    pub bold: bool,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl ResolvedStyle {
    /// Space-separated class list for the rendered element.
    pub fn classes(&self) -> String {
        let mut parts = vec![self.font.as_str()];
        if self.bold {
            parts.push("font-bold");
        }
        if !self.size.is_empty() {
            parts.push(self.size.as_str());
        }
        parts.join(" ")
    }
}

/// Overrides recorded for a single field key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOverride {
    pub font: Option<String>,
    pub bold: Option<bool>,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl FieldOverride {
    fn is_empty(&self) -> bool {
        self.font.is_none() && self.bold.is_none() && self.size.is_none() && self.color.is_none()
    }
}

/// All style overrides of one invitation, keyed by field key.
///
/// Keys are kept as strings so overrides for fields this build does not know
/// about survive a load/save cycle untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OverlayMaps", into = "OverlayMaps")]
pub struct StyleOverrides {
    entries: BTreeMap<String, FieldOverride>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl StyleOverrides {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, field: StyleField) -> Option<&FieldOverride> {
        self.entries.get(field.key())
    }

    /// Resolves the rendering style of `field`, falling back per dimension.
    pub fn resolve(&self, field: StyleField) -> ResolvedStyle {
        let defaults = field.defaults();
        let entry = self.get(field);

        ResolvedStyle {
            font: entry
                .and_then(|e| non_empty(&e.font))
                .unwrap_or(defaults.font)
                .to_string(),
            bold: entry.and_then(|e| e.bold).unwrap_or(defaults.bold),
            size: entry
                .and_then(|e| non_empty(&e.size))
                .unwrap_or(defaults.size)
                .to_string(),
            // Stored values that would not pass the save check are ignored.
            color: entry
                .and_then(|e| non_empty(&e.color))
                .filter(|c| validate_css_color(c).is_ok())
                .map(str::to_string),
        }
    }

    /// Every stored color override as `(field key, color)`, unknown keys included.
    pub fn colors(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(key, e)| e.color.as_deref().map(|c| (key.as_str(), c)))
    }

    fn entry_mut(&mut self, field: StyleField) -> &mut FieldOverride {
        self.entries.entry(field.key().to_string()).or_default()
    }

    pub fn set_font(&mut self, field: StyleField, font: impl Into<String>) {
        self.entry_mut(field).font = Some(font.into());
    }

    pub fn set_bold(&mut self, field: StyleField, bold: bool) {
        self.entry_mut(field).bold = Some(bold);
    }

    pub fn set_size(&mut self, field: StyleField, size: impl Into<String>) {
        self.entry_mut(field).size = Some(size.into());
    }

    /// Sets or clears the color override; clearing falls back to the theme.
    pub fn set_color(&mut self, field: StyleField, color: Option<String>) {
        match color {
            Some(color) => self.entry_mut(field).color = Some(color),
            None => {
                if let Some(entry) = self.entries.get_mut(field.key()) {
                    entry.color = None;
                    if entry.is_empty() {
                        self.entries.remove(field.key());
                    }
                }
            }
        }
    }
}

/// Wire shape of the overlay: four independent, optional, sparse maps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayMaps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fonts: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bold_text: Option<BTreeMap<String, bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_sizes: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<BTreeMap<String, String>>,
}

impl From<OverlayMaps> for StyleOverrides {
    fn from(maps: OverlayMaps) -> Self {
        let mut entries: BTreeMap<String, FieldOverride> = BTreeMap::new();
        for (key, font) in maps.fonts.unwrap_or_default() {
            entries.entry(key).or_default().font = Some(font);
        }
        for (key, bold) in maps.bold_text.unwrap_or_default() {
            entries.entry(key).or_default().bold = Some(bold);
        }
        for (key, size) in maps.font_sizes.unwrap_or_default() {
            entries.entry(key).or_default().size = Some(size);
        }
        for (key, color) in maps.colors.unwrap_or_default() {
            entries.entry(key).or_default().color = Some(color);
        }
        StyleOverrides { entries }
    }
}

impl From<StyleOverrides> for OverlayMaps {
    fn from(overrides: StyleOverrides) -> Self {
        fn collect<T: Clone>(
            entries: &BTreeMap<String, FieldOverride>,
            pick: impl Fn(&FieldOverride) -> Option<T>,
        ) -> Option<BTreeMap<String, T>> {
            let map: BTreeMap<String, T> = entries
                .iter()
                .filter_map(|(k, e)| pick(e).map(|v| (k.clone(), v)))
                .collect();
            (!map.is_empty()).then_some(map)
        }

        OverlayMaps {
            fonts: collect(&overrides.entries, |e| e.font.clone()),
            bold_text: collect(&overrides.entries, |e| e.bold),
            font_sizes: collect(&overrides.entries, |e| e.size.clone()),
            colors: collect(&overrides.entries, |e| e.color.clone()),
        }
    }
}

/// Font tokens offered by the editor: (token, display name).
pub const AVAILABLE_FONTS: [(&str, &str); 10] = [
    ("font-headline", "Default (Tiro Devanagari)"),
    ("font-mukta", "Mukta (Modern)"),
    ("font-baloo", "Baloo 2 (Rounded)"),
    ("font-yatra", "Yatra One (Bold)"),
    ("font-modak", "Modak (Heavy)"),
    ("font-gotu", "Gotu (Calligraphic)"),
    ("font-rozha", "Rozha One (High Contrast)"),
    ("font-laila", "Laila (Decorative)"),
    ("font-sahitya", "Sahitya (Serif)"),
    ("font-custom-header", "Custom Header (AMS)"),
];

/// Ordered responsive size scale used by the size stepper: (label, token).
pub const SIZE_SCALE: [(&str, &str); 10] = [
    ("XS", "text-xs"),
    ("S", "text-sm"),
    ("M", "text-base"),
    ("L", "text-lg"),
    ("XL", "text-xl sm:text-2xl"),
    ("2XL", "text-2xl sm:text-3xl"),
    ("3XL", "text-3xl sm:text-4xl"),
    ("4XL", "text-4xl sm:text-5xl"),
    ("5XL", "text-5xl sm:text-6xl"),
    ("6XL", "text-6xl sm:text-7xl"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStep {
    Up,
    Down,
}

/// Position of `size` on [`SIZE_SCALE`]. Sizes off the scale (the built-in
/// field defaults mostly) map to their nearest step.
pub fn scale_index(size: &str) -> usize {
    if let Some(index) = SIZE_SCALE.iter().position(|(_, token)| *token == size) {
        return index;
    }
    if size.contains("text-4xl sm:text-6xl") {
        8
    } else if size.contains("text-2xl sm:text-5xl") {
        7
    } else if size.contains("text-xl sm:text-3xl") {
        5
    } else {
        4
    }
}

/// Moves one step along the scale, clamping at both ends.
pub fn step_size(size: &str, step: SizeStep) -> &'static str {
    let current = scale_index(size);
    let next = match step {
        SizeStep::Up => (current + 1).min(SIZE_SCALE.len() - 1),
        SizeStep::Down => current.saturating_sub(1),
    };
    SIZE_SCALE[next].1
}
