//! Social metadata for page responses.

use serde::Serialize;

use crate::models::InvitationData;

pub const NOT_FOUND_TITLE: &str = "Invitation Not Found";
pub const TWITTER_CARD: &str = "summary_large_image";

/// Site-wide metadata used for pages without an invitation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDefaults {
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub og_image: String,
    pub og_image_width: u32,
    pub og_image_height: u32,
    pub og_image_alt: String,
    pub locale: String,
}

impl Default for SiteDefaults {
    fn default() -> Self {
        Self {
            name: "Digital Invite".to_string(),
            description: "Create your beautiful Marathi digital wedding invitation.".to_string(),
            base_url: "https://patrikaa.vercel.app".to_string(),
            og_image: "/og-image.jpg".to_string(),
            og_image_width: 1200,
            og_image_height: 630,
            og_image_alt: "Digital Invite Preview".to_string(),
            locale: "en_IN".to_string(),
        }
    }
}

impl SiteDefaults {
    /// Resolves `url` against the site base when it is not absolute.
    pub fn absolute(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OgImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenGraph {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub images: Vec<OgImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_graph: Option<OpenGraph>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<TwitterCard>,
}

/// Preferred social image: explicit social image, then the first gallery
/// image, then the legacy couple image.
pub fn social_image(data: &InvitationData) -> Option<&str> {
    data.og_image()
        .or_else(|| {
            data.gallery
                .iter()
                .find(|item| item.kind == crate::models::MediaKind::Image)
                .map(|item| item.url.as_str())
                .filter(|url| !url.trim().is_empty())
        })
        .or_else(|| data.couple_image())
}

pub fn for_invitation(data: &InvitationData, page_url: &str, site: &SiteDefaults) -> PageMetadata {
    let title = format!("Wedding Invitation: {} & {}", data.bride_name, data.groom_name);
    let description = format!(
        "You are cordially invited to the wedding of {} and {} on {} {}. Click to view details.",
        data.bride_name, data.groom_name, data.main_date, data.main_day
    );
    let images: Vec<String> = social_image(data)
        .map(|url| vec![site.absolute(url)])
        .unwrap_or_default();

    PageMetadata {
        title: title.clone(),
        description: Some(description.clone()),
        open_graph: Some(OpenGraph {
            title: title.clone(),
            description: description.clone(),
            url: Some(page_url.to_string()),
            images: images
                .iter()
                .map(|url| OgImage {
                    url: url.clone(),
                    width: None,
                    height: None,
                    alt: None,
                })
                .collect(),
            locale: Some(site.locale.clone()),
            kind: Some("website".to_string()),
        }),
        twitter: Some(TwitterCard {
            card: TWITTER_CARD,
            title,
            description,
            images,
        }),
    }
}

pub fn not_found() -> PageMetadata {
    PageMetadata {
        title: NOT_FOUND_TITLE.to_string(),
        description: None,
        open_graph: None,
        twitter: None,
    }
}

pub fn site_default(site: &SiteDefaults) -> PageMetadata {
    let image = site.absolute(&site.og_image);
    PageMetadata {
        title: site.name.clone(),
        description: Some(site.description.clone()),
        open_graph: Some(OpenGraph {
            title: site.name.clone(),
            description: site.description.clone(),
            url: Some(site.base_url.clone()),
            images: vec![OgImage {
                url: image.clone(),
                width: Some(site.og_image_width),
                height: Some(site.og_image_height),
                alt: Some(site.og_image_alt.clone()),
            }],
            locale: Some(site.locale.clone()),
            kind: Some("website".to_string()),
        }),
        twitter: Some(TwitterCard {
            card: TWITTER_CARD,
            title: site.name.clone(),
            description: site.description.clone(),
            images: vec![image],
        }),
    }
}
