//! Static catalogs for the invitation editor form.

use axum::Json;
use domain::models::style::{FieldDefaults, AVAILABLE_FONTS, SIZE_SCALE};
use domain::models::theme::{theme_options, ThemeOption};
use domain::models::StyleField;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct FontOption {
    pub token: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SizeOption {
    pub label: &'static str,
    pub token: &'static str,
}

#[derive(Debug, Serialize)]
pub struct FieldOption {
    pub key: &'static str,
    #[serde(flatten)]
    pub defaults: FieldDefaults,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorOptions {
    pub themes: Vec<ThemeOption>,
    pub fonts: Vec<FontOption>,
    pub size_scale: Vec<SizeOption>,
    pub fields: Vec<FieldOption>,
}

pub fn editor_options_catalog() -> EditorOptions {
    EditorOptions {
        themes: theme_options(),
        fonts: AVAILABLE_FONTS
            .iter()
            .map(|&(token, name)| FontOption { token, name })
            .collect(),
        size_scale: SIZE_SCALE
            .iter()
            .map(|&(label, token)| SizeOption { label, token })
            .collect(),
        fields: StyleField::ALL
            .iter()
            .map(|field| FieldOption {
                key: field.key(),
                defaults: field.defaults(),
            })
            .collect(),
    }
}

/// GET /api/v1/editor/options
pub async fn editor_options() -> Json<EditorOptions> {
    Json(editor_options_catalog())
}
