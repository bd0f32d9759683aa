//! Card export pipeline.
//!
//! An export walks an ordered list of capture configurations against a
//! [`Capturer`] until one succeeds:
//!
//! ```text
//! Idle -> Capturing(primary) -> Succeeded
//!                            \-> Capturing(system fonts) -> Succeeded | Failed
//! ```
//!
//! Attempts are strictly sequential. A missing capture target fails at once
//! without any attempt. The captured PNG is then handed to a sink: a file
//! download, or a share sheet that degrades to "download + compose link".

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::models::InvitationData;
use crate::services::share;

/// DOM id of the card root in the rendered page.
pub const CARD_ELEMENT_ID: &str = "invitation-card";
/// Supersampling factor used for every attempt unless configured otherwise.
pub const DEFAULT_PIXEL_RATIO: f32 = 2.0;
/// Elements that animate in on scroll; forced to their settled state.
pub const SETTLE_SELECTOR: &str = ".fade-in-element";

pub const MSG_TARGET_MISSING_DOWNLOAD: &str = "Could not find the card element to download.";
pub const MSG_TARGET_MISSING_SHARE: &str = "Could not find the card element to share.";
pub const MSG_DOWNLOAD_FAILED: &str =
    "Could not generate image even with fallbacks. Please try taking a screenshot instead.";
pub const MSG_SHARE_FAILED: &str = "Could not generate image. Please send the link manually.";
pub const MSG_NOT_SAVED: &str = "Invitation ID not found. Please save first.";

/// Parameters of a single rasterization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureOptions {
    pub pixel_ratio: f32,
    /// Disable web-font embedding and render with system fonts.
    pub skip_fonts: bool,
    /// Force `.fade-in-element` nodes to `opacity:1; transform:none`.
    pub settle_animations: bool,
    pub cache_bust: bool,
}

impl CaptureOptions {
    pub fn primary(pixel_ratio: f32) -> Self {
        Self {
            pixel_ratio,
            skip_fonts: false,
            settle_animations: true,
            cache_bust: false,
        }
    }

    pub fn system_fonts(pixel_ratio: f32) -> Self {
        Self {
            skip_fonts: true,
            ..Self::primary(pixel_ratio)
        }
    }
}

/// Ordered capture configurations; the first success wins.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureStrategy {
    attempts: Vec<CaptureOptions>,
}

impl CaptureStrategy {
    pub fn new(attempts: Vec<CaptureOptions>) -> Self {
        Self { attempts }
    }

    /// Primary capture, then one retry with system fonts.
    pub fn with_font_fallback(pixel_ratio: f32) -> Self {
        Self::new(vec![
            CaptureOptions::primary(pixel_ratio),
            CaptureOptions::system_fonts(pixel_ratio),
        ])
    }

    pub fn attempts(&self) -> &[CaptureOptions] {
        &self.attempts
    }
}

impl Default for CaptureStrategy {
    fn default() -> Self {
        Self::with_font_fallback(DEFAULT_PIXEL_RATIO)
    }
}

/// The subtree to rasterize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureTarget {
    pub element_id: String,
    /// Standalone HTML document containing the element.
    pub html: String,
}

impl CaptureTarget {
    pub fn card(html: impl Into<String>) -> Self {
        Self {
            element_id: CARD_ELEMENT_ID.to_string(),
            html: html.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub png: Vec<u8>,
    /// 1-based attempt that produced the image.
    pub attempt: usize,
    pub used_system_fonts: bool,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Rasterizer returned no image")]
    Empty,

    #[error("Capture failed: {0}")]
    Failed(String),

    #[error("Rasterizer unavailable: {0}")]
    Unavailable(String),
}

/// Rasterizes a DOM subtree to PNG bytes.
#[async_trait]
pub trait Capturer: Send + Sync {
    async fn capture(
        &self,
        target: &CaptureTarget,
        options: &CaptureOptions,
    ) -> Result<Vec<u8>, CaptureError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportState {
    Idle,
    Capturing {
        attempt: usize,
        options: CaptureOptions,
    },
    Succeeded {
        attempt: usize,
    },
    Failed,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("Capture target not found")]
    TargetMissing,

    #[error("All {attempts} capture attempts failed: {last_error}")]
    Exhausted {
        attempts: usize,
        last_error: CaptureError,
    },
}

impl ExportError {
    /// Message shown to the user for a failed export to `sink`.
    pub fn user_message(&self, sink: SinkKind) -> &'static str {
        match (self, sink) {
            (ExportError::TargetMissing, SinkKind::Download) => MSG_TARGET_MISSING_DOWNLOAD,
            (ExportError::TargetMissing, SinkKind::Share) => MSG_TARGET_MISSING_SHARE,
            (ExportError::Exhausted { .. }, SinkKind::Download) => MSG_DOWNLOAD_FAILED,
            (ExportError::Exhausted { .. }, SinkKind::Share) => MSG_SHARE_FAILED,
        }
    }
}

/// One export run. Create a fresh pipeline per user action.
#[derive(Debug)]
pub struct ExportPipeline {
    strategy: CaptureStrategy,
    state: ExportState,
    history: Vec<ExportState>,
}

impl ExportPipeline {
    pub fn new(strategy: CaptureStrategy) -> Self {
        Self {
            strategy,
            state: ExportState::Idle,
            history: vec![ExportState::Idle],
        }
    }

    pub fn state(&self) -> &ExportState {
        &self.state
    }

    /// Every state the run has passed through, starting with `Idle`.
    pub fn history(&self) -> &[ExportState] {
        &self.history
    }

    fn transition(&mut self, next: ExportState) {
        debug!(from = ?self.state, to = ?next, "Export state transition");
        self.state = next.clone();
        self.history.push(next);
    }

    pub async fn run<C>(
        &mut self,
        capturer: &C,
        target: Option<&CaptureTarget>,
    ) -> Result<CapturedImage, ExportError>
    where
        C: Capturer + ?Sized,
    {
        let Some(target) = target else {
            warn!("Export target missing, no capture attempted");
            self.transition(ExportState::Failed);
            return Err(ExportError::TargetMissing);
        };

        let attempts = self.strategy.attempts().to_vec();
        let mut last_error = CaptureError::Failed("no capture configured".to_string());

        for (index, options) in attempts.iter().enumerate() {
            let attempt = index + 1;
            self.transition(ExportState::Capturing {
                attempt,
                options: *options,
            });

            match capturer.capture(target, options).await {
                Ok(png) if !png.is_empty() => {
                    info!(
                        attempt,
                        skip_fonts = options.skip_fonts,
                        bytes = png.len(),
                        outcome = "success",
                        "Card captured"
                    );
                    self.transition(ExportState::Succeeded { attempt });
                    return Ok(CapturedImage {
                        png,
                        attempt,
                        used_system_fonts: options.skip_fonts,
                    });
                }
                Ok(_) => last_error = CaptureError::Empty,
                Err(e) => last_error = e,
            }

            warn!(
                attempt,
                skip_fonts = options.skip_fonts,
                error = %last_error,
                "Card capture attempt failed"
            );
        }

        error!(
            attempts = attempts.len(),
            error = %last_error,
            outcome = "exhausted",
            "Card export failed"
        );
        self.transition(ExportState::Failed);
        Err(ExportError::Exhausted {
            attempts: attempts.len(),
            last_error,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Download,
    Share,
}

impl SinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SinkKind::Download => "download",
            SinkKind::Share => "share",
        }
    }
}

/// Image plus text handed to a native share sheet.
#[derive(Debug, Clone)]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub file_name: String,
    pub png: Vec<u8>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Share rejected: {0}")]
pub struct ShareRejected(pub String);

/// Native share sheet.
#[async_trait]
pub trait ShareSheet: Send + Sync {
    fn can_share(&self, payload: &SharePayload) -> bool;

    async fn share(&self, payload: &SharePayload) -> Result<(), ShareRejected>;
}

/// Share sheet for contexts without one, such as the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableShareSheet;

#[async_trait]
impl ShareSheet for UnavailableShareSheet {
    fn can_share(&self, _payload: &SharePayload) -> bool {
        false
    }

    async fn share(&self, _payload: &SharePayload) -> Result<(), ShareRejected> {
        Err(ShareRejected("share sheet unavailable".to_string()))
    }
}

/// What the client should do when sharing has to degrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackPlan {
    pub download_file_name: String,
    pub clipboard_text: String,
    pub compose_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "delivery", rename_all = "snake_case")]
pub enum Delivery {
    Download {
        #[serde(rename = "fileName")]
        file_name: String,
    },
    Shared,
    Fallback(FallbackPlan),
}

/// Names the download for a captured image.
pub fn deliver_download(file_name: Option<&str>, image: &CapturedImage) -> Delivery {
    Delivery::Download {
        file_name: share::download_file_name(file_name, image.used_system_fonts),
    }
}

/// Offers the image to the share sheet, falling back to
/// download + clipboard + compose link when it is unavailable or refuses.
pub async fn deliver_share<S>(
    sheet: &S,
    data: &InvitationData,
    url: &str,
    image: &CapturedImage,
) -> Delivery
where
    S: ShareSheet + ?Sized,
{
    let text = share::short_share_message(data, url);
    let payload = SharePayload {
        title: share::SHARE_TITLE.to_string(),
        text: text.clone(),
        file_name: share::share_sheet_file_name(image.used_system_fonts).to_string(),
        png: image.png.clone(),
    };

    if sheet.can_share(&payload) {
        match sheet.share(&payload).await {
            Ok(()) => return Delivery::Shared,
            Err(e) => warn!(error = %e, "Share sheet rejected payload, using fallback"),
        }
    }

    Delivery::Fallback(FallbackPlan {
        download_file_name: share::share_file_name(data, image.used_system_fonts),
        compose_url: share::whatsapp_compose_url(&text),
        clipboard_text: text,
    })
}
