//! HTTP client for the card rasterizer.
//!
//! The rasterizer receives a standalone HTML document, the id of the element
//! to capture and the capture options, and answers with PNG bytes.

use async_trait::async_trait;
use domain::services::{CaptureError, CaptureOptions, CaptureTarget, Capturer};
use reqwest::{header, Client};
use serde::Serialize;
use tracing::debug;

use crate::config::ExportConfig;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RasterizeRequest<'a> {
    html: &'a str,
    selector: String,
    #[serde(flatten)]
    options: &'a CaptureOptions,
    /// Nodes forced to their settled state before capture.
    settle_selector: Option<&'static str>,
}

pub struct HttpCapturer {
    client: Client,
    url: String,
}

impl HttpCapturer {
    pub fn new(config: &ExportConfig) -> Result<Self, CaptureError> {
        let client = Client::builder()
            .build()
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            url: config.rasterizer_url.clone(),
        })
    }
}

#[async_trait]
impl Capturer for HttpCapturer {
    async fn capture(
        &self,
        target: &CaptureTarget,
        options: &CaptureOptions,
    ) -> Result<Vec<u8>, CaptureError> {
        let body = RasterizeRequest {
            html: &target.html,
            selector: format!("#{}", target.element_id),
            options,
            settle_selector: options
                .settle_animations
                .then_some(domain::services::export::SETTLE_SELECTOR),
        };

        let response = self
            .client
            .post(&self.url)
            .header(header::ACCEPT, "image/png")
            .json(&body)
            .send()
            .await
            .map_err(|e| CaptureError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptureError::Failed(format!("rasterizer returned HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CaptureError::Failed(e.to_string()))?;
        debug!(bytes = bytes.len(), skip_fonts = options.skip_fonts, "Rasterizer responded");
        check_png(&bytes)?;
        Ok(bytes.to_vec())
    }
}

fn check_png(bytes: &[u8]) -> Result<(), CaptureError> {
    if bytes.is_empty() {
        return Err(CaptureError::Empty);
    }
    if !bytes.starts_with(&PNG_SIGNATURE) {
        return Err(CaptureError::Failed("response is not a PNG".to_string()));
    }
    Ok(())
}

/// Capturer used when export is switched off; every attempt fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCapturer;

#[async_trait]
impl Capturer for DisabledCapturer {
    async fn capture(
        &self,
        _target: &CaptureTarget,
        _options: &CaptureOptions,
    ) -> Result<Vec<u8>, CaptureError> {
        Err(CaptureError::Unavailable("image export is disabled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_png() {
        assert_eq!(check_png(&[]), Err(CaptureError::Empty));
        assert!(check_png(b"<html>").is_err());
        let mut png = PNG_SIGNATURE.to_vec();
        png.extend_from_slice(&[0, 0, 0, 13]);
        assert!(check_png(&png).is_ok());
    }

    #[test]
    fn test_request_body_shape() {
        let target = CaptureTarget::card("<div id=\"invitation-card\"></div>");
        let options = CaptureOptions::system_fonts(2.0);
        let body = RasterizeRequest {
            html: &target.html,
            selector: format!("#{}", target.element_id),
            options: &options,
            settle_selector: Some(".fade-in-element"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["selector"], "#invitation-card");
        assert_eq!(json["pixelRatio"], 2.0);
        assert_eq!(json["skipFonts"], true);
        assert_eq!(json["cacheBust"], false);
        assert_eq!(json["settleSelector"], ".fade-in-element");
    }

    #[test]
    fn test_disabled_capturer_fails() {
        let target = CaptureTarget::card("");
        let result = tokio_test::block_on(
            DisabledCapturer.capture(&target, &CaptureOptions::primary(2.0)),
        );
        let err = tokio_test::assert_err!(result);
        assert!(matches!(err, CaptureError::Unavailable(_)));
    }
}
