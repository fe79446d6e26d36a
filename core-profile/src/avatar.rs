//! Header avatar: downloaded image or initials badge.

use std::sync::Arc;

use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::theme::Color;
use image::imageops::FilterType;
use tracing::debug;
use url::Url;

use crate::error::{ProfileError, Result};
use crate::profile::initials;

/// Side of the square avatar slot, in points.
pub const AVATAR_SIZE: f64 = 36.0;

/// Corner radius that turns the slot into a circle.
pub const AVATAR_CORNER_RADIUS: f64 = AVATAR_SIZE / 2.0;

/// Point size of the initials text.
pub const INITIALS_FONT_SIZE: f64 = 16.0;

/// Decoded avatar, scaled to fill the avatar slot.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8 pixels.
    pub rgba: Vec<u8>,
}

impl std::fmt::Debug for AvatarImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvatarImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

/// Placeholder shown when there is no avatar image.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialsBadge {
    pub initials: String,
    pub size: f64,
    pub corner_radius: f64,
    pub font_size: f64,
    pub background: Color,
    pub foreground: Color,
}

impl InitialsBadge {
    pub fn for_name(name: &str) -> Self {
        Self {
            initials: initials(name),
            size: AVATAR_SIZE,
            corner_radius: AVATAR_CORNER_RADIUS,
            font_size: INITIALS_FONT_SIZE,
            background: Color::BLUE.with_alpha(0.2),
            foreground: Color::BLUE,
        }
    }
}

/// Downloads and decodes avatar images.
#[derive(Clone)]
pub struct AvatarLoader {
    http: Arc<dyn HttpClient>,
    scale_factor: f64,
}

impl AvatarLoader {
    /// `scale_factor` is the display's pixels-per-point.
    pub fn new(http: Arc<dyn HttpClient>, scale_factor: f64) -> Self {
        Self {
            http,
            scale_factor: if scale_factor > 0.0 { scale_factor } else { 1.0 },
        }
    }

    /// Pixel side of the decoded square.
    pub fn pixel_size(&self) -> u32 {
        ((AVATAR_SIZE * self.scale_factor).round() as u32).max(1)
    }

    /// Fetch `url` and scale the image to fill the avatar slot.
    ///
    /// The image is resized to cover the square and center-cropped, so
    /// non-square avatars keep their aspect ratio.
    pub async fn load(&self, url: &str) -> Result<AvatarImage> {
        let url = Url::parse(url).map_err(|e| ProfileError::InvalidUrl(format!("{}: {}", url, e)))?;

        let response = self.http.execute(HttpRequest::get(url.as_str())).await?;
        if !response.is_success() {
            return Err(ProfileError::HttpStatus(response.status));
        }
        if response.body.is_empty() {
            return Err(ProfileError::EmptyBody);
        }

        self.decode(&response.body)
    }

    /// Decode already-downloaded bytes.
    pub fn decode(&self, data: &[u8]) -> Result<AvatarImage> {
        let img = image::load_from_memory(data)
            .map_err(|e| ProfileError::ImageDecode(e.to_string()))?;

        let side = self.pixel_size();
        let scaled = img.resize_to_fill(side, side, FilterType::Lanczos3).to_rgba8();
        debug!(
            original_width = img.width(),
            original_height = img.height(),
            side,
            "Avatar decoded"
        );

        Ok(AvatarImage {
            width: scaled.width(),
            height: scaled.height(),
            rgba: scaled.into_raw(),
        })
    }
}
