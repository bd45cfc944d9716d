use std::fmt::{Display, Formatter};
use std::str::FromStr;

use anyhow::{Result, anyhow, ensure};

use crate::layout::LayoutParams;
use crate::view::{SearchMode, SearchQuery, ViewportConfig};

pub const DEFAULT_MAX_WIDTH: f32 = 800.0;
pub const DEFAULT_FONT_SIZE: f32 = 32.0;
pub const DEFAULT_PIXEL_RATIO: f32 = 2.0;
pub const DEFAULT_CLICK_THRESHOLD: f32 = 5.0;

/// Surface pixels per screen point used when scaling pointer input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PixelRatio {
    Fixed(f32),
    /// Follow the host's actual backing scale.
    FromSurface,
}

impl PixelRatio {
    /// Fixed value, or `surface` when following the host.
    pub fn resolve(self, surface: f32) -> f32 {
        match self {
            Self::Fixed(ratio) => ratio,
            Self::FromSurface => surface,
        }
    }
}

impl Display for PixelRatio {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(ratio) => write!(f, "{ratio}"),
            Self::FromSurface => f.write_str("auto"),
        }
    }
}

impl FromStr for PixelRatio {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("auto") {
            return Ok(Self::FromSurface);
        }
        let ratio = value
            .parse::<f32>()
            .map_err(|_| anyhow!("invalid pixel ratio `{value}`; expected a number or `auto`"))?;
        ensure!(ratio > 0.0, "pixel ratio must be greater than 0");
        Ok(Self::Fixed(ratio))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewerSettings {
    pub max_width: f32,
    pub font_size: f32,
    pub pixel_ratio: PixelRatio,
    pub click_threshold: f32,
    pub wheel_pan_factor: f32,
    pub wheel_zoom_factor: f32,
    pub min_zoom: f32,
    pub initial_search: String,
    pub search_mode: SearchMode,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        let viewport = ViewportConfig::default();
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            pixel_ratio: PixelRatio::Fixed(DEFAULT_PIXEL_RATIO),
            click_threshold: DEFAULT_CLICK_THRESHOLD,
            wheel_pan_factor: viewport.wheel_pan_factor,
            wheel_zoom_factor: viewport.wheel_zoom_factor,
            min_zoom: viewport.min_zoom,
            initial_search: String::new(),
            search_mode: SearchMode::Substring,
        }
    }
}

impl ViewerSettings {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.max_width > 0.0, "max width must be greater than 0");
        ensure!(self.font_size > 0.0, "font size must be greater than 0");
        ensure!(self.min_zoom > 0.0, "min zoom must be greater than 0");
        ensure!(
            self.click_threshold > 0.0,
            "click threshold must be greater than 0"
        );
        if let PixelRatio::Fixed(ratio) = self.pixel_ratio {
            ensure!(ratio > 0.0, "pixel ratio must be greater than 0");
        }
        Ok(())
    }

    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            max_width: self.max_width,
            font_size: self.font_size,
        }
    }

    /// `surface_ratio` seeds [`PixelRatio::FromSurface`] until the host reports one.
    pub fn viewport_config(&self, surface_ratio: f32) -> ViewportConfig {
        ViewportConfig {
            pixel_ratio: self.pixel_ratio.resolve(surface_ratio),
            click_threshold: self.click_threshold,
            wheel_pan_factor: self.wheel_pan_factor,
            wheel_zoom_factor: self.wheel_zoom_factor,
            min_zoom: self.min_zoom,
        }
    }

    pub fn initial_query(&self) -> SearchQuery {
        SearchQuery {
            text: self.initial_search.clone(),
            mode: self.search_mode,
        }
    }
}
