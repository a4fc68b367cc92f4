// Screen capture: grabs the primary monitor with `xcap` and crops it to the
// selected region, if any.

use crate::selector::Region;
use anyhow::{Context, Result};
use image::RgbaImage;
use std::thread;
use std::time::Duration;
use xcap::Monitor;

/// Pause between closing the overlay and grabbing the screen, so the
/// compositor has removed the overlay from the frame.
pub const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// What part of the display to capture.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum Bounds {
    FullScreen,
    Area(Region),
}

impl Bounds {
    /// No selection, or a zero-area one, means the whole screen.
    pub fn from_selection(selection: Option<Region>) -> Self {
        match selection {
            Some(region) if !region.is_empty() => Bounds::Area(region),
            _ => Bounds::FullScreen,
        }
    }
}

/// Capture the current display contents within `bounds`.
pub fn capture(bounds: Bounds) -> Result<RgbaImage> {
    thread::sleep(SETTLE_DELAY);
    let screen = capture_primary_monitor()?;
    log::debug!("Captured monitor at {}x{}", screen.width(), screen.height());
    Ok(crop(screen, bounds))
}

fn capture_primary_monitor() -> Result<RgbaImage> {
    let monitors = Monitor::all().context("Failed to enumerate monitors")?;
    let monitor = match monitors.iter().position(|m| m.is_primary()) {
        Some(idx) => &monitors[idx],
        None => monitors.first().context("No monitors found")?,
    };
    monitor
        .capture_image()
        .context("Failed to capture screen. Screen recording permission may be required")
}

/// Cut `bounds` out of a full-screen image. The region is clamped to the
/// image; if nothing is left after clamping the full image is returned.
pub fn crop(screen: RgbaImage, bounds: Bounds) -> RgbaImage {
    let region = match bounds {
        Bounds::FullScreen => return screen,
        Bounds::Area(region) => region,
    };

    let (w, h) = screen.dimensions();
    let x = region.x.min(w);
    let y = region.y.min(h);
    let width = region.width.min(w - x);
    let height = region.height.min(h - y);
    if width == 0 || height == 0 {
        log::warn!(
            "Region {} lies outside the {}x{} screen, using the full screen",
            region,
            w,
            h
        );
        return screen;
    }

    image::imageops::crop_imm(&screen, x, y, width, height).to_image()
}
