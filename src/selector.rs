// Region selector: a fullscreen translucent overlay where the user drags a
// rectangle with the primary mouse button. Blocks until the drag is released
// or the overlay is dismissed.

use anyhow::{anyhow, Result};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Overlay fill opacity, out of 255 (about 30%).
const OVERLAY_ALPHA: u8 = 77;
const OUTLINE_WIDTH: f32 = 2.0;

/// A pixel rectangle in screen coordinates.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// Axis-aligned bounding box of two corners, in whichever order the
    /// drag produced them.
    pub fn from_corners(a: (u32, u32), b: (u32, u32)) -> Self {
        Region {
            x: a.0.min(b.0),
            y: a.1.min(b.1),
            width: a.0.abs_diff(b.0),
            height: a.1.abs_diff(b.1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

/// Press/drag/release bookkeeping for a single selection.
#[derive(Debug, Default)]
pub struct DragState {
    start: Option<(u32, u32)>,
    current: Option<(u32, u32)>,
    finished: Option<Region>,
}

impl DragState {
    pub fn press(&mut self, at: (u32, u32)) {
        self.start = Some(at);
        self.current = Some(at);
        self.finished = None;
    }

    /// Ignored unless a press is in progress.
    pub fn drag(&mut self, to: (u32, u32)) {
        if self.start.is_some() {
            self.current = Some(to);
        }
    }

    /// Completes the gesture. Returns `None` if there was no press.
    pub fn release(&mut self, at: (u32, u32)) -> Option<Region> {
        let start = self.start.take()?;
        self.current = None;
        let region = Region::from_corners(start, at);
        self.finished = Some(region);
        Some(region)
    }

    /// Rectangle to draw while the button is held.
    pub fn outline(&self) -> Option<Region> {
        match (self.start, self.current) {
            (Some(s), Some(c)) => Some(Region::from_corners(s, c)),
            _ => None,
        }
    }

    pub fn finished(&self) -> Option<Region> {
        self.finished
    }
}

/// Convert a pointer position in logical points to physical pixels.
pub fn to_pixels(pos: egui::Pos2, pixels_per_point: f32) -> (u32, u32) {
    let scale = |v: f32| (v * pixels_per_point).round().max(0.0) as u32;
    (scale(pos.x), scale(pos.y))
}

struct Overlay {
    state: DragState,
    result: Rc<RefCell<Option<Region>>>,
}

impl Overlay {
    fn close(&self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

impl eframe::App for Overlay {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            log::debug!("Region selection cancelled");
            self.close(ctx);
            return;
        }

        let ppp = ctx.pixels_per_point();
        let (pressed, down, released, pos) = ctx.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });

        if let Some(pos) = pos {
            let px = to_pixels(pos, ppp);
            // press and release can land in the same frame on a quick click
            if pressed {
                self.state.press(px);
            } else if down {
                self.state.drag(px);
            }
            if released {
                if let Some(region) = self.state.release(px) {
                    log::debug!("Drag released, region {}", region);
                    *self.result.borrow_mut() = Some(region);
                    self.close(ctx);
                }
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(egui::Color32::from_black_alpha(OVERLAY_ALPHA)))
            .show(ctx, |ui| {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
                if let Some(r) = self.state.outline() {
                    let rect = egui::Rect::from_min_size(
                        egui::pos2(r.x as f32 / ppp, r.y as f32 / ppp),
                        egui::vec2(r.width as f32 / ppp, r.height as f32 / ppp),
                    );
                    ui.painter().rect_stroke(
                        rect,
                        0.0,
                        egui::Stroke::new(OUTLINE_WIDTH, egui::Color32::RED),
                    );
                }
            });

        if self.state.outline().is_some() {
            ctx.request_repaint();
        }
    }
}

/// Show the overlay and wait for one drag. Returns `None` when the overlay
/// is closed (window close or Escape) before a drag completes.
pub fn select_region() -> Result<Option<Region>> {
    let result = Rc::new(RefCell::new(None));
    let app = Overlay {
        state: DragState::default(),
        result: Rc::clone(&result),
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Select region")
            .with_fullscreen(true)
            .with_decorations(false)
            .with_transparent(true)
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native("Select region", options, Box::new(move |_cc| Ok(Box::new(app))))
        .map_err(|e| anyhow!("Region overlay error: {e}"))?;

    let region = *result.borrow();
    Ok(region)
}
