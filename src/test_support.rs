use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use eframe::egui::{Pos2, Rect, Vec2};

use crate::layout::TextMeasure;
use crate::render::{DrawSurface, LineKind, TextKind};

pub fn temp_path(name: &str) -> PathBuf {
    let now_ns = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "mindmap_view_{}_{}_{name}",
        std::process::id(),
        now_ns
    ))
}

/// Every character is `char_width` wide regardless of font size.
#[derive(Clone, Copy, Debug)]
pub struct FixedWidthMeasure {
    pub char_width: f32,
}

impl FixedWidthMeasure {
    pub fn new(char_width: f32) -> Self {
        Self { char_width }
    }
}

impl TextMeasure for FixedWidthMeasure {
    fn text_width(&self, text: &str, _font_size: f32) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    SetTransform { scale: f32, translate: Vec2 },
    Clear(Rect),
    Line { from: Pos2, to: Pos2, kind: LineKind },
    Text { text: String, top_left: Pos2, kind: TextKind },
    Curve { points: [Pos2; 4], kind: LineKind },
}

/// Surface that records calls instead of drawing.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    pub size: Vec2,
    pub measure: FixedWidthMeasure,
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(size: Vec2, char_width: f32) -> Self {
        Self {
            size,
            measure: FixedWidthMeasure::new(char_width),
            calls: Vec::new(),
        }
    }

    pub fn texts(&self, wanted: TextKind) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::Text { text, kind, .. } if *kind == wanted => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
}

impl TextMeasure for RecordingSurface {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.measure.text_width(text, font_size)
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn set_transform(&mut self, scale: f32, translate: Vec2) {
        self.calls.push(DrawCall::SetTransform { scale, translate });
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.calls.push(DrawCall::Clear(rect));
    }

    fn draw_line(&mut self, from: Pos2, to: Pos2, kind: LineKind) {
        self.calls.push(DrawCall::Line { from, to, kind });
    }

    fn draw_text(&mut self, text: &str, top_left: Pos2, _font_size: f32, kind: TextKind) {
        self.calls.push(DrawCall::Text {
            text: text.to_owned(),
            top_left,
            kind,
        });
    }

    fn draw_curve(&mut self, points: [Pos2; 4], kind: LineKind) {
        self.calls.push(DrawCall::Curve { points, kind });
    }
}
