// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page canvas: accumulates printpdf 0.8 operations for one page.
//
// printpdf 0.8 pages are plain `Vec<Op>` lists; these helpers wrap the
// handful of primitives the flow renderer draws.

use printpdf::{
    Color, Line, LinePoint, Op, PaintMode, Point, Polygon, PolygonRing, Pt, Rgb, TextItem,
    WindingOrder, XObjectId, XObjectTransform,
};

use super::metrics::Face;

/// Build an RGB colour from 0.0..=1.0 components.
pub fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Operation list of a single page.
#[derive(Default)]
pub struct Canvas {
    ops: Vec<Op>,
}

impl Canvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_ops(self) -> Vec<Op> {
        self.ops
    }

    /// Axis-aligned rectangle with optional fill and 1pt outline.
    pub fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Option<&Color>, stroke: Option<&Color>) {
        let mode = match (fill, stroke) {
            (Some(_), Some(_)) => PaintMode::FillStroke,
            (Some(_), None) => PaintMode::Fill,
            (None, Some(_)) => PaintMode::Stroke,
            (None, None) => return,
        };
        if let Some(col) = fill {
            self.ops.push(Op::SetFillColor { col: col.clone() });
        }
        if let Some(col) = stroke {
            self.ops.push(Op::SetOutlineColor { col: col.clone() });
            self.ops.push(Op::SetOutlineThickness { pt: Pt(1.0) });
        }
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing {
                    points: vec![
                        point(x, y),
                        point(x + w, y),
                        point(x + w, y + h),
                        point(x, y + h),
                    ],
                }],
                mode,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    /// Straight 1pt line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &Color) {
        self.ops.push(Op::SetOutlineColor { col: color.clone() });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(1.0) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: vec![point(x1, y1), point(x2, y2)],
                is_closed: false,
            },
        });
    }

    /// Single line of text with its baseline at `y`.
    pub fn text(&mut self, text: &str, x: f32, y: f32, size: f32, face: Face, color: &Color) {
        self.ops.push(Op::SetFillColor { col: color.clone() });
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        });
        self.ops.push(Op::SetFontSizeBuiltinFont {
            size: Pt(size),
            font: face.builtin(),
        });
        self.ops.push(Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font: face.builtin(),
        });
        self.ops.push(Op::EndTextSection);
    }

    /// Place an embedded image with its bottom-left corner at (`x`, `y`),
    /// stretched to `w` x `h` points.
    #[allow(clippy::too_many_arguments)]
    pub fn image(&mut self, id: &XObjectId, x: f32, y: f32, w: f32, h: f32, px_w: u32, px_h: u32) {
        // At 72 DPI one image pixel is one point before scaling.
        self.ops.push(Op::UseXobject {
            id: id.clone(),
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(y)),
                rotate: None,
                scale_x: Some(w / px_w.max(1) as f32),
                scale_y: Some(h / px_h.max(1) as f32),
                dpi: Some(72.0),
            },
        });
    }
}
