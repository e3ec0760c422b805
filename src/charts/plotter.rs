//! Chart Plotter Module
//! Pie and donut geometry shared by the dashboard and the PNG exporter,
//! plus interactive drawing with the egui painter.

use crate::data::{BrandRanking, EventTypeCounts};
use egui::{Align2, Color32, FontId, Pos2, Sense, Shape, Stroke, Vec2};
use std::f64::consts::{PI, TAU};

/// Slice colors, in slice order
pub const PALETTE: [(u8, u8, u8); 10] = [
    (52, 152, 219),  // Blue
    (231, 76, 60),   // Red
    (46, 204, 113),  // Green
    (155, 89, 182),  // Purple
    (243, 156, 18),  // Orange
    (26, 188, 156),  // Teal
    (233, 30, 99),   // Pink
    (0, 188, 212),   // Cyan
    (121, 85, 72),   // Brown
    (96, 125, 139),  // Blue Grey
];

/// Slices thinner than this get no inline annotation.
const MIN_LABEL_FRACTION: f64 = 0.04;

/// Angular resolution used when tessellating arcs.
const ARC_STEP: f64 = PI / 90.0;

pub fn slice_rgb(index: usize) -> (u8, u8, u8) {
    PALETTE[index % PALETTE.len()]
}

pub fn slice_color(index: usize) -> Color32 {
    let (r, g, b) = slice_rgb(index);
    Color32::from_rgb(r, g, b)
}

/// One wedge of a pie. Angles are radians clockwise from 12 o'clock.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: u64,
    pub fraction: f64,
    pub start: f64,
    pub end: f64,
}

impl PieSlice {
    pub fn mid_angle(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn percent(&self) -> f64 {
        self.fraction * 100.0
    }

    /// "percent+label" annotation drawn on the slice
    pub fn annotation(&self) -> String {
        format!("{}\n{:.1}%", self.label, self.percent())
    }

    pub fn has_room_for_label(&self) -> bool {
        self.fraction >= MIN_LABEL_FRACTION
    }
}

/// A named pie (or donut when `hole > 0`).
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub name: String,
    pub slices: Vec<PieSlice>,
    /// Inner radius as a fraction of the outer radius
    pub hole: f64,
}

impl PieChart {
    pub fn new(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (String, u64)>,
        hole: f64,
    ) -> Self {
        let entries: Vec<(String, u64)> = entries.into_iter().filter(|(_, v)| *v > 0).collect();
        let total: u64 = entries.iter().map(|(_, v)| v).sum();

        let mut start = 0.0;
        let slices = entries
            .into_iter()
            .map(|(label, value)| {
                let fraction = value as f64 / total as f64;
                let end = start + fraction * TAU;
                let slice = PieSlice {
                    label,
                    value,
                    fraction,
                    start,
                    end,
                };
                start = end;
                slice
            })
            .collect();

        Self {
            name: name.into(),
            slices,
            hole: hole.clamp(0.0, 0.9),
        }
    }

    /// Event-type distribution, largest slice first.
    pub fn from_event_types(counts: &EventTypeCounts) -> Self {
        Self::new("Event type", counts.ranked(), 0.0)
    }

    pub fn from_ranking(name: impl Into<String>, ranking: &BrandRanking, hole: f64) -> Self {
        Self::new(
            name,
            ranking
                .entries()
                .iter()
                .map(|e| (e.brand.clone(), e.count)),
            hole,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }

    /// Index of the slice under an offset from the center, if any.
    pub fn slice_at(&self, dx: f64, dy: f64, radius: f64) -> Option<usize> {
        let dist = dx.hypot(dy);
        if dist > radius || dist < radius * self.hole {
            return None;
        }
        let angle = angle_of(dx, dy);
        self.slices
            .iter()
            .position(|s| angle >= s.start && angle < s.end)
            .or_else(|| {
                // the last slice closes at exactly TAU
                (angle >= TAU - f64::EPSILON).then(|| self.slices.len().saturating_sub(1))
            })
    }

    /// Where to anchor a slice's annotation, as an offset from the center.
    pub fn label_offset(&self, slice: &PieSlice, radius: f64) -> (f64, f64) {
        let r = if self.hole > 0.0 {
            radius * (1.0 + self.hole) / 2.0
        } else {
            radius * 0.62
        };
        polar(r, slice.mid_angle())
    }
}

/// Offset of a point at `radius` and `angle` (clockwise from 12 o'clock),
/// in screen coordinates with y pointing down.
pub fn polar(radius: f64, angle: f64) -> (f64, f64) {
    (radius * angle.sin(), -radius * angle.cos())
}

/// Inverse of `polar`, normalized to `[0, TAU)`.
pub fn angle_of(dx: f64, dy: f64) -> f64 {
    let angle = dx.atan2(-dy);
    if angle < 0.0 {
        angle + TAU
    } else {
        angle
    }
}

/// Angles splitting `start..end` into steps no wider than `ARC_STEP`.
pub fn arc_angles(start: f64, end: f64) -> Vec<f64> {
    let steps = (((end - start) / ARC_STEP).ceil() as usize).max(1);
    (0..=steps)
        .map(|i| start + (end - start) * i as f64 / steps as f64)
        .collect()
}

/// Convex pieces (triangles for pies, quads for donuts) covering one slice.
pub fn slice_polygons(slice: &PieSlice, radius: f64, hole: f64) -> Vec<Vec<(f64, f64)>> {
    let inner = radius * hole;
    let angles = arc_angles(slice.start, slice.end);
    angles
        .windows(2)
        .map(|w| {
            let outer_a = polar(radius, w[0]);
            let outer_b = polar(radius, w[1]);
            if inner > 0.0 {
                vec![polar(inner, w[0]), outer_a, outer_b, polar(inner, w[1])]
            } else {
                vec![(0.0, 0.0), outer_a, outer_b]
            }
        })
        .collect()
}

/// Draws pies and donuts with the egui painter.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw a pie chart in a square of side `size`, with hover details.
    pub fn draw_pie(ui: &mut egui::Ui, chart: &PieChart, size: f32) {
        let (response, painter) = ui.allocate_painter(Vec2::splat(size), Sense::hover());
        let center = response.rect.center();
        let radius = (size / 2.0 - 4.0).max(1.0) as f64;

        if chart.is_empty() {
            painter.circle_stroke(
                center,
                radius as f32,
                Stroke::new(1.0, ui.visuals().weak_text_color()),
            );
            painter.text(
                center,
                Align2::CENTER_CENTER,
                "No data",
                FontId::proportional(14.0),
                ui.visuals().weak_text_color(),
            );
            return;
        }

        let hovered = response.hover_pos().and_then(|pos| {
            chart.slice_at((pos.x - center.x) as f64, (pos.y - center.y) as f64, radius)
        });

        for (i, slice) in chart.slices.iter().enumerate() {
            let mut color = slice_color(i);
            if hovered == Some(i) {
                color = color.gamma_multiply(0.8);
            }
            for piece in slice_polygons(slice, radius, chart.hole) {
                let points: Vec<Pos2> = piece
                    .into_iter()
                    .map(|(x, y)| Pos2::new(center.x + x as f32, center.y + y as f32))
                    .collect();
                painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
            }
        }

        for slice in chart.slices.iter().filter(|s| s.has_room_for_label()) {
            let (x, y) = chart.label_offset(slice, radius);
            painter.text(
                Pos2::new(center.x + x as f32, center.y + y as f32),
                Align2::CENTER_CENTER,
                slice.annotation(),
                FontId::proportional(11.0),
                Color32::WHITE,
            );
        }

        if let Some(i) = hovered {
            let slice = &chart.slices[i];
            response.on_hover_ui_at_pointer(|ui| {
                ui.label(egui::RichText::new(&slice.label).strong());
                ui.label(format!("{:.1}%", slice.percent()));
                ui.label(&chart.name);
            });
        }
    }

    /// Color legend, one row per slice
    pub fn draw_legend(ui: &mut egui::Ui, chart: &PieChart) {
        for (i, slice) in chart.slices.iter().enumerate() {
            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, slice_color(i));
                ui.label(egui::RichText::new(&slice.label).size(12.0));
                ui.label(
                    egui::RichText::new(format!("{}", slice.value))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::BrandCount;

    fn chart(values: &[u64], hole: f64) -> PieChart {
        PieChart::new(
            "test",
            values
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("s{}", i), *v)),
            hole,
        )
    }

    #[test]
    fn slices_cover_full_circle() {
        let pie = chart(&[3, 1], 0.0);
        assert_eq!(pie.slices.len(), 2);
        assert!((pie.slices[0].fraction - 0.75).abs() < 1e-9);
        assert!((pie.slices[1].end - TAU).abs() < 1e-9);
        assert_eq!(pie.total(), 4);
    }

    #[test]
    fn zero_values_are_dropped() {
        let pie = chart(&[0, 5, 0], 0.0);
        assert_eq!(pie.slices.len(), 1);
        assert_eq!(pie.slices[0].label, "s1");
        assert!(chart(&[], 0.4).is_empty());
    }

    #[test]
    fn hit_test_follows_clockwise_order() {
        // s0 covers the right half, s1 the left half
        let pie = chart(&[1, 1], 0.0);
        assert_eq!(pie.slice_at(10.0, 0.0, 50.0), Some(0));
        assert_eq!(pie.slice_at(-10.0, 0.0, 50.0), Some(1));
        assert_eq!(pie.slice_at(80.0, 0.0, 50.0), None);
    }

    #[test]
    fn donut_hole_is_not_a_slice() {
        let pie = chart(&[1, 1], 0.4);
        assert_eq!(pie.slice_at(10.0, 0.0, 50.0), None);
        assert_eq!(pie.slice_at(30.0, 0.0, 50.0), Some(0));
    }

    #[test]
    fn polar_and_angle_of_agree() {
        for angle in [0.0, 0.5, PI, 4.0, 6.0] {
            let (x, y) = polar(1.0, angle);
            assert!((angle_of(x, y) - angle).abs() < 1e-9);
        }
    }

    #[test]
    fn donut_pieces_are_quads() {
        let pie = chart(&[1], 0.4);
        let pieces = slice_polygons(&pie.slices[0], 100.0, pie.hole);
        assert!(pieces.len() >= 180);
        assert!(pieces.iter().all(|p| p.len() == 4));
    }

    #[test]
    fn ranking_keeps_order_and_labels() {
        let ranking: BrandRanking = [BrandCount::new("samsung", 30), BrandCount::new("apple", 10)]
            .into_iter()
            .collect();
        let pie = PieChart::from_ranking("Purchased", &ranking, 0.4);
        assert_eq!(pie.slices[0].annotation(), "samsung\n75.0%");
        assert_eq!(pie.name, "Purchased");
    }
}
