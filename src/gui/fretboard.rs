use eframe::egui::{
    self,
    Align2,
    FontId,
    Pos2,
    Sense,
    Stroke,
    Vec2,
};

use crate::{
    core::fretboard::{
        ChordShape,
        FretboardGeometry,
        StringState,
        FRET_COUNT,
        STRING_NAMES,
    },
    gui::theme::FretboardColors,
};

const BOARD_WIDTH: f32 = 200.0;

/// Draws the strings, frets and finger markers for `shape`.
pub fn fretboard(ui: &mut egui::Ui, shape: Option<&ChordShape>, colors: &FretboardColors) {
    let height = ui.available_height().max(260.0);
    let (response, painter) = ui.allocate_painter(Vec2::new(BOARD_WIDTH, height), Sense::hover());
    let rect = response.rect;
    let geometry = FretboardGeometry::new(rect.width(), rect.height());
    let at = |x: f32, y: f32| Pos2::new(rect.left() + x, rect.top() + y);

    painter.rect_filled(rect, 6.0, colors.wood);

    let labels: Vec<&str> = match shape {
        Some(shape) => shape.strings.iter().map(|(name, _)| *name).collect(),
        None => STRING_NAMES.to_vec(),
    };

    for (index, name) in labels.iter().enumerate() {
        let x = geometry.string_x(index);
        painter.text(
            at(x, geometry.top - 10.0),
            Align2::CENTER_BOTTOM,
            *name,
            FontId::proportional(16.0),
            colors.label,
        );
        painter.line_segment(
            [at(x, geometry.top), at(x, geometry.bottom)],
            Stroke::new(3.0, colors.string),
        );
    }

    for fret in 0..=FRET_COUNT {
        let y = geometry.fret_y(fret);
        let width = if fret == 0 { 3.0 } else { 1.0 };
        painter.line_segment(
            [at(geometry.left, y), at(geometry.right(), y)],
            Stroke::new(width, colors.fret),
        );
    }

    let Some(shape) = shape else {
        return;
    };

    for (index, (_, state)) in shape.strings.iter().enumerate() {
        let x = geometry.string_x(index);
        let symbol = match state {
            StringState::Open => "○",
            StringState::Muted => "×",
            StringState::Fretted { .. } => continue,
        };
        painter.text(
            at(x, geometry.top - 28.0),
            Align2::CENTER_BOTTOM,
            symbol,
            FontId::proportional(12.0),
            colors.label,
        );
    }

    for (index, fret, label) in shape.fretted() {
        let (x, y) = geometry.marker_center(index, fret);
        painter.circle_filled(at(x, y), FretboardGeometry::MARKER_RADIUS, colors.marker);
        painter.text(
            at(x, y),
            Align2::CENTER_CENTER,
            label,
            FontId::proportional(11.0),
            colors.marker_text,
        );
    }
}
