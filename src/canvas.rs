use serde::Serialize;

use crate::color::Color;
use crate::fonts::FontSize;
use crate::geometry::{Angle, Point};

/// Primitive drawing services a map view provides.
pub trait Canvas {
    /// Stroke the part of a ring between two headings, clockwise from
    /// `start` to `end`. `fraction` is the solid share of the stroke.
    #[allow(clippy::too_many_arguments)]
    fn draw_ring(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        fraction: f64,
        color: Color,
        start: Angle,
        end: Angle,
    );

    fn draw_line(&mut self, from: Point, to: Point, width: f64, color: Color);

    /// A triangular pointer whose tip sits `offset` from `center` along
    /// `unit`, with its base `height` further out.
    fn draw_pointer(
        &mut self,
        center: Point,
        unit: Point,
        width: f64,
        height: f64,
        offset: f64,
        color: Color,
    );

    /// Draw `text` with the top-left corner of its box at `top_left`.
    fn draw_text(&mut self, text: &str, font: FontSize, top_left: Point, color: Color);

    fn draw_disk(&mut self, center: Point, radius: f64, color: Color);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn draw_ring(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        fraction: f64,
        color: Color,
        start: Angle,
        end: Angle,
    ) {
        (**self).draw_ring(center, radius, width, fraction, color, start, end)
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        (**self).draw_line(from, to, width, color)
    }

    fn draw_pointer(
        &mut self,
        center: Point,
        unit: Point,
        width: f64,
        height: f64,
        offset: f64,
        color: Color,
    ) {
        (**self).draw_pointer(center, unit, width, height, offset, color)
    }

    fn draw_text(&mut self, text: &str, font: FontSize, top_left: Point, color: Color) {
        (**self).draw_text(text, font, top_left, color)
    }

    fn draw_disk(&mut self, center: Point, radius: f64, color: Color) {
        (**self).draw_disk(center, radius, color)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    Ring {
        center: Point,
        radius: f64,
        width: f64,
        fraction: f64,
        color: Color,
        start: Angle,
        end: Angle,
    },
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
    Pointer {
        center: Point,
        unit: Point,
        width: f64,
        height: f64,
        offset: f64,
        color: Color,
    },
    Text {
        text: String,
        font: FontSize,
        top_left: Point,
        color: Color,
    },
    Disk {
        center: Point,
        radius: f64,
        color: Color,
    },
}

/// Keeps every call in order instead of drawing it.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl Canvas for RecordingCanvas {
    fn draw_ring(
        &mut self,
        center: Point,
        radius: f64,
        width: f64,
        fraction: f64,
        color: Color,
        start: Angle,
        end: Angle,
    ) {
        self.commands.push(DrawCommand::Ring {
            center,
            radius,
            width,
            fraction,
            color,
            start,
            end,
        });
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn draw_pointer(
        &mut self,
        center: Point,
        unit: Point,
        width: f64,
        height: f64,
        offset: f64,
        color: Color,
    ) {
        self.commands.push(DrawCommand::Pointer {
            center,
            unit,
            width,
            height,
            offset,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, font: FontSize, top_left: Point, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            font,
            top_left,
            color,
        });
    }

    fn draw_disk(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::Disk {
            center,
            radius,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{Canvas, DrawCommand, RecordingCanvas};
    use crate::color::Color;
    use crate::fonts::FontSize;
    use crate::geometry::Point;

    #[test]
    fn records_calls_in_order() {
        let mut canvas = RecordingCanvas::new();
        canvas.draw_disk(Point::default(), 5.0, Color::BLACK);
        canvas.draw_text("Sol", FontSize::Large, Point::new(1.0, 2.0), Color::BLACK);

        let commands = canvas.into_commands();
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], DrawCommand::Disk { .. }));
        assert!(matches!(&commands[1], DrawCommand::Text { text, .. } if text == "Sol"));
    }

    #[test]
    fn commands_serialize_with_kind_tag() {
        let command = DrawCommand::Line {
            from: Point::new(0.0, 0.0),
            to: Point::new(1.0, 1.0),
            width: 1.3,
            color: Color::BLACK,
        };
        let json = serde_json::to_value(&command).expect("serialize");
        assert_eq!(json["kind"], "line");
        assert_eq!(json["to"], serde_json::json!([1.0, 1.0]));
    }
}
