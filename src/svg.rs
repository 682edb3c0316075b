use std::fmt::Write as _;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::fonts::FontSize;
use crate::geometry::{Angle, Point};

/// XML 1.0 valid char ranges:
/// - 0x09, 0x0A, 0x0D
/// - 0x20..=0xD7FF
/// - 0xE000..=0xFFFD
/// - 0x10000..=0x10FFFF
fn is_valid_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x09 | 0x0A | 0x0D | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars().filter(|&c| is_valid_xml_char(c)) {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Paint attributes for a fill or stroke. Additive tints blend with
/// `screen`, everything else is drawn with its alpha as opacity.
fn paint(attr: &str, color: Color) -> String {
    if color.is_additive() {
        format!(
            r#"{attr}="{}" style="mix-blend-mode:screen""#,
            color.to_hex()
        )
    } else {
        format!(
            r#"{attr}="{}" {attr}-opacity="{:.3}""#,
            color.to_hex(),
            color.a.clamp(0.0, 1.0)
        )
    }
}

/// Builds an SVG document centred on the view origin.
pub struct SvgCanvas {
    font_family: String,
    content: String,
}

impl SvgCanvas {
    pub fn new(font_family: impl Into<String>) -> Self {
        Self {
            font_family: font_family.into(),
            content: String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Wrap everything drawn so far in an `<svg>` whose origin is the centre
    /// of a `width` x `height` view.
    pub fn finish(self, width: f64, height: f64, background: Color) -> String {
        let left = -width / 2.0;
        let top = -height / 2.0;
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{left} {top} {width} {height}" width="{width}" height="{height}"><rect x="{left}" y="{top}" width="{width}" height="{height}" fill="{}" />{}</svg>"#,
            background.to_hex(),
            self.content,
        )
    }
}

impl Canvas for SvgCanvas {
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
        let span = end.degrees() - start.degrees();
        if span.is_nan() || span <= 0.0 || radius <= 0.0 {
            return;
        }
        let stroke = paint("stroke", color);
        let opacity = fraction.clamp(0.0, 1.0);

        if span >= 360.0 {
            let _ = write!(
                self.content,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="none" {stroke} stroke-width="{:.2}" opacity="{opacity:.2}" />"#,
                center.x, center.y, radius, width,
            );
            return;
        }

        let from = center + radius * start.unit();
        let to = center + radius * end.unit();
        let large_arc = u8::from(span > 180.0);
        let _ = write!(
            self.content,
            r#"<path d="M {:.2} {:.2} A {:.2} {:.2} 0 {large_arc} 1 {:.2} {:.2}" fill="none" {stroke} stroke-width="{:.2}" opacity="{opacity:.2}" />"#,
            from.x, from.y, radius, radius, to.x, to.y, width,
        );
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        let _ = write!(
            self.content,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" {} stroke-width="{:.2}" />"#,
            from.x,
            from.y,
            to.x,
            to.y,
            paint("stroke", color),
            width,
        );
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
        let tip = center + unit * offset;
        let base = center + unit * (offset + height);
        let across = Point::new(-unit.y, unit.x) * (width / 2.0);
        let left = base + across;
        let right = base - across;
        let _ = write!(
            self.content,
            r#"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" {} />"#,
            tip.x,
            tip.y,
            left.x,
            left.y,
            right.x,
            right.y,
            paint("fill", color),
        );
    }

    fn draw_text(&mut self, text: &str, font: FontSize, top_left: Point, color: Color) {
        if text.is_empty() {
            return;
        }
        let _ = write!(
            self.content,
            r#"<text x="{:.2}" y="{:.2}" font-family="{}" font-size="{:.2}" dominant-baseline="hanging" {}>{}</text>"#,
            top_left.x,
            top_left.y,
            escape_xml(&self.font_family),
            font.px(),
            paint("fill", color),
            escape_xml(text),
        );
    }

    fn draw_disk(&mut self, center: Point, radius: f64, color: Color) {
        if radius <= 0.0 {
            return;
        }
        let _ = write!(
            self.content,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" {} />"#,
            center.x,
            center.y,
            radius,
            paint("fill", color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::{SvgCanvas, escape_xml};
    use crate::canvas::Canvas;
    use crate::color::Color;
    use crate::fonts::FontSize;
    use crate::geometry::{Angle, Point};

    #[test]
    fn remove_invalid_control_chars() {
        assert_eq!(escape_xml("A\u{0007}B\u{000C}C"), "ABC");
    }

    #[test]
    fn escape_special_xml_chars() {
        assert_eq!(
            escape_xml(r#"<Kor "Sestor" & 'Mereti'>"#),
            "&lt;Kor &quot;Sestor&quot; &amp; &apos;Mereti&apos;&gt;"
        );
    }

    #[test]
    fn finish_centres_the_view_box() {
        let svg = SvgCanvas::new("sans-serif").finish(200.0, 100.0, Color::BLACK);
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="-100 -50 200 100""#));
        assert!(svg.contains(r##"fill="#000000""##));
    }

    #[test]
    fn ring_arc_uses_large_arc_flag_past_half_turn() {
        let mut canvas = SvgCanvas::new("sans-serif");
        let color = Color::new(0.2, 0.2, 0.2, 0.0);
        canvas.draw_ring(Point::default(), 20.0, 2.3, 0.9, color, Angle::new(0.0), Angle::new(60.0));
        canvas.draw_ring(Point::default(), 20.0, 2.3, 0.9, color, Angle::new(0.0), Angle::new(300.0));
        let svg = canvas.finish(100.0, 100.0, Color::BLACK);

        assert!(svg.contains("A 20.00 20.00 0 0 1"));
        assert!(svg.contains("A 20.00 20.00 0 1 1"));
        assert!(svg.contains("mix-blend-mode:screen"));
    }

    #[test]
    fn empty_ring_span_draws_nothing() {
        let mut canvas = SvgCanvas::new("sans-serif");
        canvas.draw_ring(
            Point::default(),
            1.0,
            1.3,
            0.6,
            Color::BLACK,
            Angle::new(0.0),
            Angle::new(-40.0),
        );
        assert!(canvas.is_empty());
    }

    #[test]
    fn text_is_escaped_and_hangs_from_its_anchor() {
        let mut canvas = SvgCanvas::new("sans-serif");
        canvas.draw_text(
            "A&B",
            FontSize::Large,
            Point::new(1.0, 2.0),
            Color::new(0.0, 0.0, 0.0, 0.5),
        );
        let svg = canvas.finish(10.0, 10.0, Color::BLACK);
        assert!(svg.contains(r#"x="1.00" y="2.00""#));
        assert!(svg.contains(r#"font-size="18.00""#));
        assert!(svg.contains(r#"dominant-baseline="hanging""#));
        assert!(svg.contains(r#"fill-opacity="0.500""#));
        assert!(svg.contains(">A&amp;B</text>"));
    }

    #[test]
    fn pointer_tip_sits_at_offset() {
        let mut canvas = SvgCanvas::new("sans-serif");
        canvas.draw_pointer(
            Point::default(),
            Point::new(1.0, 0.0),
            15.0,
            15.0,
            40.0,
            Color::BLACK,
        );
        let svg = canvas.finish(10.0, 10.0, Color::BLACK);
        assert!(svg.contains(r#"points="40.00,0.00 55.00,7.50 55.00,-7.50""#));
    }
}
