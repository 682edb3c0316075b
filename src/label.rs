//! Planet labels: ring markers, a connector line, the planet's name and
//! government, and warning barbs for planets that refuse landing.
//!
//! A [`PlanetLabel`] is built once per frame. Construction picks which of
//! four headings the connector leaves the planet along, so that the text
//! block does not run over a neighbouring body; drawing replays the stored
//! result as many times as needed.

use std::f64::consts::PI;
use std::ptr;

use tracing::debug;

use crate::body::{Planet, StellarObject, System};
use crate::canvas::Canvas;
use crate::color::Color;
use crate::fonts::{FontSize, TextMeasure};
use crate::geometry::{Angle, Point};

/// Candidate connector headings, in the order they are tried.
pub const LINE_ANGLE: [f64; 4] = [60.0, 120.0, 300.0, 240.0];
const LINE_LENGTH: f64 = 60.0;
const INNER_SPACE: f64 = 10.0;
const LINE_GAP: f64 = 1.7;
const GAP: f64 = 6.0;
const MIN_DISTANCE: f64 = 30.0;
const TEXT_PADDING: f64 = 8.0;

const BARB_START: f64 = 36.0;
const BARB_SPREAD: f64 = 800.0;
const BARB_DISTANCE: f64 = 25.0;
const BARB_SIZE: f64 = 15.0;

const WORMHOLE_TINT: Color = Color::opaque(0.8, 0.3, 1.0);
const UNGOVERNED_TINT: Color = Color::opaque(0.3, 0.3, 0.3);
const NO_GOVERNMENT: &str = "(No government)";

/// Opacity of the label tint for a body `distance` from the view origin.
pub fn color_alpha(distance: f64, radius: f64, zoom: f64) -> f32 {
    let alpha = 0.6 - (distance - radius) * 0.001 * zoom;
    if alpha.is_nan() {
        return 0.0;
    }
    alpha.clamp(0.0, 0.5) as f32
}

/// Opacity of the text halo for a body `distance` from the view origin.
pub fn shadow_alpha(distance: f64, radius: f64) -> f32 {
    let alpha = 1.0 - (distance - radius) * 0.00166;
    if alpha.is_nan() {
        return 0.0;
    }
    alpha.clamp(0.0, 0.833) as f32
}

/// Headings of the inner and outer ring ends. The outer ring is cut short
/// so that its arc ends `GAP` units before the inner one.
pub fn ring_angles(direction: usize, radius: f64) -> (Angle, Angle) {
    let inner = LINE_ANGLE[direction.min(LINE_ANGLE.len() - 1)];
    let shrink = 360.0 * GAP / (2.0 * PI * radius);
    let outer = if radius > 0.0 && shrink.is_finite() {
        inner - shrink
    } else {
        inner
    };
    (Angle::new(inner), Angle::new(outer))
}

/// The horizontal run a label's text block would cover when its connector
/// leaves along a given heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub start: Point,
    /// `(1, 0)` for headings on the right half, `(-1, 0)` on the left.
    pub unit: Point,
    pub width: f64,
}

impl Footprint {
    pub fn new(body: Point, radius: f64, angle: Angle, width: f64) -> Self {
        let start = body + (radius + INNER_SPACE + LINE_GAP + LINE_LENGTH) * angle.unit();
        let sign = if angle.degrees() > 180.0 { -1.0 } else { 1.0 };
        Self {
            start,
            unit: Point::new(sign, 0.0),
            width,
        }
    }

    pub fn end(&self) -> Point {
        self.start + self.unit * self.width
    }

    /// Whether a body at `center` comes closer than `min_distance` to either
    /// end of the run, or to any point in between.
    pub fn overlaps(&self, center: Point, min_distance: f64) -> bool {
        let start_distance = center.distance(self.start);
        let end_distance = center.distance(self.end());
        if start_distance < min_distance || end_distance < min_distance {
            return true;
        }

        let projection = (center - self.start).dot(self.unit);
        if projection > 0.0 && projection < self.width {
            // Rounding can push the radicand slightly negative for a center
            // sitting on the line.
            let squared = (start_distance * start_distance - projection * projection).max(0.0);
            return squared.sqrt() < min_distance;
        }
        false
    }
}

/// Where the connector and the two text lines go for a named label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextAnchors {
    pub line_from: Point,
    pub line_to: Point,
    pub name: Point,
    pub government: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanetLabel {
    position: Point,
    radius: f64,
    name: String,
    government: String,
    color: Color,
    shadow: Color,
    direction: usize,
    hostility: u32,
}

impl PlanetLabel {
    /// Build the label for `object`, drawn at `position` (relative to the
    /// view origin, before zoom).
    ///
    /// With a `system`, the first heading whose text block clears every
    /// other body in it is chosen; if none does, the last heading tried is
    /// kept. Without one, the label keeps the first heading.
    pub fn new<M: TextMeasure + ?Sized>(
        position: Point,
        object: &StellarObject,
        system: Option<&System>,
        zoom: f64,
        fonts: &mut M,
    ) -> Self {
        let position = position * zoom;
        let radius = object.radius * zoom;
        let planet = object.planet.as_ref();

        let name = planet.map(|p| p.name.clone()).unwrap_or_default();
        let (tint, government, hostility) = tint(planet);

        let distance = position.length();
        let alpha = color_alpha(distance, radius, zoom);
        let color = tint.faded(alpha, 0.0);
        let shadow = Color::new(0.0, 0.0, 0.0, shadow_alpha(distance, radius));

        let direction = match system {
            Some(system) => {
                let width = fonts
                    .width(&name, FontSize::Large)
                    .max(fonts.width(&government, FontSize::Small))
                    + TEXT_PADDING;
                choose_direction(object, system, radius, width)
            }
            None => 0,
        };

        Self {
            position,
            radius,
            name,
            government,
            color,
            shadow,
            direction,
            hostility,
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn government(&self) -> &str {
        &self.government
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn shadow(&self) -> Color {
        self.shadow
    }

    /// Index into [`LINE_ANGLE`].
    pub fn direction(&self) -> usize {
        self.direction
    }

    /// Number of warning barbs drawn around the rings.
    pub fn hostility(&self) -> u32 {
        self.hostility
    }

    pub fn inner_angle(&self) -> Angle {
        ring_angles(self.direction, self.radius).0
    }

    pub fn outer_angle(&self) -> Angle {
        ring_angles(self.direction, self.radius).1
    }

    /// Connector and text positions, or `None` for an unnamed body.
    pub fn text_anchors<M: TextMeasure + ?Sized>(&self, fonts: &mut M) -> Option<TextAnchors> {
        if self.name.is_empty() {
            return None;
        }

        let unit = self.inner_angle().unit();
        let line_from = self.position + (self.radius + INNER_SPACE + LINE_GAP) * unit;
        let line_to = line_from + LINE_LENGTH * unit;
        let big_height = fonts.height(FontSize::Large);
        let right_side = self.direction < 2;

        let name_x = if right_side {
            line_to.x + 2.0
        } else {
            line_to.x - fonts.width(&self.name, FontSize::Large) - 2.0
        };
        let government_x = if right_side {
            line_to.x + 4.0
        } else {
            line_to.x - fonts.width(&self.government, FontSize::Small) - 4.0
        };

        Some(TextAnchors {
            line_from,
            line_to,
            name: Point::new(name_x, line_to.y - 0.5 * big_height),
            government: Point::new(government_x, line_to.y + 0.5 * big_height + 1.0),
        })
    }

    /// Headings of the warning barbs, one per point of hostility.
    pub fn barb_angles(&self) -> Vec<Angle> {
        let step = Angle::new(BARB_SPREAD / (self.radius + BARB_DISTANCE));
        let mut angle = self.inner_angle() + Angle::new(BARB_START);
        (0..self.hostility)
            .map(|_| {
                angle += step;
                angle
            })
            .collect()
    }

    pub fn draw<C, M>(&self, canvas: &mut C, fonts: &mut M)
    where
        C: Canvas + ?Sized,
        M: TextMeasure + ?Sized,
    {
        let (inner, outer) = ring_angles(self.direction, self.radius);
        canvas.draw_ring(
            self.position,
            self.radius + INNER_SPACE,
            2.3,
            0.9,
            self.color,
            Angle::new(0.0),
            inner,
        );
        canvas.draw_ring(
            self.position,
            self.radius + INNER_SPACE + GAP,
            1.3,
            0.6,
            self.color,
            Angle::new(0.0),
            outer,
        );

        if let Some(anchors) = self.text_anchors(fonts) {
            canvas.draw_line(anchors.line_from, anchors.line_to, 1.3, self.color);

            canvas.draw_text(&self.name, FontSize::Large, anchors.name, self.shadow);
            canvas.draw_text(&self.name, FontSize::Large, anchors.name, self.color);

            canvas.draw_text(
                &self.government,
                FontSize::Small,
                anchors.government,
                self.shadow,
            );
            canvas.draw_text(
                &self.government,
                FontSize::Small,
                anchors.government,
                self.color,
            );
        }

        for angle in self.barb_angles() {
            canvas.draw_pointer(
                self.position,
                angle.unit(),
                BARB_SIZE,
                BARB_SIZE,
                self.radius + BARB_DISTANCE,
                self.color,
            );
        }
    }
}

/// Base tint, government line and barb count for a planet.
fn tint(planet: Option<&Planet>) -> (Color, String, u32) {
    let Some(planet) = planet else {
        return (UNGOVERNED_TINT, NO_GOVERNMENT.to_string(), 0);
    };

    if planet.wormhole {
        return (WORMHOLE_TINT, String::new(), 0);
    }

    match &planet.government {
        Some(government) => {
            let base = government.color;
            let color = Color::opaque(base.r * 0.5 + 0.3, base.g * 0.5 + 0.3, base.b * 0.5 + 0.3);
            let hostility = if planet.can_land {
                0
            } else {
                3 + 2 * u32::from(government.hostile)
            };
            (color, format!("({})", government.name), hostility)
        }
        None => (UNGOVERNED_TINT, NO_GOVERNMENT.to_string(), 0),
    }
}

/// Try each heading in order and keep the first whose footprint clears
/// every other body in the system. Falls back to the last heading tried.
fn choose_direction(object: &StellarObject, system: &System, radius: f64, width: f64) -> usize {
    let mut direction = 0;
    for (d, &degrees) in LINE_ANGLE.iter().enumerate() {
        direction = d;
        let footprint = Footprint::new(object.position, radius, Angle::new(degrees), width);

        let blocker = system
            .objects
            .iter()
            .filter(|other| !ptr::eq(*other, object))
            .position(|other| footprint.overlaps(other.position, other.radius + MIN_DISTANCE));

        match blocker {
            None => {
                debug!(direction = d, angle = degrees, width, "label heading clear");
                return d;
            }
            Some(index) => {
                debug!(direction = d, angle = degrees, blocker = index, "label heading blocked");
            }
        }
    }
    debug!(direction, "every label heading blocked, keeping the last");
    direction
}
