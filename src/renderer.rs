use tracing::info;

use crate::body::System;
use crate::canvas::{Canvas, DrawCommand, RecordingCanvas};
use crate::fonts::TextMeasure;
use crate::label::PlanetLabel;
use crate::svg::SvgCanvas;
use crate::theme::MapStyle;

/// Draws one system: every body as a disk, then a label for every body that
/// carries a planet. Labels go on top so no disk hides a name.
pub struct Renderer<'a, M: TextMeasure> {
    style: &'a MapStyle,
    measure: M,
    zoom: f64,
}

impl<'a, M: TextMeasure> Renderer<'a, M> {
    pub fn new(style: &'a MapStyle, measure: M, zoom: f64) -> Self {
        Self {
            style,
            measure,
            zoom,
        }
    }

    /// Build the label for every planet in `system`, in declaration order.
    pub fn labels(&mut self, system: &System) -> Vec<PlanetLabel> {
        system
            .objects
            .iter()
            .filter(|object| object.planet.is_some())
            .map(|object| {
                PlanetLabel::new(
                    object.position - system.center,
                    object,
                    Some(system),
                    self.zoom,
                    &mut self.measure,
                )
            })
            .collect()
    }

    /// Issue every draw call for `system`. Returns the number of labels drawn.
    pub fn draw<C: Canvas + ?Sized>(&mut self, system: &System, canvas: &mut C) -> usize {
        for object in &system.objects {
            let center = (object.position - system.center) * self.zoom;
            let fill = if object.planet.is_some() {
                self.style.body_color
            } else {
                self.style.star_color
            };
            canvas.draw_disk(center, object.radius * self.zoom, fill);
        }

        let labels = self.labels(system);
        for label in &labels {
            label.draw(canvas, &mut self.measure);
        }

        info!(
            system = %system.name,
            bodies = system.objects.len(),
            labels = labels.len(),
            zoom = self.zoom,
            "rendered system map"
        );
        labels.len()
    }

    pub fn render_svg(&mut self, system: &System) -> String {
        let mut canvas = SvgCanvas::new(self.style.font_family.clone());
        self.draw(system, &mut canvas);
        canvas.finish(
            self.style.width,
            self.style.height,
            self.style.background_color,
        )
    }

    pub fn render_commands(&mut self, system: &System) -> Vec<DrawCommand> {
        let mut canvas = RecordingCanvas::new();
        self.draw(system, &mut canvas);
        canvas.into_commands()
    }
}

/// Draw `system` as an SVG document in one call.
pub fn render_system<M: TextMeasure>(
    system: &System,
    style: &MapStyle,
    zoom: f64,
    measure: M,
) -> String {
    Renderer::new(style, measure, zoom).render_svg(system)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Renderer, render_system};
    use crate::body::{Government, Planet, StellarObject, System};
    use crate::canvas::DrawCommand;
    use crate::color::Color;
    use crate::fonts::ApproxMeasure;
    use crate::geometry::Point;
    use crate::theme::MapStyle;

    fn system() -> System {
        let republic = Arc::new(Government::new("Republic", Color::opaque(0.3, 0.5, 0.9), false));
        let mut system = System::new(
            "Sol",
            vec![
                StellarObject::new(Point::new(0.0, 0.0), 60.0),
                StellarObject::new(Point::new(200.0, 0.0), 12.0)
                    .with_planet(Planet::new("Earth").governed_by(republic)),
                StellarObject::new(Point::new(-260.0, 90.0), 8.0)
                    .with_planet(Planet::new("Mars").landing(false)),
            ],
        );
        system.center = Point::new(20.0, 0.0);
        system
    }

    #[test]
    fn disks_come_before_labels() {
        let style = MapStyle::default();
        let mut renderer = Renderer::new(&style, ApproxMeasure, 1.0);
        let commands = renderer.render_commands(&system());

        let first_label = commands
            .iter()
            .position(|c| !matches!(c, DrawCommand::Disk { .. }))
            .expect("labels drawn");
        assert_eq!(first_label, 3);
        assert!(
            commands[first_label..]
                .iter()
                .all(|c| !matches!(c, DrawCommand::Disk { .. }))
        );
    }

    #[test]
    fn only_planets_get_labels() {
        let style = MapStyle::default();
        let mut renderer = Renderer::new(&style, ApproxMeasure, 1.0);
        let labels = renderer.labels(&system());
        let names: Vec<_> = labels.iter().map(|l| l.name().to_string()).collect();
        assert_eq!(names, ["Earth", "Mars"]);
    }

    #[test]
    fn bodies_are_placed_relative_to_the_view_center() {
        let style = MapStyle::default();
        let mut renderer = Renderer::new(&style, ApproxMeasure, 2.0);
        let commands = renderer.render_commands(&system());

        match &commands[1] {
            DrawCommand::Disk { center, radius, color } => {
                assert_eq!(*center, Point::new(360.0, 0.0));
                assert_eq!(*radius, 24.0);
                assert_eq!(*color, style.body_color);
            }
            other => panic!("expected a disk, got {other:?}"),
        }
        match &commands[0] {
            DrawCommand::Disk { color, .. } => assert_eq!(*color, style.star_color),
            other => panic!("expected a disk, got {other:?}"),
        }
    }

    #[test]
    fn svg_output_names_every_planet() {
        let style = MapStyle::default();
        let mut renderer = Renderer::new(&style, ApproxMeasure, 1.0);
        let svg = renderer.render_svg(&system());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(">Earth</text>"));
        assert!(svg.contains(">(Republic)</text>"));
        assert!(svg.contains(">Mars</text>"));
        assert!(svg.contains(">(No government)</text>"));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn render_system_matches_the_renderer() {
        let style = MapStyle::default();
        let system = system();
        let direct = Renderer::new(&style, ApproxMeasure, 1.5).render_svg(&system);
        assert_eq!(render_system(&system, &style, 1.5, ApproxMeasure), direct);
    }
}
