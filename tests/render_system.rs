use std::path::PathBuf;

use planet_labels::body::System;
use planet_labels::canvas::DrawCommand;
use planet_labels::fonts::{ApproxMeasure, FontSize, TextMeasure};
use planet_labels::geometry::Angle;
use planet_labels::label::{Footprint, LINE_ANGLE, PlanetLabel};
use planet_labels::renderer::Renderer;
use planet_labels::theme::MapStyle;

fn demo(name: &str) -> System {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name);
    System::load(&path).expect("demo system loads")
}

fn footprint_for(label: &PlanetLabel, body: &planet_labels::body::StellarObject, d: usize) -> Footprint {
    let mut fonts = ApproxMeasure;
    let width = fonts
        .width(label.name(), FontSize::Large)
        .max(fonts.width(label.government(), FontSize::Small))
        + 8.0;
    Footprint::new(body.position, label.radius(), Angle::new(LINE_ANGLE[d]), width)
}

#[test]
fn every_label_takes_the_first_clear_heading() {
    let system = demo("sol.toml");
    let style = MapStyle::default();
    let mut renderer = Renderer::new(&style, ApproxMeasure, 1.0);
    let labels = renderer.labels(&system);

    let bodies: Vec<_> = system.objects.iter().filter(|o| o.planet.is_some()).collect();
    assert_eq!(labels.len(), bodies.len());

    for (label, body) in labels.iter().zip(bodies) {
        let blocked = |d: usize| {
            let footprint = footprint_for(label, body, d);
            system
                .objects
                .iter()
                .filter(|other| !std::ptr::eq(*other, body))
                .any(|other| footprint.overlaps(other.position, other.radius + 30.0))
        };

        let chosen = label.direction();
        for earlier in 0..chosen {
            assert!(blocked(earlier), "{}: heading {earlier} was clear", label.name());
        }
        if chosen < LINE_ANGLE.len() - 1 {
            assert!(!blocked(chosen), "{}: heading {chosen} is blocked", label.name());
        }
    }
}

#[test]
fn crowded_moon_moves_its_planet_label() {
    let doc = r#"
name = "Crowded"

[[objects]]
position = [0.0, 0.0]
radius = 10.0
planet = { name = "Host" }

[[objects]]
position = [70.75, -40.85]
radius = 5.0
planet = { name = "Moon" }
"#;
    let system = System::from_toml(doc).expect("parse");
    let style = MapStyle::default();
    let mut renderer = Renderer::new(&style, ApproxMeasure, 1.0);
    let labels = renderer.labels(&system);

    assert_eq!(labels[0].name(), "Host");
    assert_eq!(labels[0].direction(), 1);
}

#[test]
fn demo_systems_render_to_svg() {
    let style = MapStyle::from_builtin("chart").expect("style");
    for (file, names) in [
        ("sol.toml", &["Earth", "Luna", "Mars", "Hideout", "Wormhole"][..]),
        ("nexus.yaml", &["Spire", "Refinery"][..]),
    ] {
        let system = demo(file);
        let mut renderer = Renderer::new(&style, ApproxMeasure, 1.0);
        let svg = renderer.render_svg(&system);
        for name in names {
            assert!(svg.contains(&format!(">{name}</text>")), "{file}: {name} missing");
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    let system = demo("sol.toml");
    let style = MapStyle::default();
    let first = Renderer::new(&style, ApproxMeasure, 1.5).render_svg(&system);
    let second = Renderer::new(&style, ApproxMeasure, 1.5).render_svg(&system);
    assert_eq!(first, second);
}

#[test]
fn hostile_planets_get_barbs_in_the_command_dump() {
    let system = demo("sol.toml");
    let style = MapStyle::default();
    let commands = Renderer::new(&style, ApproxMeasure, 1.0).render_commands(&system);

    let pointers = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Pointer { .. }))
        .count();
    // Luna (closed, friendly) and Hideout (closed, hostile). Mercury is
    // ungoverned, so it shows none.
    assert_eq!(pointers, 3 + 5);

    let json = serde_json::to_string(&commands).expect("serialize");
    assert!(json.contains(r#""kind":"pointer""#));
}
