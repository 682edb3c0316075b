//! Read-only star system data consumed by the label engine.

use std::sync::Arc;

use crate::color::Color;
use crate::geometry::Point;

/// A political entity that may own planets.
#[derive(Debug, Clone, PartialEq)]
pub struct Government {
    pub name: String,
    pub color: Color,
    /// The player is at war with this government.
    pub hostile: bool,
}

impl Government {
    pub fn new(name: impl Into<String>, color: Color, hostile: bool) -> Self {
        Self {
            name: name.into(),
            color,
            hostile,
        }
    }
}

/// The landable (or at least nameable) part of a stellar object.
#[derive(Debug, Clone, PartialEq)]
pub struct Planet {
    pub name: String,
    pub government: Option<Arc<Government>>,
    pub can_land: bool,
    pub wormhole: bool,
}

impl Planet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            government: None,
            can_land: true,
            wormhole: false,
        }
    }

    pub fn governed_by(mut self, government: Arc<Government>) -> Self {
        self.government = Some(government);
        self
    }

    pub fn landing(mut self, can_land: bool) -> Self {
        self.can_land = can_land;
        self
    }

    pub fn wormhole(mut self) -> Self {
        self.wormhole = true;
        self
    }
}

/// A body in a system: a star, planet, moon, station or wormhole.
#[derive(Debug, Clone, PartialEq)]
pub struct StellarObject {
    /// Position in the system frame.
    pub position: Point,
    pub radius: f64,
    pub planet: Option<Planet>,
}

impl StellarObject {
    pub fn new(position: Point, radius: f64) -> Self {
        Self {
            position,
            radius,
            planet: None,
        }
    }

    pub fn with_planet(mut self, planet: Planet) -> Self {
        self.planet = Some(planet);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct System {
    pub name: String,
    /// Focal point of the map view, in the system frame.
    pub center: Point,
    pub objects: Vec<StellarObject>,
}

impl System {
    pub fn new(name: impl Into<String>, objects: Vec<StellarObject>) -> Self {
        Self {
            name: name.into(),
            center: Point::default(),
            objects,
        }
    }

    /// Objects that carry a planet, in declaration order.
    pub fn planets(&self) -> impl Iterator<Item = (&StellarObject, &Planet)> {
        self.objects
            .iter()
            .filter_map(|object| object.planet.as_ref().map(|planet| (object, planet)))
    }
}
