//! TOML/YAML descriptions of a star system.
//!
//! ```toml
//! name = "Sol"
//! center = [0.0, 0.0]
//!
//! [[governments]]
//! name = "Republic"
//! color = "#5a7bd6"
//!
//! [[objects]]
//! position = [0.0, 0.0]
//! radius = 60.0
//!
//! [[objects]]
//! position = [240.0, -80.0]
//! radius = 14.0
//! planet = { name = "Earth", government = "Republic" }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::body::{Government, Planet, StellarObject, System};
use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::Point;

#[derive(Debug, Deserialize)]
struct SystemFile {
    name: String,
    #[serde(default)]
    center: Point,
    #[serde(default)]
    governments: Vec<GovernmentEntry>,
    #[serde(default)]
    objects: Vec<ObjectEntry>,
}

#[derive(Debug, Deserialize)]
struct GovernmentEntry {
    name: String,
    color: Color,
    #[serde(default)]
    hostile: bool,
}

#[derive(Debug, Deserialize)]
struct ObjectEntry {
    position: Point,
    radius: f64,
    #[serde(default)]
    planet: Option<PlanetEntry>,
}

#[derive(Debug, Deserialize)]
struct PlanetEntry {
    #[serde(default)]
    name: String,
    #[serde(default)]
    government: Option<String>,
    #[serde(default = "default_can_land")]
    can_land: bool,
    #[serde(default)]
    wormhole: bool,
}

fn default_can_land() -> bool {
    true
}

impl SystemFile {
    fn into_system(self) -> Result<System> {
        let governments: HashMap<String, Arc<Government>> = self
            .governments
            .into_iter()
            .map(|g| {
                let government = Government::new(g.name.clone(), g.color, g.hostile);
                (g.name, Arc::new(government))
            })
            .collect();

        let mut objects = Vec::with_capacity(self.objects.len());
        for entry in self.objects {
            let mut object = StellarObject::new(entry.position, entry.radius);
            if let Some(planet) = entry.planet {
                object.planet = Some(build_planet(planet, &governments)?);
            }
            objects.push(object);
        }

        debug!(
            system = %self.name,
            objects = objects.len(),
            governments = governments.len(),
            "loaded system"
        );

        Ok(System {
            name: self.name,
            center: self.center,
            objects,
        })
    }
}

fn build_planet(entry: PlanetEntry, governments: &HashMap<String, Arc<Government>>) -> Result<Planet> {
    let government = match entry.government {
        Some(name) => Some(governments.get(&name).cloned().ok_or_else(|| {
            Error::UnknownGovernment {
                planet: entry.name.clone(),
                government: name,
            }
        })?),
        None => None,
    };

    Ok(Planet {
        name: entry.name,
        government,
        can_land: entry.can_land,
        wormhole: entry.wormhole,
    })
}

impl System {
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: SystemFile = toml::from_str(content)?;
        file.into_system()
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: SystemFile = serde_yaml::from_str(content)?;
        file.into_system()
    }

    /// Parse a document of unknown syntax: TOML first, then YAML.
    pub fn from_str_any(content: &str) -> Result<Self> {
        let toml_err = match toml::from_str::<SystemFile>(content) {
            Ok(file) => return file.into_system(),
            Err(err) => err,
        };
        match serde_yaml::from_str::<SystemFile>(content) {
            Ok(file) => file.into_system(),
            Err(yaml_err) => Err(Error::UnknownSyntax {
                toml: toml_err.to_string(),
                yaml: yaml_err.to_string(),
            }),
        }
    }

    /// Load a system file, picking the syntax from its extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("toml") => Self::from_toml(&content),
            Some("yaml" | "yml") => Self::from_yaml(&content),
            _ => Self::from_str_any(&content),
        }
    }
}
