use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Document is neither valid TOML ({toml}) nor valid YAML ({yaml})")]
    UnknownSyntax { toml: String, yaml: String },

    #[error("Unknown built-in style '{name}'. Available: {available}")]
    UnknownStyle { name: String, available: String },

    #[error("Planet '{planet}' references unknown government '{government}'")]
    UnknownGovernment { planet: String, government: String },

    #[error("Invalid color '{0}' (expected #rrggbb or #rrggbbaa)")]
    InvalidColor(String),

    #[error("Unsupported output format: .{0} (use .svg, .png, .pdf or .json)")]
    UnsupportedFormat(String),

    #[error("Invalid --png-scale value: {0}")]
    InvalidScale(f32),

    #[error("Failed to rasterize SVG: {0}")]
    Raster(String),

    #[error("Failed to convert SVG to PDF: {0}")]
    Pdf(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
