use std::num::NonZeroUsize;
use std::sync::Arc;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;

const CACHE_CAPACITY: usize = 4096;
const APPROX_ADVANCE: f64 = 0.55;

/// The two faces used by planet labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    /// Government line.
    Small,
    /// Planet name.
    Large,
}

impl FontSize {
    pub fn px(self) -> f64 {
        match self {
            FontSize::Small => 14.0,
            FontSize::Large => 18.0,
        }
    }
}

pub trait TextMeasure {
    fn width(&mut self, text: &str, font: FontSize) -> f64;

    /// Height of a line of text, which is also the vertical extent of the
    /// text box handed to [`crate::canvas::Canvas::draw_text`].
    fn height(&mut self, font: FontSize) -> f64 {
        font.px()
    }
}

impl<M: TextMeasure + ?Sized> TextMeasure for &mut M {
    fn width(&mut self, text: &str, font: FontSize) -> f64 {
        (**self).width(text, font)
    }

    fn height(&mut self, font: FontSize) -> f64 {
        (**self).height(font)
    }
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font: FontSize,
}

/// Shaped text widths from the system font database.
pub struct CosmicTextMeasure {
    font_system: FontSystem,
    family: String,
    cache: LruCache<MeasureKey, f64>,
}

impl CosmicTextMeasure {
    pub fn new(family: impl Into<String>) -> Self {
        let capacity = NonZeroUsize::new(CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN);
        Self {
            font_system: FontSystem::new(),
            family: family.into(),
            cache: LruCache::new(capacity),
        }
    }
}

fn family_for(name: &str) -> Family<'_> {
    match name.trim().to_ascii_lowercase().as_str() {
        "" | "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        _ => Family::Name(name.trim()),
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn width(&mut self, text: &str, font: FontSize) -> f64 {
        if text.is_empty() {
            return 0.0;
        }

        let key = MeasureKey {
            text: text.to_string(),
            font,
        };
        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let font_size = font.px() as f32;
        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size,
                line_height: font_size * 1.2,
            },
        );
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new().family(family_for(&self.family));
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);

        let width = buffer
            .layout_runs()
            .fold(0.0f32, |widest, run| widest.max(run.line_w)) as f64;

        self.cache.put(key, width);
        width
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new("sans-serif")
    }
}

/// Fixed per-character advance. Deterministic and font-independent, for
/// headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMeasure;

impl TextMeasure for ApproxMeasure {
    fn width(&mut self, text: &str, font: FontSize) -> f64 {
        text.chars().count() as f64 * font.px() * APPROX_ADVANCE
    }
}

/// A measurer that can be cloned across threads building labels for the
/// same system.
pub struct SharedMeasure<M> {
    inner: Arc<Mutex<M>>,
}

impl<M> SharedMeasure<M> {
    pub fn new(measure: M) -> Self {
        Self {
            inner: Arc::new(Mutex::new(measure)),
        }
    }
}

impl<M> Clone for SharedMeasure<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: TextMeasure> TextMeasure for SharedMeasure<M> {
    fn width(&mut self, text: &str, font: FontSize) -> f64 {
        self.inner.lock().width(text, font)
    }

    fn height(&mut self, font: FontSize) -> f64 {
        self.inner.lock().height(font)
    }
}

#[cfg(test)]
mod tests {
    use super::{ApproxMeasure, FontSize, SharedMeasure, TextMeasure};

    #[test]
    fn approx_width_scales_with_length_and_size() {
        let mut m = ApproxMeasure;
        assert_eq!(m.width("", FontSize::Large), 0.0);
        assert!((m.width("Earth", FontSize::Large) - 5.0 * 18.0 * 0.55).abs() < 1e-9);
        assert!(m.width("Earth", FontSize::Small) < m.width("Earth", FontSize::Large));
        assert_eq!(m.height(FontSize::Small), 14.0);
    }

    #[test]
    fn shared_measure_clones_see_one_backend() {
        let shared = SharedMeasure::new(ApproxMeasure);
        let mut a = shared.clone();
        let mut b = shared;
        assert_eq!(
            a.width("Sol", FontSize::Small),
            b.width("Sol", FontSize::Small)
        );
    }

    #[test]
    fn shared_measure_crosses_threads() {
        let shared = SharedMeasure::new(ApproxMeasure);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut m = shared.clone();
                std::thread::spawn(move || m.width("Mars", FontSize::Large))
            })
            .collect();
        for handle in handles {
            let width = handle.join().expect("thread");
            assert!(width > 0.0);
        }
    }
}
