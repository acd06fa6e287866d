//! Named intensity → RGBA color mappings.
//!
//! A [`Colormap`] is a pure function from a normalized scalar in [0, 1] to an
//! opaque color, backed by a [`ColorRamp`] of evenly-spaced stops. The
//! [`ColormapRegistry`] resolves colormaps by name; two are built in:
//!
//! - **`cool`**: teal → magenta.
//! - **`gray`**: black → white.

use rustc_hash::FxHashMap;

/// RGBA color with components in [0, 1].
pub type Rgba = [f32; 4];

/// Name of the teal → magenta built-in.
pub const COOL: &str = "cool";
/// Name of the black → white built-in.
pub const GRAY: &str = "gray";

const TEAL: [f32; 3] = [0.0, 1.0, 1.0];
const MAGENTA: [f32; 3] = [1.0, 0.0, 1.0];

/// A color ramp defined by N evenly-spaced color stops (N >= 2).
/// `t = 0` maps to the first color, `t = 1` maps to the last.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<[f32; 3]>,
}

impl ColorRamp {
    /// Ramp over the given stops. Returns `None` for fewer than two stops.
    #[must_use]
    pub fn new(stops: Vec<[f32; 3]>) -> Option<Self> {
        (stops.len() >= 2).then_some(Self { stops })
    }

    /// Two-stop linear ramp.
    #[must_use]
    pub fn linear(from: [f32; 3], to: [f32; 3]) -> Self {
        Self {
            stops: vec![from, to],
        }
    }

    /// Interpolate the ramp at position `t`, clamped to [0, 1].
    #[must_use]
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let n = self.stops.len() - 1;
        let scaled = t * n as f32;
        let idx = (scaled as usize).min(n - 1);
        let frac = scaled - idx as f32;

        let a = &self.stops[idx];
        let b = &self.stops[idx + 1];
        [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        ]
    }
}

/// A named, alpha-opaque colormap.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    name: String,
    ramp: ColorRamp,
}

impl Colormap {
    /// Colormap with the given name and ramp.
    #[must_use]
    pub fn new(name: impl Into<String>, ramp: ColorRamp) -> Self {
        Self {
            name: name.into(),
            ramp,
        }
    }

    /// Teal → magenta.
    #[must_use]
    pub fn cool() -> Self {
        Self::new(COOL, ColorRamp::linear(TEAL, MAGENTA))
    }

    /// Black → white.
    #[must_use]
    pub fn gray() -> Self {
        Self::new(GRAY, ColorRamp::linear([0.0; 3], [1.0; 3]))
    }

    /// Registry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Map an intensity to an opaque color.
    #[must_use]
    pub fn value(&self, t: f32) -> Rgba {
        let [r, g, b] = self.ramp.sample(t);
        [r, g, b, 1.0]
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self::cool()
    }
}

/// Colormaps addressable by name.
#[derive(Debug, Clone)]
pub struct ColormapRegistry {
    maps: FxHashMap<String, Colormap>,
}

impl ColormapRegistry {
    /// Registry holding only the built-in colormaps.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self {
            maps: FxHashMap::default(),
        };
        registry.register(Colormap::cool());
        registry.register(Colormap::gray());
        registry
    }

    /// Add or replace a colormap under its own name.
    pub fn register(&mut self, colormap: Colormap) {
        let _ = self.maps.insert(colormap.name.clone(), colormap);
    }

    /// Look up a colormap by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Colormap> {
        self.maps.get(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> =
            self.maps.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ColormapRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cool_endpoints_are_teal_and_magenta() {
        let cool = Colormap::cool();
        assert_eq!(cool.value(0.0), [0.0, 1.0, 1.0, 1.0]);
        assert_eq!(cool.value(1.0), [1.0, 0.0, 1.0, 1.0]);
        assert_eq!(cool.value(0.5), [0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn gray_is_a_linear_ramp() {
        let gray = Colormap::gray();
        assert_eq!(gray.value(0.0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(gray.value(0.25), [0.25, 0.25, 0.25, 1.0]);
        assert_eq!(gray.value(1.0), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn out_of_range_input_clamps() {
        let gray = Colormap::gray();
        assert_eq!(gray.value(-3.0), gray.value(0.0));
        assert_eq!(gray.value(7.5), gray.value(1.0));
        assert_eq!(gray.value(f32::NAN), gray.value(0.0));
    }

    #[test]
    fn multi_stop_ramp_hits_middle_stop() {
        let ramp = ColorRamp::new(vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
        ])
        .unwrap();
        assert_eq!(ramp.sample(0.5), [1.0, 0.0, 0.0]);
        assert_eq!(ramp.sample(0.75), [1.0, 0.5, 0.5]);
    }

    #[test]
    fn single_stop_ramp_is_rejected() {
        assert!(ColorRamp::new(vec![[1.0, 0.0, 0.0]]).is_none());
    }

    #[test]
    fn registry_resolves_builtins_by_name() {
        let registry = ColormapRegistry::new();
        assert_eq!(registry.names(), vec![COOL, GRAY]);
        assert_eq!(registry.get(GRAY), Some(&Colormap::gray()));
        assert!(registry.get("viridis").is_none());
    }
}
