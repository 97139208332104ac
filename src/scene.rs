//! Initial conditions.
//!
//! An [`Initializer`] is sampled once per interior cell when a
//! [`SimState`](crate::state::SimState) is built. Coordinates are interior
//! cell indices (`1..=W`, `1..=H`) as `f64`. Built-in scenes carry their
//! grid size, see [`SceneKind::build`].

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

pub trait Initializer {
    fn density(&self, x: f64, y: f64) -> f64;
    fn velocity(&self, x: f64, y: f64) -> (f64, f64);
}

/// Closure-backed initializer.
pub struct FnInitializer<D, V> {
    density: D,
    velocity: V,
}

impl<D, V> FnInitializer<D, V>
where
    D: Fn(f64, f64) -> f64,
    V: Fn(f64, f64) -> (f64, f64),
{
    pub fn new(density: D, velocity: V) -> Self {
        Self { density, velocity }
    }
}

impl<D, V> Initializer for FnInitializer<D, V>
where
    D: Fn(f64, f64) -> f64,
    V: Fn(f64, f64) -> (f64, f64),
{
    fn density(&self, x: f64, y: f64) -> f64 {
        (self.density)(x, y)
    }

    fn velocity(&self, x: f64, y: f64) -> (f64, f64) {
        (self.velocity)(x, y)
    }
}

/// Built-in starting scenes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Bright disc at the centre in a cosine shear flow.
    #[default]
    Radial,
    /// Gaussian blob in a rigid rotation.
    Vortex,
    /// One unit of density in the centre cell, fluid at rest.
    Still,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [SceneKind::Radial, SceneKind::Vortex, SceneKind::Still];

    pub fn name(self) -> &'static str {
        match self {
            SceneKind::Radial => "radial",
            SceneKind::Vortex => "vortex",
            SceneKind::Still => "still",
        }
    }

    /// Cycle to the next scene.
    pub fn next(self) -> Self {
        match self {
            SceneKind::Radial => SceneKind::Vortex,
            SceneKind::Vortex => SceneKind::Still,
            SceneKind::Still => SceneKind::Radial,
        }
    }

    /// Bind the scene to a grid size.
    pub fn build(self, width: usize, height: usize) -> Scene {
        Scene { kind: self, width, height }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        SceneKind::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| format!("unknown scene '{s}' (expected radial, vortex or still)"))
    }
}

/// A scene bound to concrete grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scene {
    pub kind: SceneKind,
    pub width: usize,
    pub height: usize,
}

/// Blob width for [`SceneKind::Vortex`], in units of the domain size.
const VORTEX_SIGMA: f64 = 0.08;
/// Angular speed for [`SceneKind::Vortex`].
const VORTEX_OMEGA: f64 = 2.0;

impl Scene {
    fn center(&self) -> (f64, f64) {
        ((self.width as f64 + 1.0) / 2.0, (self.height as f64 + 1.0) / 2.0)
    }

    /// Normalized offset from the centre of the box.
    fn offset(&self, x: f64, y: f64) -> (f64, f64) {
        let (cx, cy) = self.center();
        ((x - cx) / self.width as f64, (y - cy) / self.height as f64)
    }

    /// Integer half-dimensions minus the cell index, as the radial scene is defined.
    fn radial_offset(&self, x: f64, y: f64) -> (f64, f64) {
        ((self.width / 2) as f64 - x, (self.height / 2) as f64 - y)
    }
}

impl Initializer for Scene {
    fn density(&self, x: f64, y: f64) -> f64 {
        match self.kind {
            SceneKind::Radial => {
                let (dx, dy) = self.radial_offset(x, y);
                (5.0 / ((dx * dx + dy * dy).sqrt() + 1.0)).min(1.0)
            }
            SceneKind::Vortex => {
                let (dx, dy) = self.offset(x, y);
                (-(dx * dx + dy * dy) / (2.0 * VORTEX_SIGMA * VORTEX_SIGMA)).exp()
            }
            SceneKind::Still => {
                let cx = ((self.width + 1) / 2) as f64;
                let cy = ((self.height + 1) / 2) as f64;
                if x == cx && y == cy { 1.0 } else { 0.0 }
            }
        }
    }

    fn velocity(&self, x: f64, y: f64) -> (f64, f64) {
        match self.kind {
            SceneKind::Radial => {
                let (dx, _) = self.radial_offset(x, y);
                (-(dx / 10.0).cos(), -(dx / 20.0).cos())
            }
            SceneKind::Vortex => {
                let (dx, dy) = self.offset(x, y);
                (-VORTEX_OMEGA * dy, VORTEX_OMEGA * dx)
            }
            SceneKind::Still => (0.0, 0.0),
        }
    }
}
