use serde::Deserialize;

/// Selects which color palette to use for the density view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMap {
    /// Black to white.
    #[default]
    Grayscale,
    /// Tokyo Night: navy -> blue -> purple -> pink -> orange.
    TokyoNight,
}

impl ColorMap {
    pub fn next(self) -> Self {
        match self {
            ColorMap::Grayscale => ColorMap::TokyoNight,
            ColorMap::TokyoNight => ColorMap::Grayscale,
        }
    }
}

/// Tokyo Night-inspired color stops.
/// Deep navy -> blue -> purple -> pink -> orange
pub(crate) const COLOR_STOPS: [(f64, f64, f64); 5] = [
    (26.0, 27.0, 38.0),    // #1a1b26 navy         (0.00)
    (122.0, 162.0, 247.0), // #7aa2f7 blue         (0.25)
    (187.0, 154.0, 247.0), // #bb9af7 purple       (0.50)
    (247.0, 118.0, 142.0), // #f7768e pink         (0.75)
    (255.0, 158.0, 100.0), // #ff9e64 orange       (1.00)
];

/// Clamp a density to `[0, 1]` and scale to a byte. NaN maps to 0.
pub fn density_to_u8(d: f64) -> u8 {
    if d.is_nan() {
        return 0;
    }
    (d.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert a [0.0, 1.0] value to RGBA using the specified color map.
pub fn map_to_rgba(t: f64, colormap: ColorMap) -> [u8; 4] {
    match colormap {
        ColorMap::Grayscale => {
            let v = density_to_u8(t);
            [v, v, v, 255]
        }
        ColorMap::TokyoNight => {
            let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
            let seg = t * 4.0;
            let i = (seg as usize).min(3);
            let s = seg - i as f64;

            let (r0, g0, b0) = COLOR_STOPS[i];
            let (r1, g1, b1) = COLOR_STOPS[i + 1];

            [
                (r0 + s * (r1 - r0)) as u8,
                (g0 + s * (g1 - g0)) as u8,
                (b0 + s * (b1 - b0)) as u8,
                255,
            ]
        }
    }
}

/// Velocity view: red is `128 + |vx|*128`, green `128 + |vy|*128`, blue
/// the plain density byte.
pub fn velocity_rgba(vx: f64, vy: f64, d: f64) -> [u8; 4] {
    let speed = |v: f64| {
        if v.is_nan() {
            128
        } else {
            (128.0 + v.abs() * 128.0).clamp(0.0, 255.0) as u8
        }
    };
    [speed(vx), speed(vy), density_to_u8(d), 255]
}

/// Pack RGBA into the `0RGB` u32 layout minifb expects.
#[inline]
pub fn rgba_to_argb(rgba: [u8; 4]) -> u32 {
    ((rgba[0] as u32) << 16) | ((rgba[1] as u32) << 8) | rgba[2] as u32
}
