mod color;
mod font;

// Re-export public API
pub use color::{density_to_u8, map_to_rgba, rgba_to_argb, velocity_rgba, ColorMap};
pub use font::render_status;
pub(crate) use font::STATUS_BAR_HEIGHT;

use crate::state::SimState;

/// What the display area shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VizMode {
    /// Density through the active color map.
    #[default]
    Density,
    /// Velocity components tinted over density.
    Velocity,
}

impl VizMode {
    /// Cycle to the next visualization mode.
    pub fn next(self) -> Self {
        match self {
            VizMode::Density => VizMode::Velocity,
            VizMode::Velocity => VizMode::Density,
        }
    }

    /// Short label for the status bar.
    pub fn label(self) -> &'static str {
        match self {
            VizMode::Density => "density",
            VizMode::Velocity => "velocity",
        }
    }
}

/// Fixed pixel layout: each interior cell becomes a `scale` x `scale` block,
/// with an optional status bar underneath.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub grid_width: usize,
    pub grid_height: usize,
    pub scale: usize,
    pub status_bar: bool,
    pub display_width: usize,
    pub display_height: usize,
    pub frame_width: usize,
    pub frame_height: usize,
}

impl RenderConfig {
    pub fn new(grid_width: usize, grid_height: usize, scale: usize, status_bar: bool) -> Self {
        let scale = scale.max(1);
        let display_width = grid_width * scale;
        let display_height = grid_height * scale;
        let bar = if status_bar { STATUS_BAR_HEIGHT } else { 0 };
        Self {
            grid_width,
            grid_height,
            scale,
            status_bar,
            display_width,
            display_height,
            frame_width: display_width,
            frame_height: display_height + bar,
        }
    }

    /// Interior cell under a display pixel, or `None` outside the display area.
    pub fn cell_at(&self, px: usize, py: usize) -> Option<(usize, usize)> {
        if px >= self.display_width || py >= self.display_height {
            return None;
        }
        Some((px / self.scale + 1, py / self.scale + 1))
    }
}

/// Render the current fields into an RGBA buffer (resized as needed).
///
/// Row `j = 1` is drawn at the top of the frame.
pub fn render_into(buf: &mut Vec<u8>, state: &SimState, cfg: &RenderConfig, viz_mode: VizMode, colormap: ColorMap) {
    let fw = cfg.frame_width;
    buf.resize(fw * cfg.frame_height * 4, 0);

    let density = state.density();
    let (vx, vy) = (state.velocity_x(), state.velocity_y());
    let w = cfg.grid_width.min(state.width);
    let h = cfg.grid_height.min(state.height);

    for j in 1..=h {
        for i in 1..=w {
            let rgba = match viz_mode {
                VizMode::Density => map_to_rgba(density[(i, j)], colormap),
                VizMode::Velocity => velocity_rgba(vx[(i, j)], vy[(i, j)], density[(i, j)]),
            };
            let y0 = (j - 1) * cfg.scale;
            let x0 = (i - 1) * cfg.scale;
            for py in y0..y0 + cfg.scale {
                let row = py * fw;
                for px in x0..x0 + cfg.scale {
                    let off = (row + px) * 4;
                    buf[off..off + 4].copy_from_slice(&rgba);
                }
            }
        }
    }
}

/// Convert an RGBA frame into minifb's `0RGB` pixels, reusing `out`.
pub fn to_argb(rgba: &[u8], out: &mut Vec<u32>) {
    out.clear();
    out.extend(rgba.chunks_exact(4).map(|p| rgba_to_argb([p[0], p[1], p[2], p[3]])));
}

/// Render field to a new RGBA buffer (test convenience wrapper).
#[cfg(test)]
pub fn render(state: &SimState, cfg: &RenderConfig, viz_mode: VizMode, colormap: ColorMap) -> Vec<u8> {
    let mut buf = Vec::new();
    render_into(&mut buf, state, cfg, viz_mode, colormap);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{FnInitializer, SceneKind};

    fn top_row_state() -> SimState {
        // Density 1 on row j = 1 only.
        let init = FnInitializer::new(|_, y| if y == 1.0 { 1.0 } else { 0.0 }, |_, _| (0.0, 0.0));
        SimState::new(4, 3, &init)
    }

    fn pixel(buf: &[u8], cfg: &RenderConfig, x: usize, y: usize) -> [u8; 4] {
        let off = (y * cfg.frame_width + x) * 4;
        [buf[off], buf[off + 1], buf[off + 2], buf[off + 3]]
    }

    #[test]
    fn test_render_config_layout() {
        let cfg = RenderConfig::new(100, 80, 5, true);
        assert_eq!(cfg.display_width, 500);
        assert_eq!(cfg.display_height, 400);
        assert_eq!(cfg.frame_width, 500);
        assert_eq!(cfg.frame_height, 400 + STATUS_BAR_HEIGHT);

        let bare = RenderConfig::new(100, 80, 5, false);
        assert_eq!(bare.frame_height, 400);
    }

    #[test]
    fn test_render_config_zero_scale_clamped() {
        let cfg = RenderConfig::new(10, 10, 0, false);
        assert_eq!(cfg.scale, 1);
        assert_eq!(cfg.frame_width, 10);
    }

    #[test]
    fn test_cell_at() {
        let cfg = RenderConfig::new(10, 8, 4, true);
        assert_eq!(cfg.cell_at(0, 0), Some((1, 1)));
        assert_eq!(cfg.cell_at(7, 4), Some((2, 2)));
        assert_eq!(cfg.cell_at(39, 31), Some((10, 8)));
        assert_eq!(cfg.cell_at(40, 0), None);
        assert_eq!(cfg.cell_at(0, 32), None, "status bar is not a cell");
    }

    #[test]
    fn test_render_buffer_size() {
        let state = top_row_state();
        let cfg = RenderConfig::new(4, 3, 3, true);
        let buf = render(&state, &cfg, VizMode::Density, ColorMap::Grayscale);
        assert_eq!(buf.len(), cfg.frame_width * cfg.frame_height * 4);
    }

    #[test]
    fn test_first_row_drawn_at_top() {
        let state = top_row_state();
        let cfg = RenderConfig::new(4, 3, 2, false);
        let buf = render(&state, &cfg, VizMode::Density, ColorMap::Grayscale);
        assert_eq!(pixel(&buf, &cfg, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, &cfg, 7, 1), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, &cfg, 0, 2), [0, 0, 0, 255]);
        assert_eq!(pixel(&buf, &cfg, 7, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn test_nearest_neighbour_blocks() {
        let init = FnInitializer::new(|x, y| if x == 2.0 && y == 2.0 { 0.5 } else { 0.0 }, |_, _| (0.0, 0.0));
        let state = SimState::new(3, 3, &init);
        let cfg = RenderConfig::new(3, 3, 4, false);
        let buf = render(&state, &cfg, VizMode::Density, ColorMap::Grayscale);
        let inside = pixel(&buf, &cfg, 4, 4);
        for (x, y) in [(4, 4), (7, 4), (4, 7), (7, 7)] {
            assert_eq!(pixel(&buf, &cfg, x, y), inside, "block pixel ({x}, {y})");
        }
        assert_eq!(inside[0], 128);
        assert_eq!(pixel(&buf, &cfg, 3, 4)[0], 0);
        assert_eq!(pixel(&buf, &cfg, 8, 4)[0], 0);
    }

    #[test]
    fn test_render_clamps_out_of_range_density() {
        let init = FnInitializer::new(|x, _| if x == 1.0 { 3.0 } else { -2.0 }, |_, _| (0.0, 0.0));
        let state = SimState::new(2, 1, &init);
        let cfg = RenderConfig::new(2, 1, 1, false);
        let buf = render(&state, &cfg, VizMode::Density, ColorMap::Grayscale);
        assert_eq!(pixel(&buf, &cfg, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&buf, &cfg, 1, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_velocity_view_tints_flow() {
        let state = SimState::new(6, 6, &SceneKind::Vortex.build(6, 6));
        let cfg = RenderConfig::new(6, 6, 1, false);
        let buf = render(&state, &cfg, VizMode::Velocity, ColorMap::Grayscale);
        // Corner cells of a rigid rotation move in both directions.
        let px = pixel(&buf, &cfg, 0, 0);
        assert!(px[0] > 128 && px[1] > 128, "got {:?}", px);
    }

    #[test]
    fn test_viz_mode_cycle() {
        assert_eq!(VizMode::Density.next(), VizMode::Velocity);
        assert_eq!(VizMode::Velocity.next(), VizMode::Density);
        assert_eq!(VizMode::default().label(), "density");
    }

    #[test]
    fn test_to_argb_packs_pixels() {
        let mut out = vec![7u32; 3];
        to_argb(&[1, 2, 3, 255, 0xFF, 0, 0x10, 255], &mut out);
        assert_eq!(out, vec![0x0001_0203, 0x00FF_0010]);
    }

    #[test]
    fn test_render_status_after_field() {
        let state = top_row_state();
        let cfg = RenderConfig::new(4, 3, 10, true);
        let mut buf = render(&state, &cfg, VizMode::Density, ColorMap::Grayscale);
        render_status(&mut buf, &cfg, "t");
        // separator sits right under the display area
        assert_eq!(pixel(&buf, &cfg, 0, cfg.display_height), [0x33, 0x33, 0x33, 255]);
        assert_eq!(pixel(&buf, &cfg, 0, 0), [255, 255, 255, 255]);
    }
}
