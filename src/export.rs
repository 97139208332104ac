//! Per-tick frame export.
//!
//! One file per call, named `frame_{tick:05}.{ext}`, at one pixel per
//! interior cell. Image row 0 is grid row `j = 1`, as on screen.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::renderer::{map_to_rgba, ColorMap};
use crate::state::SimState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Portable Float Map: unclamped `f32` RGB, density in every channel.
    #[default]
    Pfm,
    /// 8-bit RGBA PNG, clamped.
    Png,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pfm => "pfm",
            ExportFormat::Png => "png",
        }
    }
}

pub struct FrameExporter {
    dir: PathBuf,
    format: ExportFormat,
    colormap: ColorMap,
    dir_ready: bool,
    bytes: Vec<u8>,
}

impl FrameExporter {
    pub fn new(dir: impl Into<PathBuf>, format: ExportFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
            colormap: ColorMap::Grayscale,
            dir_ready: false,
            bytes: Vec::new(),
        }
    }

    /// Palette used for PNG frames. PFM frames always carry raw density.
    pub fn with_colormap(mut self, colormap: ColorMap) -> Self {
        self.colormap = colormap;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> ExportFormat {
        self.format
    }

    pub fn frame_path(&self, tick: u64) -> PathBuf {
        self.dir.join(format!("frame_{:05}.{}", tick, self.format.extension()))
    }

    /// Write the current density field. Returns the path written.
    pub fn write_frame(&mut self, state: &SimState) -> Result<PathBuf> {
        if !self.dir_ready {
            fs::create_dir_all(&self.dir)?;
            self.dir_ready = true;
        }
        let path = self.frame_path(state.tick);
        self.bytes.clear();
        match self.format {
            ExportFormat::Pfm => encode_pfm(state, &mut self.bytes),
            ExportFormat::Png => {
                let rgba = density_rgba(state, self.colormap);
                encode_png(&rgba, state.width, state.height, &mut self.bytes)?;
            }
        }
        let mut file = BufWriter::new(fs::File::create(&path)?);
        file.write_all(&self.bytes)?;
        file.flush()?;
        log::debug!("wrote {}", path.display());
        Ok(path)
    }
}

/// Density at one pixel per cell through `colormap`, row `j = 1` first.
pub fn density_rgba(state: &SimState, colormap: ColorMap) -> Vec<u8> {
    let density = state.density();
    let mut rgba = Vec::with_capacity(state.width * state.height * 4);
    for j in 1..=state.height {
        for i in 1..=state.width {
            rgba.extend_from_slice(&map_to_rgba(density[(i, j)], colormap));
        }
    }
    rgba
}

/// PFM: `PF` header, negative scale for little-endian, rows bottom-to-top.
pub fn encode_pfm(state: &SimState, out: &mut Vec<u8>) {
    let density = state.density();
    let (w, h) = (state.width, state.height);
    out.reserve(32 + w * h * 12);
    out.extend_from_slice(format!("PF\n{} {}\n-1.0\n", w, h).as_bytes());
    for j in (1..=h).rev() {
        for i in 1..=w {
            let v = (density[(i, j)] as f32).to_le_bytes();
            for _ in 0..3 {
                out.extend_from_slice(&v);
            }
        }
    }
}

/// Encode RGBA pixels as PNG into `out`.
pub fn encode_png(rgba: &[u8], width: usize, height: usize, out: &mut Vec<u8>) -> Result<()> {
    let mut encoder = png::Encoder::new(out, width as u32, height as u32);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(rgba)?;
    writer.finish()?;
    Ok(())
}
