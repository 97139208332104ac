use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use fluidbox::config::{self, Config};
use fluidbox::export::{ExportFormat, FrameExporter};
use fluidbox::iterm2::Iterm2Encoder;
use fluidbox::renderer::{self, ColorMap, RenderConfig, VizMode};
use fluidbox::scene::SceneKind;
use fluidbox::session::Session;

struct Defaults;

impl Defaults {
    /// Headless frame pacing when no frame limit is given.
    const HEADLESS_FRAME_INTERVAL_MS: u64 = 33;
    /// Brush radius in cells for mouse injection.
    const SPLAT_RADIUS: f64 = 3.0;
    const SPLAT_DENSITY: f64 = 0.5;
    /// Velocity impulse per screen pixel of mouse motion.
    const SPLAT_FORCE: f64 = 0.05;
}

/// Command-line overrides on top of the config file.
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    headless: bool,
    frames: Option<u64>,
    scene: Option<SceneKind>,
    export_dir: Option<PathBuf>,
    export_format: Option<ExportFormat>,
    config_path: Option<PathBuf>,
}

impl CliArgs {
    fn parse(args: &[String]) -> Result<Self, String> {
        let mut cli = CliArgs::default();
        let mut it = args.iter();
        while let Some(arg) = it.next() {
            let mut value = |flag: &str| {
                it.next()
                    .cloned()
                    .ok_or_else(|| format!("{flag} needs a value"))
            };
            match arg.as_str() {
                "--headless" => cli.headless = true,
                "--frames" => {
                    let v = value("--frames")?;
                    let n = v.parse().map_err(|_| format!("--frames: '{v}' is not a number"))?;
                    cli.frames = Some(n);
                }
                "--scene" => cli.scene = Some(value("--scene")?.parse()?),
                "--export" => cli.export_dir = Some(PathBuf::from(value("--export")?)),
                "--config" => cli.config_path = Some(PathBuf::from(value("--config")?)),
                "--hdr" => cli.export_format = Some(ExportFormat::Pfm),
                "--png" => cli.export_format = Some(ExportFormat::Png),
                other => return Err(format!("unknown argument '{other}'")),
            }
        }
        Ok(cli)
    }

    fn apply(&self, cfg: &mut Config) {
        if let Some(scene) = self.scene {
            cfg.scene = scene;
        }
        if let Some(dir) = &self.export_dir {
            cfg.export.enabled = true;
            cfg.export.dir = dir.display().to_string();
        }
        if let Some(format) = self.export_format {
            cfg.export.enabled = true;
            cfg.export.format = format;
        }
    }
}

fn format_status(session: &Session, viz_mode: VizMode, colormap: ColorMap, paused: bool) -> String {
    let map = match colormap {
        ColorMap::Grayscale => "gray",
        ColorMap::TokyoNight => "tokyo",
    };
    let mut text = format!(
        "t={}  {}  {}/{}  diff={} visc={}",
        session.state.tick,
        session.scene,
        viz_mode.label(),
        map,
        session.params.diff,
        session.params.visc,
    );
    if paused {
        text.push_str("  [paused]");
    }
    if session.is_exporting() {
        text.push_str("  [rec]");
    }
    text
}

/// Log, print and exit with status 1.
fn fatal(err: impl std::fmt::Display) -> ! {
    log::error!("{err}");
    eprintln!("fluidbox: {err}");
    std::process::exit(1);
}

fn install_ctrlc(running: &Arc<AtomicBool>) {
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    }) {
        log::warn!("could not install Ctrl+C handler: {e}");
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let cli = CliArgs::parse(&args).unwrap_or_else(|e| fatal(e));

    let mut cfg = match &cli.config_path {
        Some(path) => config::load_from(path).unwrap_or_else(|e| fatal(e)),
        None => config::load(),
    };
    cli.apply(&mut cfg);

    let mut session = Session::new(&cfg).unwrap_or_else(|e| fatal(e));
    if cfg.export.enabled {
        let exporter = FrameExporter::new(&cfg.export.dir, cfg.export.format)
            .with_colormap(cfg.display.colormap);
        session = session.with_exporter(exporter);
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc(&running);

    if cli.headless {
        run_headless(&mut session, &cfg, cli.frames, &running);
    } else {
        run_gui(&mut session, &cfg, cli.frames, &running);
    }
    log::info!("stopped after {} ticks", session.state.tick);
}

fn run_gui(session: &mut Session, cfg: &Config, frames: Option<u64>, running: &AtomicBool) {
    let render_cfg = RenderConfig::new(session.params.width, session.params.height, cfg.display.scale, true);
    let (w, h) = (render_cfg.frame_width, render_cfg.frame_height);

    let mut window = Window::new("fluidbox", w, h, WindowOptions::default())
        .unwrap_or_else(|e| fatal(fluidbox::error::Error::from(e)));
    window.set_target_fps(cfg.display.target_fps);

    let mut viz_mode = VizMode::default();
    let mut colormap = cfg.display.colormap;
    let mut paused = false;
    let mut framebuf: Vec<u32> = Vec::with_capacity(w * h);
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut last_mouse: Option<(f32, f32)> = None;
    let mut last_step = Instant::now();
    let mut frame_count = 0u32;
    let mut last_fps_time = Instant::now();

    while window.is_open() && running.load(Ordering::SeqCst) {
        // --- Keyboard handling ---
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            paused = !paused;
        }
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            session.reset();
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            session.set_scene(session.scene.next());
        }
        if window.is_key_pressed(Key::V, KeyRepeat::No) {
            viz_mode = viz_mode.next();
        }
        if window.is_key_pressed(Key::C, KeyRepeat::No) {
            colormap = colormap.next();
        }

        // --- Mouse injection: drag to push dye around ---
        let mouse = window.get_mouse_pos(MouseMode::Discard);
        if window.get_mouse_down(MouseButton::Left) {
            if let Some((mx, my)) = mouse {
                if let Some((i, j)) = render_cfg.cell_at(mx as usize, my as usize) {
                    let (dx, dy) = last_mouse.map_or((0.0, 0.0), |(lx, ly)| (mx - lx, my - ly));
                    let force = (dx as f64 * Defaults::SPLAT_FORCE, dy as f64 * Defaults::SPLAT_FORCE);
                    session.state.splat(i as f64, j as f64, Defaults::SPLAT_RADIUS, Defaults::SPLAT_DENSITY, force);
                }
            }
            last_mouse = mouse;
        } else {
            last_mouse = None;
        }

        // --- Physics ---
        let elapsed = last_step.elapsed().as_secs_f64();
        last_step = Instant::now();
        if !paused {
            session.step(cfg.step_dt(elapsed));
        }

        // --- Render ---
        renderer::render_into(&mut rgba_buf, &session.state, &render_cfg, viz_mode, colormap);
        renderer::render_status(&mut rgba_buf, &render_cfg, &format_status(session, viz_mode, colormap, paused));
        renderer::to_argb(&rgba_buf, &mut framebuf);

        if let Err(e) = window.update_with_buffer(&framebuf, w, h) {
            log::error!("window update failed: {e}");
            break;
        }

        if frames.is_some_and(|n| session.state.tick >= n) {
            break;
        }

        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            window.set_title(&format!("fluidbox - {frame_count} fps"));
            frame_count = 0;
            last_fps_time = now;
        }
    }
}

fn run_headless(session: &mut Session, cfg: &Config, frames: Option<u64>, running: &AtomicBool) {
    use std::io::Write;

    let render_cfg = RenderConfig::new(session.params.width, session.params.height, cfg.display.scale, true);
    let frame_interval = if frames.is_some() {
        Duration::ZERO
    } else {
        Duration::from_millis(Defaults::HEADLESS_FRAME_INTERVAL_MS)
    };

    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::with_capacity(1024 * 1024, stdout.lock());
    let _ = write!(out, "\x1b[?25l\x1b[2J"); // hide cursor, clear screen
    let _ = out.flush();

    let mut encoder = Iterm2Encoder::new();
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut last_step = Instant::now();

    while running.load(Ordering::SeqCst) {
        let frame_start = Instant::now();

        let elapsed = last_step.elapsed().as_secs_f64();
        last_step = Instant::now();
        session.step(cfg.step_dt(elapsed));

        renderer::render_into(&mut rgba_buf, &session.state, &render_cfg, VizMode::Density, cfg.display.colormap);
        let status = format_status(session, VizMode::Density, cfg.display.colormap, false);
        renderer::render_status(&mut rgba_buf, &render_cfg, &status);

        match encoder.encode(
            &rgba_buf,
            render_cfg.frame_width,
            render_cfg.frame_height,
            render_cfg.frame_width,
            render_cfg.frame_height,
        ) {
            Ok(seq) => {
                let _ = write!(out, "\x1b[H");
                let _ = out.write_all(seq);
                let _ = out.flush();
            }
            Err(e) => {
                log::error!("terminal frame encoding failed: {e}");
                break;
            }
        }

        if frames.is_some_and(|n| session.state.tick >= n) {
            break;
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_interval {
            std::thread::sleep(frame_interval - elapsed);
        }
    }

    let _ = write!(out, "\x1b[?25h\n"); // show cursor
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(CliArgs::parse(&[]).unwrap(), CliArgs::default());
    }

    #[test]
    fn test_parse_all_flags() {
        let cli = CliArgs::parse(&args(&[
            "--headless", "--frames", "50", "--scene", "vortex", "--export", "out", "--png", "--config", "my.yaml",
        ]))
        .unwrap();
        assert!(cli.headless);
        assert_eq!(cli.frames, Some(50));
        assert_eq!(cli.scene, Some(SceneKind::Vortex));
        assert_eq!(cli.export_dir, Some(PathBuf::from("out")));
        assert_eq!(cli.export_format, Some(ExportFormat::Png));
        assert_eq!(cli.config_path, Some(PathBuf::from("my.yaml")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(CliArgs::parse(&args(&["--frames"])).is_err());
        assert!(CliArgs::parse(&args(&["--frames", "many"])).is_err());
        assert!(CliArgs::parse(&args(&["--scene", "swirl"])).is_err());
        assert!(CliArgs::parse(&args(&["--fast"])).is_err());
    }

    #[test]
    fn test_apply_overrides_config() {
        let mut cfg = Config::default();
        let cli = CliArgs::parse(&args(&["--scene", "still", "--hdr"])).unwrap();
        cli.apply(&mut cfg);
        assert_eq!(cfg.scene, SceneKind::Still);
        assert!(cfg.export.enabled);
        assert_eq!(cfg.export.format, ExportFormat::Pfm);
        assert_eq!(cfg.export.dir, "frames");

        let mut cfg = Config::default();
        CliArgs::default().apply(&mut cfg);
        assert!(!cfg.export.enabled, "no flags leave export off");
    }

    #[test]
    fn test_export_dir_enables_export() {
        let mut cfg = Config::default();
        CliArgs::parse(&args(&["--export", "shots"])).unwrap().apply(&mut cfg);
        assert!(cfg.export.enabled);
        assert_eq!(cfg.export.dir, "shots");
    }

    #[test]
    fn test_format_status() {
        let mut cfg = Config::default();
        cfg.physics.width = 8;
        cfg.physics.height = 8;
        let session = Session::new(&cfg).unwrap();
        let text = format_status(&session, VizMode::Velocity, ColorMap::TokyoNight, true);
        assert!(text.starts_with("t=0  radial  velocity/tokyo"), "got {text}");
        assert!(text.ends_with("[paused]"));
    }
}
