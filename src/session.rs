//! One running simulation as the front ends drive it: state, parameters,
//! the active scene and optional per-tick export.

use crate::config::Config;
use crate::error::Result;
use crate::export::FrameExporter;
use crate::scene::SceneKind;
use crate::solver::{self, diagnostics, SolverParams};
use crate::state::SimState;

pub struct Session {
    pub state: SimState,
    pub params: SolverParams,
    pub scene: SceneKind,
    exporter: Option<FrameExporter>,
    warned_non_finite: bool,
}

impl Session {
    /// Validate the configuration and build the initial state.
    pub fn new(cfg: &Config) -> Result<Self> {
        let params = cfg.solver_params()?;
        let scene = cfg.scene;
        let state = SimState::new(params.width, params.height, &scene.build(params.width, params.height));
        log::info!(
            "{}x{} grid, scene {}, diff {}, visc {}",
            params.width, params.height, scene, params.diff, params.visc
        );
        Ok(Self {
            state,
            params,
            scene,
            exporter: None,
            warned_non_finite: false,
        })
    }

    pub fn with_exporter(mut self, exporter: FrameExporter) -> Self {
        log::info!(
            "exporting {:?} frames to {}",
            exporter.format(),
            exporter.dir().display()
        );
        self.exporter = Some(exporter);
        self
    }

    pub fn is_exporting(&self) -> bool {
        self.exporter.is_some()
    }

    /// Advance one tick, log diagnostics and export the frame if enabled.
    pub fn step(&mut self, dt: f64) {
        solver::fluid_step(&mut self.state, &self.params, dt);
        self.log_diagnostics();

        if let Some(exporter) = self.exporter.as_mut() {
            if let Err(e) = exporter.write_frame(&self.state) {
                log::error!("frame export failed: {e}; export disabled");
                self.exporter = None;
            }
        }
    }

    fn log_diagnostics(&mut self) {
        let density = self.state.density();
        let mass = diagnostics::total_mass(density);
        if !mass.is_finite() && !self.warned_non_finite {
            log::warn!("non-finite density at tick {}; try a smaller dt", self.state.tick);
            self.warned_non_finite = true;
        }
        if log::log_enabled!(log::Level::Debug) {
            let (vx, vy) = (self.state.velocity_x(), self.state.velocity_y());
            log::debug!(
                "tick {} mass {:.6} energy {:.6} max|div| {:.3e}",
                self.state.tick,
                mass,
                diagnostics::kinetic_energy(vx, vy),
                diagnostics::max_abs_divergence(vx, vy),
            );
        }
    }

    /// Restart the active scene from tick 0.
    pub fn reset(&mut self) {
        let (w, h) = (self.params.width, self.params.height);
        self.state.reset(&self.scene.build(w, h));
        self.warned_non_finite = false;
        log::info!("reset to scene {}", self.scene);
    }

    pub fn set_scene(&mut self, scene: SceneKind) {
        self.scene = scene;
        self.reset();
    }
}
