//! Frame driver: runs a preset's hooks once per rendered frame.
//!
//! Every frame executes, strictly in order:
//! 1. feature injection (`t`/`time`, `pi`/`$pi`, `v`/`energy`, `w`/`h`)
//! 2. the `beat` hook, if the configured [`BeatTrigger`] fires
//! 3. the `frame` hook
//! 4. the `init` hook, under [`InitPolicy::EveryFrame`], re-reading `n`
//! 5. the `point` hook once per point, mapping each `(x, y)` to pixels
//!
//! Nothing here returns an error. A broken preset yields a degenerate frame.

pub mod config;
pub mod features;
pub mod output;

pub use config::{BeatTrigger, EngineConfig, InitPolicy};
pub use features::AudioFeatures;
pub use output::{Canvas, CanvasSize, Frame, Point, Rgb, Stroke};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::dsl::{Diagnostic, Evaluator};
use crate::environment::{Environment, Slot};
use crate::preset::{CompiledPreset, Hook, PresetProgram};

use output::{DEFAULT_LINE_WIDTH, MAX_LINE_WIDTH, MIN_LINE_WIDTH};

/// Slots of the variables the driver reads or writes.
#[derive(Debug, Clone, Copy)]
struct Bindings {
    t: Slot,
    time: Slot,
    pi: Slot,
    dollar_pi: Slot,
    v: Slot,
    energy: Slot,
    w: Slot,
    h: Slot,
    n: Slot,
    i: Slot,
    b: Slot,
    sb: Slot,
    x: Slot,
    y: Slot,
    linesize: Slot,
    red: Slot,
    green: Slot,
    blue: Slot,
}

impl Bindings {
    fn intern(env: &mut Environment) -> Self {
        Self {
            t: env.intern("t"),
            time: env.intern("time"),
            pi: env.intern("pi"),
            dollar_pi: env.intern("$pi"),
            v: env.intern("v"),
            energy: env.intern("energy"),
            w: env.intern("w"),
            h: env.intern("h"),
            n: env.intern("n"),
            i: env.intern("i"),
            b: env.intern("b"),
            sb: env.intern("sb"),
            x: env.intern("x"),
            y: env.intern("y"),
            linesize: env.intern("linesize"),
            red: env.intern("red"),
            green: env.intern("green"),
            blue: env.intern("blue"),
        }
    }
}

/// A loaded preset plus the state it accumulates across frames.
pub struct ScopeEngine {
    config: EngineConfig,
    program: PresetProgram,
    compiled: CompiledPreset,
    env: Environment,
    vars: Bindings,
    evaluator: Evaluator,
    rng: ChaCha8Rng,
    point_count: usize,
    frame_count: u64,
}

impl ScopeEngine {
    /// Create an engine running the default flat-line preset.
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut env = Environment::new();
        let vars = Bindings::intern(&mut env);
        let mut engine = Self {
            point_count: config.clamp_points(config.default_points as f64),
            config,
            program: PresetProgram::default(),
            compiled: CompiledPreset::default(),
            env,
            vars,
            evaluator: Evaluator::new(),
            rng,
            frame_count: 0,
        };
        engine.install(PresetProgram::default());
        engine
    }

    /// Replace the running preset. All variables are reset; the `init` hook
    /// runs once to establish the point count.
    pub fn load_preset(&mut self, text: &str) {
        self.install(PresetProgram::parse(text));
    }

    fn install(&mut self, program: PresetProgram) {
        let mut env = Environment::new();
        let vars = Bindings::intern(&mut env);
        env.set(vars.pi, std::f64::consts::PI);
        env.set(vars.dollar_pi, std::f64::consts::PI);
        env.set(vars.n, self.config.default_points as f64);

        let compiled = program.compile(&mut env);
        for (hook, diag) in &compiled.diagnostics {
            log::warn!("preset {} hook: {diag}", hook.name());
        }

        self.env = env;
        self.vars = vars;
        self.compiled = compiled;
        self.program = program;
        self.frame_count = 0;
        self.point_count = self.config.clamp_points(self.config.default_points as f64);

        if !self.compiled.init.is_empty() {
            self.run_hook(Hook::Init);
            self.point_count = self.config.clamp_points(self.env.get(self.vars.n));
        }

        log::debug!(
            "loaded preset: {} points, hooks [{}]",
            self.point_count,
            Hook::ALL
                .iter()
                .filter(|h| !self.compiled.block(**h).is_empty())
                .map(|h| h.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    /// Run one frame and return the points it produced.
    pub fn render_frame(&mut self, features: &AudioFeatures, size: CanvasSize) -> Frame {
        let v = self.inject_features(features, size);

        let beat = self.beat_fires(features, v);
        if beat && !self.compiled.beat.is_empty() {
            log::trace!("beat hook at t={:.3}", features.time);
            self.run_hook(Hook::Beat);
        }

        self.run_hook(Hook::Frame);

        if self.config.init_policy == InitPolicy::EveryFrame && !self.compiled.init.is_empty() {
            self.run_hook(Hook::Init);
            self.point_count = self.config.clamp_points(self.env.get(self.vars.n));
        }

        let points = self.run_points(features, size);
        self.frame_count += 1;

        Frame {
            points,
            stroke: self.stroke(),
            beat,
        }
    }

    /// Run one frame and hand the result to `canvas`.
    pub fn render_into(&mut self, features: &AudioFeatures, canvas: &mut dyn Canvas) -> Frame {
        let frame = self.render_frame(features, canvas.size());
        canvas.draw_polyline(&frame.points, &frame.stroke);
        frame
    }

    fn inject_features(&mut self, features: &AudioFeatures, size: CanvasSize) -> f64 {
        let vars = self.vars;
        let scaled = features.energy * self.config.sensitivity;
        let v = if scaled.is_finite() {
            scaled.clamp(0.0, 1.0)
        } else {
            0.0
        };

        self.env.set(vars.t, features.time);
        self.env.set(vars.time, features.time);
        self.env.set(vars.pi, std::f64::consts::PI);
        self.env.set(vars.dollar_pi, std::f64::consts::PI);
        self.env.set(vars.v, v);
        self.env.set(vars.energy, v);
        self.env.set(vars.w, size.width);
        self.env.set(vars.h, size.height);
        v
    }

    fn beat_fires(&mut self, features: &AudioFeatures, v: f64) -> bool {
        match self.config.beat_trigger {
            BeatTrigger::Detected => features.beat,
            BeatTrigger::EnergyGate {
                threshold,
                probability,
            } => v > threshold && self.rng.gen::<f64>() < probability,
        }
    }

    fn run_points(&mut self, features: &AudioFeatures, size: CanvasSize) -> Vec<Point> {
        let vars = self.vars;
        let n = self.point_count;
        let mut points = Vec::with_capacity(n);

        for idx in 0..n {
            let ni = if n > 1 {
                idx as f64 / (n - 1) as f64
            } else {
                0.0
            };
            let (band, amplitude) = features.band_at(ni);

            self.env.set(vars.i, ni);
            self.env.set(vars.b, band as f64);
            self.env.set(vars.sb, amplitude);
            self.env.set(vars.x, 0.0);
            self.env.set(vars.y, 0.0);

            self.run_hook(Hook::Point);

            points.push(size.to_pixels(self.env.get(vars.x), self.env.get(vars.y)));
        }

        points
    }

    fn stroke(&self) -> Stroke {
        let vars = self.vars;
        let width = if self.env.is_bound(vars.linesize) {
            let w = self.env.get(vars.linesize);
            if w.is_finite() {
                w.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
            } else {
                DEFAULT_LINE_WIDTH
            }
        } else {
            DEFAULT_LINE_WIDTH
        };

        let color = [vars.red, vars.green, vars.blue]
            .iter()
            .all(|s| self.env.is_bound(*s))
            .then(|| {
                Rgb::from_unit(
                    self.env.get(vars.red),
                    self.env.get(vars.green),
                    self.env.get(vars.blue),
                )
            });

        Stroke { width, color }
    }

    fn run_hook(&mut self, hook: Hook) {
        self.compiled
            .block(hook)
            .run(&mut self.env, &mut self.evaluator, &mut self.rng);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn program(&self) -> &PresetProgram {
        &self.program
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Points the next frame will render unless `init` changes `n`.
    pub fn point_count(&self) -> usize {
        self.point_count
    }

    /// Frames rendered since the current preset was loaded.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Anomalies found while compiling the current preset.
    pub fn diagnostics(&self) -> impl Iterator<Item = &(Hook, Diagnostic)> {
        self.compiled.diagnostics.iter()
    }
}

impl Default for ScopeEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
