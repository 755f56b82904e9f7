use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3};

use glint_engine::core::{App, AppConfig, Window, WindowConfig, WindowCtx};
use glint_engine::input::{Action, Key, Modifiers};
use glint_engine::logging::{init_logging, LoggingConfig};
use glint_engine::render::{DebugLine, Geometry, Primitive, RenderObject};
use glint_engine::shader::{EffectHandle, ShaderStage};

const CUBE_EFFECT: &str = "cube";
const GRID_HALF_EXTENT: i32 = 5;

fn shader_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("shaders")
        .join(name)
}

/// Orbiting camera over a lit cube, a ground grid and the world axes.
///
/// Keys: N opens another viewer sharing this one's content, Escape closes
/// the viewer, Q quits.
struct Viewer {
    title: String,
    angle: f32,
    cube: Option<RenderObject>,
    effect: Option<EffectHandle>,
    axes: Vec<(DebugLine, Vec3, Vec3, Vec3)>,
    grid: Vec<(DebugLine, Vec3, Vec3)>,
}

impl Viewer {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            angle: 0.0,
            cube: None,
            effect: None,
            axes: Vec::new(),
            grid: Vec::new(),
        }
    }

    fn camera(&self, aspect: f32) -> (Mat4, Mat4) {
        let eye = Vec3::new(6.0 * self.angle.cos(), 4.0, 6.0 * self.angle.sin());
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh_gl(60f32.to_radians(), aspect, 0.1, 100.0);
        (view, proj)
    }
}

impl Window for Viewer {
    fn config(&self) -> WindowConfig {
        WindowConfig::new(self.title.clone(), 960, 640)
    }

    fn on_init(&mut self, ctx: &mut WindowCtx<'_>) -> Result<()> {
        let effect = ctx.share.effect(CUBE_EFFECT);
        {
            let mut e = effect.borrow_mut();
            if !e.is_linked() {
                e.attach_shader_from_file(shader_path("cube.vert"), ShaderStage::Vertex)?;
                e.attach_shader_from_file(shader_path("cube.frag"), ShaderStage::Fragment)?;
                e.link().context("cube effect")?;
            }
        }
        self.effect = Some(effect);

        ctx.device.enable(glow::DEPTH_TEST);

        let mut cube = RenderObject::new(ctx.device.clone());
        cube.set_geometry(&Geometry::cube(1.5))?;
        self.cube = Some(cube);

        let axes = [
            (Vec3::X, Vec3::new(1.0, 0.2, 0.2)),
            (Vec3::Y, Vec3::new(0.2, 1.0, 0.2)),
            (Vec3::Z, Vec3::new(0.2, 0.4, 1.0)),
        ];
        for (dir, color) in axes {
            let mut line = DebugLine::new();
            line.init(ctx.share, ctx.device.clone())?;
            self.axes.push((line, Vec3::ZERO, dir * 3.0, color));
        }

        let n = GRID_HALF_EXTENT as f32;
        for i in -GRID_HALF_EXTENT..=GRID_HALF_EXTENT {
            let t = i as f32;
            for (start, end) in [
                (Vec3::new(t, 0.0, -n), Vec3::new(t, 0.0, n)),
                (Vec3::new(-n, 0.0, t), Vec3::new(n, 0.0, t)),
            ] {
                let mut line = DebugLine::new();
                line.init(ctx.share, ctx.device.clone())?;
                self.grid.push((line, start, end));
            }
        }

        log::info!(
            "{} ready: {} grid lines, effects {:?}",
            ctx.id,
            self.grid.len(),
            ctx.share.names()
        );
        Ok(())
    }

    fn on_tick(&mut self, ctx: &mut WindowCtx<'_>, dt: f32) -> Result<()> {
        self.angle = (self.angle + dt * 0.5) % std::f32::consts::TAU;
        let (view, proj) = self.camera(ctx.aspect_ratio());

        ctx.device.clear([0.08, 0.09, 0.11, 1.0]);

        if let (Some(effect), Some(cube)) = (&self.effect, &self.cube) {
            let mut effect = effect.borrow_mut();
            effect.activate()?;
            effect.set_matrix("model", &Mat4::from_rotation_y(self.angle * 2.0));
            effect.set_matrix("view", &view);
            effect.set_matrix("proj", &proj);
            effect.set_vec3("base_color", Vec3::new(0.9, 0.6, 0.2));
            effect.set_vec3("light_dir", Vec3::new(-0.4, -1.0, -0.3));
            cube.draw(Primitive::Triangles);
            effect.deactivate()?;
        }

        let grid_color = Vec3::splat(0.35);
        for (line, start, end) in &mut self.grid {
            line.draw(*start, *end, grid_color, &view, &proj)?;
        }
        for (line, start, end, color) in &mut self.axes {
            line.draw(*start, *end, *color, &view, &proj)?;
        }
        Ok(())
    }

    fn on_terminate(&mut self, ctx: &mut WindowCtx<'_>) {
        self.axes.clear();
        self.grid.clear();
        self.cube = None;
        self.effect = None;
        log::info!("{} `{}` terminated", ctx.id, ctx.title);
    }

    fn on_key(
        &mut self,
        ctx: &mut WindowCtx<'_>,
        key: Key,
        _scancode: u32,
        action: Action,
        _modifiers: Modifiers,
    ) {
        if action != Action::Press {
            return;
        }
        match key {
            Key::Escape => ctx.runtime.close_window(ctx.id),
            Key::Letter('N') => {
                let title = format!("glint viewer (shared with {})", ctx.id);
                ctx.runtime.attach_window(Viewer::new(title), Some(ctx.id));
            }
            Key::Letter('Q') => ctx.runtime.shutdown(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut app = App::new(AppConfig::default());
    let code = app.run(Viewer::new("glint viewer"))?;
    drop(app);

    std::process::exit(code);
}
