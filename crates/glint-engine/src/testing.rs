//! Test doubles: a recording GL device, a headless platform and a scripted
//! window. Nothing here needs a GPU or a display.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZeroU32;
use std::rc::Rc;

use anyhow::{anyhow, bail, Result};
use glow::{
    Buffer, NativeBuffer, NativeProgram, NativeShader, NativeUniformLocation, NativeVertexArray,
    Program, Shader, UniformLocation, VertexArray,
};

use crate::core::{Window, WindowConfig, WindowCtx};
use crate::device::{Device, GlDevice};
use crate::input::{Action, Key, Modifiers, MouseButton};
use crate::window::{Platform, Surface};

pub(crate) const LINE_VERTEX: &str = include_str!("render/shaders/debug_line.vert");
pub(crate) const LINE_FRAGMENT: &str = include_str!("render/shaders/debug_line.frag");
pub(crate) const BROKEN_FRAGMENT: &str = "#version 330 core\n\
out vec4 frag_color;\n\
void main() {\n\
    frag_color = vec4(1.0;\n\
}\n";

/// One recorded GL call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    CreateShader(u32),
    CompileShader(u32),
    DeleteShader(u32),
    CreateProgram(u32),
    AttachShader { program: u32, shader: u32 },
    DetachShader { program: u32, shader: u32 },
    LinkProgram(u32),
    UseProgram(Option<u32>),
    DeleteProgram(u32),
    GetUniformLocation(String),
    Uniform { location: u32, values: Vec<f32> },
    CreateVertexArray(u32),
    BindVertexArray(Option<u32>),
    DeleteVertexArray(u32),
    CreateBuffer(u32),
    BindBuffer { target: u32, buffer: Option<u32> },
    BufferData { target: u32, len: usize },
    DeleteBuffer(u32),
    EnableAttrib(u32),
    AttribPointer { index: u32, size: i32, stride: i32, offset: i32 },
    Enable(u32),
    Disable(u32),
    DrawElements { mode: u32, count: i32 },
    Clear,
    Viewport(i32, i32),
}

struct FakeShader {
    kind: u32,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Default)]
struct FakeProgram {
    attached: BTreeSet<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next: u32,
    calls: Vec<Call>,
    shaders: BTreeMap<u32, FakeShader>,
    programs: BTreeMap<u32, FakeProgram>,
    buffers: BTreeSet<u32>,
    vertex_arrays: BTreeSet<u32>,
    bound_program: Option<u32>,
    silent: bool,
}

impl State {
    fn alloc(&mut self) -> NonZeroU32 {
        self.next += 1;
        NonZeroU32::new(self.next).unwrap()
    }
}

/// `GlDevice` that records every call and emulates shader compilation.
///
/// Compilation fails on unbalanced brackets or a missing `main`. Linking
/// fails without compiled shaders, or with a fragment stage but no vertex
/// stage. Uniforms are the `uniform <type> <name>;` declarations of the
/// linked sources.
pub(crate) struct RecordingDevice {
    state: RefCell<State>,
}

impl RecordingDevice {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(State::default()),
        })
    }

    pub(crate) fn device(self: &Rc<Self>) -> Device {
        Rc::clone(self) as Device
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.state.borrow().calls.iter().filter(|c| pred(c)).count()
    }

    /// Shaders, programs, buffers and vertex arrays not yet deleted.
    pub(crate) fn live_objects(&self) -> usize {
        let s = self.state.borrow();
        s.shaders.len() + s.programs.len() + s.buffers.len() + s.vertex_arrays.len()
    }

    pub(crate) fn bound_program(&self) -> Option<u32> {
        self.state.borrow().bound_program
    }

    /// Makes info logs come back empty, like some drivers do.
    pub(crate) fn silence_logs(&self) {
        self.state.borrow_mut().silent = true;
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

fn compile(source: &str) -> std::result::Result<(), String> {
    let mut depth = [0i32; 2];
    for c in source.chars() {
        match c {
            '{' => depth[0] += 1,
            '}' => depth[0] -= 1,
            '(' => depth[1] += 1,
            ')' => depth[1] -= 1,
            _ => {}
        }
        if depth.iter().any(|d| *d < 0) {
            return Err("0:1(1): error: unexpected closing bracket".to_string());
        }
    }
    if depth != [0, 0] {
        return Err("0:1(1): error: syntax error, unbalanced brackets".to_string());
    }
    if !source.contains("void main()") {
        return Err("0:1(1): error: missing main function".to_string());
    }
    Ok(())
}

fn uniform_names(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        let rest = line.trim().strip_prefix("uniform ")?;
        let name = rest.split_whitespace().nth(1)?;
        Some(name.trim_end_matches(';').to_string())
    })
}

impl GlDevice for RecordingDevice {
    fn create_shader(&self, shader_type: u32) -> std::result::Result<Shader, String> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.shaders.insert(
            id.get(),
            FakeShader {
                kind: shader_type,
                source: String::new(),
                compiled: false,
                log: String::new(),
            },
        );
        s.calls.push(Call::CreateShader(shader_type));
        Ok(NativeShader(id))
    }

    fn shader_source(&self, shader: Shader, source: &str) {
        if let Some(sh) = self.state.borrow_mut().shaders.get_mut(&shader.0.get()) {
            sh.source = source.to_string();
        }
    }

    fn compile_shader(&self, shader: Shader) {
        let mut s = self.state.borrow_mut();
        let silent = s.silent;
        if let Some(sh) = s.shaders.get_mut(&shader.0.get()) {
            match compile(&sh.source) {
                Ok(()) => {
                    sh.compiled = true;
                    sh.log.clear();
                }
                Err(log) => {
                    sh.compiled = false;
                    sh.log = if silent { String::new() } else { log };
                }
            }
        }
        s.calls.push(Call::CompileShader(shader.0.get()));
    }

    fn get_shader_compile_status(&self, shader: Shader) -> bool {
        self.state
            .borrow()
            .shaders
            .get(&shader.0.get())
            .is_some_and(|sh| sh.compiled)
    }

    fn get_shader_info_log(&self, shader: Shader) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader.0.get())
            .map(|sh| sh.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: Shader) {
        let mut s = self.state.borrow_mut();
        s.shaders.remove(&shader.0.get());
        s.calls.push(Call::DeleteShader(shader.0.get()));
    }

    fn create_program(&self) -> std::result::Result<Program, String> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.programs.insert(id.get(), FakeProgram::default());
        s.calls.push(Call::CreateProgram(id.get()));
        Ok(NativeProgram(id))
    }

    fn attach_shader(&self, program: Program, shader: Shader) {
        let mut s = self.state.borrow_mut();
        if let Some(p) = s.programs.get_mut(&program.0.get()) {
            p.attached.insert(shader.0.get());
        }
        s.calls.push(Call::AttachShader {
            program: program.0.get(),
            shader: shader.0.get(),
        });
    }

    fn detach_shader(&self, program: Program, shader: Shader) {
        let mut s = self.state.borrow_mut();
        if let Some(p) = s.programs.get_mut(&program.0.get()) {
            p.attached.remove(&shader.0.get());
        }
        s.calls.push(Call::DetachShader {
            program: program.0.get(),
            shader: shader.0.get(),
        });
    }

    fn link_program(&self, program: Program) {
        let mut s = self.state.borrow_mut();
        let silent = s.silent;
        let id = program.0.get();

        let (kinds, uniforms) = match s.programs.get(&id) {
            Some(p) => {
                let stages: Vec<&FakeShader> = p
                    .attached
                    .iter()
                    .filter_map(|sh| s.shaders.get(sh))
                    .filter(|sh| sh.compiled)
                    .collect();
                let kinds: BTreeSet<u32> = stages.iter().map(|sh| sh.kind).collect();
                let uniforms: Vec<String> =
                    stages.iter().flat_map(|sh| uniform_names(&sh.source)).collect();
                (kinds, uniforms)
            }
            None => return,
        };

        let error = if kinds.is_empty() {
            Some("error: no compiled shaders attached")
        } else if kinds.contains(&glow::FRAGMENT_SHADER) && !kinds.contains(&glow::VERTEX_SHADER) {
            Some("error: fragment stage without a vertex stage")
        } else {
            None
        };

        if let Some(p) = s.programs.get_mut(&id) {
            p.linked = error.is_none();
            p.log = match error {
                Some(_) if silent => String::new(),
                Some(e) => e.to_string(),
                None => String::new(),
            };
            if p.linked {
                p.uniforms = uniforms;
            }
        }
        s.calls.push(Call::LinkProgram(id));
    }

    fn get_program_link_status(&self, program: Program) -> bool {
        self.state
            .borrow()
            .programs
            .get(&program.0.get())
            .is_some_and(|p| p.linked)
    }

    fn get_program_info_log(&self, program: Program) -> String {
        self.state
            .borrow()
            .programs
            .get(&program.0.get())
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn use_program(&self, program: Option<Program>) {
        let id = program.map(|p| p.0.get());
        let mut s = self.state.borrow_mut();
        s.bound_program = id;
        s.calls.push(Call::UseProgram(id));
    }

    fn current_program(&self) -> Option<Program> {
        self.state
            .borrow()
            .bound_program
            .and_then(NonZeroU32::new)
            .map(NativeProgram)
    }

    fn delete_program(&self, program: Program) {
        let mut s = self.state.borrow_mut();
        s.programs.remove(&program.0.get());
        s.calls.push(Call::DeleteProgram(program.0.get()));
    }

    fn get_uniform_location(&self, program: Program, name: &str) -> Option<UniformLocation> {
        let mut s = self.state.borrow_mut();
        s.calls.push(Call::GetUniformLocation(name.to_string()));
        let p = s.programs.get(&program.0.get())?;
        let index = p.uniforms.iter().position(|u| u == name)?;
        Some(NativeUniformLocation(index as u32))
    }

    fn uniform_1_i32(&self, location: &UniformLocation, x: i32) {
        self.record(Call::Uniform {
            location: location.0,
            values: vec![x as f32],
        });
    }

    fn uniform_1_f32(&self, location: &UniformLocation, x: f32) {
        self.record(Call::Uniform {
            location: location.0,
            values: vec![x],
        });
    }

    fn uniform_3_f32(&self, location: &UniformLocation, x: f32, y: f32, z: f32) {
        self.record(Call::Uniform {
            location: location.0,
            values: vec![x, y, z],
        });
    }

    fn uniform_matrix_4_f32_slice(&self, location: &UniformLocation, v: &[f32; 16]) {
        self.record(Call::Uniform {
            location: location.0,
            values: v.to_vec(),
        });
    }

    fn create_vertex_array(&self) -> std::result::Result<VertexArray, String> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.vertex_arrays.insert(id.get());
        s.calls.push(Call::CreateVertexArray(id.get()));
        Ok(NativeVertexArray(id))
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArray>) {
        self.record(Call::BindVertexArray(vertex_array.map(|v| v.0.get())));
    }

    fn delete_vertex_array(&self, vertex_array: VertexArray) {
        let mut s = self.state.borrow_mut();
        s.vertex_arrays.remove(&vertex_array.0.get());
        s.calls.push(Call::DeleteVertexArray(vertex_array.0.get()));
    }

    fn create_buffer(&self) -> std::result::Result<Buffer, String> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.buffers.insert(id.get());
        s.calls.push(Call::CreateBuffer(id.get()));
        Ok(NativeBuffer(id))
    }

    fn bind_buffer(&self, target: u32, buffer: Option<Buffer>) {
        self.record(Call::BindBuffer {
            target,
            buffer: buffer.map(|b| b.0.get()),
        });
    }

    fn buffer_data_u8_slice(&self, target: u32, data: &[u8], _usage: u32) {
        self.record(Call::BufferData {
            target,
            len: data.len(),
        });
    }

    fn delete_buffer(&self, buffer: Buffer) {
        let mut s = self.state.borrow_mut();
        s.buffers.remove(&buffer.0.get());
        s.calls.push(Call::DeleteBuffer(buffer.0.get()));
    }

    fn enable_vertex_attrib_array(&self, index: u32) {
        self.record(Call::EnableAttrib(index));
    }

    fn vertex_attrib_pointer_f32(&self, index: u32, size: i32, stride: i32, offset: i32) {
        self.record(Call::AttribPointer {
            index,
            size,
            stride,
            offset,
        });
    }

    fn enable(&self, capability: u32) {
        self.record(Call::Enable(capability));
    }

    fn disable(&self, capability: u32) {
        self.record(Call::Disable(capability));
    }

    fn draw_elements(&self, mode: u32, count: i32) {
        self.record(Call::DrawElements { mode, count });
    }

    fn clear(&self, _color: [f32; 4]) {
        self.record(Call::Clear);
    }

    fn viewport(&self, width: i32, height: i32) {
        self.record(Call::Viewport(width, height));
    }
}

#[derive(Default)]
struct PlatformStats {
    created: Cell<usize>,
    shared: Cell<usize>,
    swaps: Cell<usize>,
    devices: RefCell<Vec<Rc<RecordingDevice>>>,
}

/// `Platform` without a display: every surface gets a recording device,
/// shared surfaces reuse the device of the surface they share with.
pub(crate) struct HeadlessPlatform {
    stats: Rc<PlatformStats>,
    fail_next: bool,
}

impl HeadlessPlatform {
    pub(crate) fn new() -> Self {
        Self {
            stats: Rc::new(PlatformStats::default()),
            fail_next: false,
        }
    }

    /// The next `create_surface` call fails.
    pub(crate) fn fail_next_surface(&mut self) {
        self.fail_next = true;
    }

    pub(crate) fn surfaces_created(&self) -> usize {
        self.stats.created.get()
    }

    pub(crate) fn surfaces_shared(&self) -> usize {
        self.stats.shared.get()
    }

    pub(crate) fn swaps(&self) -> usize {
        self.stats.swaps.get()
    }

    /// Devices handed to surfaces that did not share, in creation order.
    pub(crate) fn devices(&self) -> Vec<Rc<RecordingDevice>> {
        self.stats.devices.borrow().clone()
    }
}

impl Platform for HeadlessPlatform {
    fn create_surface(
        &mut self,
        config: &WindowConfig,
        share_with: Option<&dyn Surface>,
    ) -> Result<Box<dyn Surface>> {
        if std::mem::take(&mut self.fail_next) {
            bail!("no display for `{}`", config.title);
        }

        let recording = match share_with {
            Some(other) => {
                let other = other
                    .as_any()
                    .downcast_ref::<HeadlessSurface>()
                    .ok_or_else(|| anyhow!("foreign surface"))?;
                self.stats.shared.set(self.stats.shared.get() + 1);
                Rc::clone(&other.recording)
            }
            None => {
                let recording = RecordingDevice::new();
                self.stats.devices.borrow_mut().push(Rc::clone(&recording));
                recording
            }
        };
        self.stats.created.set(self.stats.created.get() + 1);

        Ok(Box::new(HeadlessSurface {
            recording,
            size: (config.width, config.height),
            stats: Rc::clone(&self.stats),
        }))
    }
}

pub(crate) struct HeadlessSurface {
    recording: Rc<RecordingDevice>,
    size: (u32, u32),
    stats: Rc<PlatformStats>,
}

impl Surface for HeadlessSurface {
    fn device(&self) -> Device {
        self.recording.device()
    }

    fn make_current(&self) -> Result<()> {
        Ok(())
    }

    fn swap_buffers(&self) -> Result<()> {
        self.stats.swaps.set(self.stats.swaps.get() + 1);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&self, _width: u32, _height: u32) {}

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Lifecycle event seen by a [`ScriptedWindow`], tagged with its name.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Init(String),
    Tick(String, f32),
    Terminate(String),
    Key(String, Key),
    MouseButton(String, MouseButton),
    Cursor(String, f64, f64),
}

impl Event {
    fn window(&self) -> &str {
        match self {
            Event::Init(n)
            | Event::Tick(n, _)
            | Event::Terminate(n)
            | Event::Key(n, _)
            | Event::MouseButton(n, _)
            | Event::Cursor(n, ..) => n,
        }
    }
}

/// Shared event log for scripted windows.
#[derive(Clone, Default)]
pub(crate) struct EventLog {
    events: Rc<RefCell<Vec<Event>>>,
}

impl EventLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    pub(crate) fn events_for(&self, name: &str) -> Vec<Event> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.window() == name)
            .cloned()
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

type CtxHook = Box<dyn FnMut(&mut WindowCtx<'_>)>;
type KeyHook = Box<dyn FnMut(&mut WindowCtx<'_>, Key)>;

/// Window whose behaviour is configured per test.
pub(crate) struct ScriptedWindow {
    name: String,
    events: EventLog,
    fail_init: bool,
    fail_tick_at: Option<u32>,
    ticks: u32,
    init_hook: Option<CtxHook>,
    tick_hook: Option<CtxHook>,
    key_hook: Option<KeyHook>,
}

impl ScriptedWindow {
    pub(crate) fn new(name: &str, events: &EventLog) -> Self {
        Self {
            name: name.to_string(),
            events: events.clone(),
            fail_init: false,
            fail_tick_at: None,
            ticks: 0,
            init_hook: None,
            tick_hook: None,
            key_hook: None,
        }
    }

    pub(crate) fn fail_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// The `n`-th tick (1-based) reports failure.
    pub(crate) fn fail_tick_at(mut self, n: u32) -> Self {
        self.fail_tick_at = Some(n);
        self
    }

    pub(crate) fn on_init_run(mut self, f: impl FnMut(&mut WindowCtx<'_>) + 'static) -> Self {
        self.init_hook = Some(Box::new(f));
        self
    }

    pub(crate) fn on_tick_run(mut self, f: impl FnMut(&mut WindowCtx<'_>) + 'static) -> Self {
        self.tick_hook = Some(Box::new(f));
        self
    }

    pub(crate) fn on_key_run(mut self, f: impl FnMut(&mut WindowCtx<'_>, Key) + 'static) -> Self {
        self.key_hook = Some(Box::new(f));
        self
    }
}

impl Window for ScriptedWindow {
    fn config(&self) -> WindowConfig {
        WindowConfig::new(self.name.clone(), 320, 240)
    }

    fn on_init(&mut self, ctx: &mut WindowCtx<'_>) -> Result<()> {
        if let Some(hook) = &mut self.init_hook {
            hook(ctx);
        }
        if self.fail_init {
            bail!("{} refused to initialize", self.name);
        }
        self.events.push(Event::Init(self.name.clone()));
        Ok(())
    }

    fn on_tick(&mut self, ctx: &mut WindowCtx<'_>, dt: f32) -> Result<()> {
        self.ticks += 1;
        self.events.push(Event::Tick(self.name.clone(), dt));
        ctx.device.clear([0.0, 0.0, 0.0, 1.0]);
        if let Some(hook) = &mut self.tick_hook {
            hook(ctx);
        }
        if self.fail_tick_at == Some(self.ticks) {
            bail!("{} failed on tick {}", self.name, self.ticks);
        }
        Ok(())
    }

    fn on_terminate(&mut self, _ctx: &mut WindowCtx<'_>) {
        self.events.push(Event::Terminate(self.name.clone()));
    }

    fn on_key(
        &mut self,
        ctx: &mut WindowCtx<'_>,
        key: Key,
        _scancode: u32,
        _action: Action,
        _modifiers: Modifiers,
    ) {
        self.events.push(Event::Key(self.name.clone(), key));
        if let Some(hook) = &mut self.key_hook {
            hook(ctx, key);
        }
    }

    fn on_mouse_button(
        &mut self,
        _ctx: &mut WindowCtx<'_>,
        button: MouseButton,
        _action: Action,
        _modifiers: Modifiers,
    ) {
        self.events.push(Event::MouseButton(self.name.clone(), button));
    }

    fn on_cursor_moved(&mut self, _ctx: &mut WindowCtx<'_>, x: f64, y: f64) {
        self.events.push(Event::Cursor(self.name.clone(), x, y));
    }
}
