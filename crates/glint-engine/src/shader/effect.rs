use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use glow::{Program, Shader, UniformLocation};

use crate::device::{Device, GlError};

use super::util;
use super::ShaderStage;

/// Shared, mutable handle to an [`Effect`] stored in a share registry.
pub type EffectHandle = Rc<RefCell<Effect>>;

/// A GL program assembled from individually attached shader stages.
///
/// Lifecycle: created empty, shaders attached one per stage, linked once,
/// then activated around draw calls. Dropping the effect releases the program
/// and any shader objects still attached to it.
pub struct Effect {
    device: Device,
    program: Option<Program>,
    attached: Vec<(ShaderStage, Shader)>,
    linked: bool,
    // `None` records a known-missing uniform so the lookup is not repeated.
    uniforms: HashMap<String, Option<UniformLocation>>,
}

impl Effect {
    pub fn new(device: Device) -> Self {
        Self {
            device,
            program: None,
            attached: Vec::new(),
            linked: false,
            uniforms: HashMap::new(),
        }
    }

    /// Compiles `path` as a `stage` shader and attaches it.
    pub fn attach_shader_from_file(
        &mut self,
        path: impl AsRef<Path>,
        stage: ShaderStage,
    ) -> Result<(), GlError> {
        self.ensure_attachable(stage)?;
        let shader = util::create_shader_from_file(&*self.device, path, stage)?;
        self.attach(stage, shader)
    }

    /// Compiles in-memory `source` as a `stage` shader and attaches it.
    pub fn attach_shader_source(
        &mut self,
        source: &str,
        origin: &str,
        stage: ShaderStage,
    ) -> Result<(), GlError> {
        self.ensure_attachable(stage)?;
        let shader = util::create_shader_from_source(&*self.device, source, origin, stage)?;
        self.attach(stage, shader)
    }

    /// Links every attached stage into the program.
    ///
    /// On success the shader objects are detached and deleted. On failure the
    /// effect stays unlinked with its shaders attached. Linking a linked effect
    /// does nothing.
    pub fn link(&mut self) -> Result<(), GlError> {
        if self.linked {
            return Ok(());
        }
        let Some(program) = self.program else {
            return Err(GlError::Link {
                log: "no shaders attached".to_string(),
            });
        };

        self.device.link_program(program);
        if let Some(log) = util::check_program_error(&*self.device, program) {
            self.linked = false;
            return Err(GlError::Link { log });
        }

        self.linked = true;
        self.uniforms.clear();
        self.delete_attached_shaders();
        Ok(())
    }

    /// Detaches and deletes every attached shader object.
    pub fn delete_attached_shaders(&mut self) {
        for (_, shader) in self.attached.drain(..) {
            if let Some(program) = self.program {
                self.device.detach_shader(program, shader);
            }
            self.device.delete_shader(shader);
        }
    }

    /// Makes this program current for subsequent draw calls.
    pub fn activate(&mut self) -> Result<(), GlError> {
        let program = self.linked_program()?;
        self.device.use_program(Some(program));
        Ok(())
    }

    pub fn deactivate(&mut self) -> Result<(), GlError> {
        self.linked_program()?;
        // Another program bound since `activate` stays bound.
        if self.is_active() {
            self.device.use_program(None);
        }
        Ok(())
    }

    /// Uploads a 4x4 matrix. Returns `false` when nothing was uploaded.
    pub fn set_matrix(&mut self, name: &str, value: &Mat4) -> bool {
        let cols = value.to_cols_array();
        self.with_uniform(name, |device, loc| device.uniform_matrix_4_f32_slice(loc, &cols))
    }

    pub fn set_int(&mut self, name: &str, value: i32) -> bool {
        self.with_uniform(name, |device, loc| device.uniform_1_i32(loc, value))
    }

    pub fn set_float(&mut self, name: &str, value: f32) -> bool {
        self.with_uniform(name, |device, loc| device.uniform_1_f32(loc, value))
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) -> bool {
        self.with_uniform(name, |device, loc| {
            device.uniform_3_f32(loc, value.x, value.y, value.z)
        })
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Whether this program is the one currently bound on its device.
    ///
    /// Activating another effect on the same device deactivates this one.
    pub fn is_active(&self) -> bool {
        self.linked && self.program.is_some() && self.device.current_program() == self.program
    }

    pub fn program(&self) -> Option<Program> {
        self.program
    }

    /// Stages currently attached and awaiting a link.
    pub fn attached_stages(&self) -> impl Iterator<Item = ShaderStage> + '_ {
        self.attached.iter().map(|(stage, _)| *stage)
    }

    fn ensure_attachable(&self, stage: ShaderStage) -> Result<(), GlError> {
        if self.linked {
            return Err(GlError::AlreadyLinked);
        }
        if self.attached.iter().any(|(s, _)| *s == stage) {
            return Err(GlError::DuplicateStage(stage));
        }
        Ok(())
    }

    fn attach(&mut self, stage: ShaderStage, shader: Shader) -> Result<(), GlError> {
        let program = match self.program {
            Some(p) => p,
            None => match self.device.create_program() {
                Ok(p) => *self.program.insert(p),
                Err(reason) => {
                    self.device.delete_shader(shader);
                    return Err(GlError::create("program", reason));
                }
            },
        };

        self.device.attach_shader(program, shader);
        self.attached.push((stage, shader));
        Ok(())
    }

    fn linked_program(&self) -> Result<Program, GlError> {
        match self.program {
            Some(p) if self.linked => Ok(p),
            _ => Err(GlError::NotLinked),
        }
    }

    fn with_uniform<F>(&mut self, name: &str, upload: F) -> bool
    where
        F: FnOnce(&dyn crate::device::GlDevice, &UniformLocation),
    {
        if !self.is_active() {
            log::trace!("uniform `{name}` skipped: effect not active");
            return false;
        }
        let Some(program) = self.program else { return false };

        let device = &self.device;
        let location = self
            .uniforms
            .entry(name.to_string())
            .or_insert_with(|| device.get_uniform_location(program, name));

        match location {
            Some(loc) => {
                upload(&**device, loc);
                true
            }
            None => {
                log::trace!("uniform `{name}` not found in program");
                false
            }
        }
    }
}

impl Drop for Effect {
    fn drop(&mut self) {
        self.delete_attached_shaders();
        if let Some(program) = self.program.take() {
            if self.device.current_program() == Some(program) {
                self.device.use_program(None);
            }
            self.device.delete_program(program);
        }
    }
}
