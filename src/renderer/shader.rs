//! Shader program loading and validation
//!
//! The program is two WGSL files: a vertex stage and a fragment stage. Each
//! is parsed on its own to report compile errors against the right file,
//! then the two are linked by concatenation and validated as one module.
//! The symbols the renderer binds by name are looked up in the linked module.

use std::path::Path;

use crate::error::{SetupError, SetupResult};
use crate::settings::Settings;

pub const VERTEX_FILE: &str = "vertex.wgsl";
pub const FRAGMENT_FILE: &str = "fragment.wgsl";

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

pub const ATTRIBUTE_COORD2D: &str = "coord2d";
pub const UNIFORM_ORTHO: &str = "ortho";
pub const UNIFORM_MVP: &str = "mvp";
pub const UNIFORM_DIFFUSE: &str = "diffuse";

/// Bind group slots the renderer's layouts are built for
pub const ORTHO_BINDING: UniformLocation = UniformLocation { group: 0, binding: 0 };
pub const MVP_BINDING: UniformLocation = UniformLocation { group: 1, binding: 0 };
pub const DIFFUSE_BINDING: UniformLocation = UniformLocation { group: 1, binding: 1 };

/// Raw shader text for both stages
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Shaders compiled into the binary
    pub fn builtin() -> Self {
        Self {
            vertex: include_str!("../../shaders/vertex.wgsl").to_string(),
            fragment: include_str!("../../shaders/fragment.wgsl").to_string(),
        }
    }

    /// Read `vertex.wgsl` and `fragment.wgsl` from a directory
    pub fn from_dir(dir: &Path) -> SetupResult<Self> {
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| SetupError::ShaderRead { path, source })
        };
        Ok(Self {
            vertex: read(VERTEX_FILE)?,
            fragment: read(FRAGMENT_FILE)?,
        })
    }

    /// Shaders from the configured directory, or the built-in ones
    pub fn load(settings: &Settings) -> SetupResult<Self> {
        match &settings.shader_dir {
            Some(dir) => {
                log::info!("Loading shaders from {}", dir.display());
                Self::from_dir(dir)
            }
            None => Ok(Self::builtin()),
        }
    }
}

/// Where a uniform is bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    pub group: u32,
    pub binding: u32,
}

/// A linked, validated program and the locations of its named symbols
#[derive(Debug, Clone)]
pub struct ShaderProgram {
    /// Linked WGSL source handed to the GPU
    pub source: String,
    pub coord2d: u32,
    pub ortho: UniformLocation,
    pub mvp: UniformLocation,
    pub diffuse: UniformLocation,
}

impl ShaderProgram {
    /// Compile both stages, link them, and resolve the required symbols
    pub fn create(sources: &ShaderSources) -> SetupResult<Self> {
        compile_stage("vertex shader", &sources.vertex)?;
        compile_stage("fragment shader", &sources.fragment)?;

        let source = format!("{}\n{}", sources.vertex, sources.fragment);
        let module = naga::front::wgsl::parse_str(&source)
            .map_err(|e| SetupError::ShaderLink(e.emit_to_string(&source)))?;
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::empty(),
        )
        .validate(&module)
        .map_err(|e| SetupError::ShaderLink(e.emit_to_string(&source)))?;

        entry_point(&module, VERTEX_ENTRY, naga::ShaderStage::Vertex)?;
        entry_point(&module, FRAGMENT_ENTRY, naga::ShaderStage::Fragment)?;

        let program = Self {
            coord2d: attribute_location(&module, ATTRIBUTE_COORD2D)?,
            ortho: uniform_location(&module, UNIFORM_ORTHO)?,
            mvp: uniform_location(&module, UNIFORM_MVP)?,
            diffuse: uniform_location(&module, UNIFORM_DIFFUSE)?,
            source,
        };
        program.check_layout()?;
        Ok(program)
    }

    /// The renderer's bind group layouts expect fixed slots
    fn check_layout(&self) -> SetupResult<()> {
        let expected = [
            (UNIFORM_ORTHO, self.ortho, ORTHO_BINDING),
            (UNIFORM_MVP, self.mvp, MVP_BINDING),
            (UNIFORM_DIFFUSE, self.diffuse, DIFFUSE_BINDING),
        ];
        for (name, found, want) in expected {
            if found != want {
                return Err(SetupError::ShaderLink(format!(
                    "uniform {} is at group {} binding {}, expected group {} binding {}",
                    name, found.group, found.binding, want.group, want.binding
                )));
            }
        }
        Ok(())
    }
}

fn compile_stage(stage: &'static str, source: &str) -> SetupResult<naga::Module> {
    naga::front::wgsl::parse_str(source).map_err(|e| SetupError::ShaderCompile {
        stage,
        message: e.emit_to_string(source),
    })
}

fn entry_point<'m>(
    module: &'m naga::Module,
    name: &'static str,
    stage: naga::ShaderStage,
) -> SetupResult<&'m naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .ok_or(SetupError::MissingEntryPoint(name))
}

/// Location of a vertex input, either a direct argument or a struct member
fn attribute_location(module: &naga::Module, name: &'static str) -> SetupResult<u32> {
    let vs = entry_point(module, VERTEX_ENTRY, naga::ShaderStage::Vertex)?;

    for arg in &vs.function.arguments {
        if arg.name.as_deref() == Some(name) {
            if let Some(location) = location_of(arg.binding.as_ref()) {
                return Ok(location);
            }
        }
        if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
            let found = members
                .iter()
                .filter(|m| m.name.as_deref() == Some(name))
                .find_map(|m| location_of(m.binding.as_ref()));
            if let Some(location) = found {
                return Ok(location);
            }
        }
    }

    Err(SetupError::MissingAttribute(name))
}

fn location_of(binding: Option<&naga::Binding>) -> Option<u32> {
    match binding {
        Some(naga::Binding::Location { location, .. }) => Some(*location),
        _ => None,
    }
}

fn uniform_location(module: &naga::Module, name: &'static str) -> SetupResult<UniformLocation> {
    module
        .global_variables
        .iter()
        .map(|(_, var)| var)
        .filter(|var| var.space == naga::AddressSpace::Uniform)
        .find(|var| var.name.as_deref() == Some(name))
        .and_then(|var| var.binding.as_ref())
        .map(|b| UniformLocation {
            group: b.group,
            binding: b.binding,
        })
        .ok_or(SetupError::MissingUniform(name))
}
