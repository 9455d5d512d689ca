//! Setup error types
//!
//! Everything that can go wrong happens once, before the first tick. Once the
//! window, GPU context and shader program exist, neither the simulation nor
//! the render submission can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for startup operations
pub type SetupResult<T> = Result<T, SetupError>;

/// Fatal startup failures
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Could not read shader {path}: {source}")]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Shader compile error in {stage}:\n{message}")]
    ShaderCompile { stage: &'static str, message: String },

    #[error("Shader link error:\n{0}")]
    ShaderLink(String),

    #[error("Could not bind attribute {0}")]
    MissingAttribute(&'static str),

    #[error("Could not bind uniform {0}")]
    MissingUniform(&'static str),

    #[error("Shader entry point {0} not found")]
    MissingEntryPoint(&'static str),

    #[error("Settings file {path}: {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Could not access settings {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Surface is not supported by the adapter")]
    UnsupportedSurface,

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_symbol_messages_name_the_symbol() {
        assert_eq!(
            SetupError::MissingAttribute("coord2d").to_string(),
            "Could not bind attribute coord2d"
        );
        assert_eq!(
            SetupError::MissingUniform("diffuse").to_string(),
            "Could not bind uniform diffuse"
        );
    }

    #[test]
    fn test_settings_io_message_names_the_file() {
        let err = SetupError::SettingsIo {
            path: PathBuf::from("conf/brickout.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "Could not access settings conf/brickout.json: gone");
        assert!(std::error::Error::source(&err).is_some());
    }
}
