//! Sector Services Layer
//!
//! Platform-facing services for the runtime. Currently settings loading.

pub mod settings;

pub use settings::{MeshSettings, Settings, SettingsError, SimulationSettings};

/// Service initialization
pub fn init_services() {
    tracing::debug!(
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
        "services initialized"
    );
}
