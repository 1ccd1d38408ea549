// Library crate: exposes testable modules for integration tests and the JSON command interface.
// GUI-specific modules (app, ui, GL rendering) remain in the binary crate.

pub mod command;
pub mod extrude;
pub mod harness;
pub mod state;
pub mod tile;
pub mod validation;

/// Viewport types that need no GL context (meshes, camera math, picking).
/// The renderer and panel stay in the binary crate.
pub mod viewport {
    pub mod camera;
    pub mod mesh;
    pub mod picking;
}
