//! imbridge platform
//!
//! The host-facing half of the bridge: polled host input translated into
//! GUI input events, the [`Bridge`] context that sequences a frame from
//! input to draw submission, and a step-by-step [`InitBuilder`].

pub mod bridge;
pub mod host;
pub mod init;
pub mod input;
#[cfg(feature = "winit")]
pub mod winit_host;

pub use bridge::Bridge;
pub use host::{GamepadState, HostFrame, HostInput, InputSnapshot};
pub use init::InitBuilder;
pub use input::{analog_state, InputStats, InputTranslator};
#[cfg(feature = "winit")]
pub use winit_host::{host_key, WinitInput};

#[cfg(feature = "winit")]
pub use winit;
