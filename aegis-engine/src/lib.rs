//! # aegis-engine
//!
//! The simulation session runtime: a single cooperative tick loop
//! (the frame callback), a typed command interface for everything the
//! outside world may do to a running simulation, and background fetch
//! tasks whose settled results are funneled back into the same loop.

mod error;
mod session;
mod sink;

pub use error::SessionError;
pub use session::{SessionCommand, SessionHandle, SimulationSession};
pub use sink::{RenderSink, VehicleFrame};
