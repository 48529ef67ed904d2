/// Probe widgets that record what the core does to them.
pub mod probe;
/// In-memory surface.
pub mod surface;

pub use probe::{EventLog, Probe, Split};
pub use surface::{SurfaceBuf, TestSurface, WriteRecord};
