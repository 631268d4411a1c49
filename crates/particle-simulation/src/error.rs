use thiserror::Error;

/// Result alias for the driver-facing simulation API.
pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors raised at the boundary between an external driver and the kernel.
///
/// The kernel itself never fails; these cover inputs the driver is
/// responsible for.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimulationError {
    /// More particles requested than the store can hold.
    #[error("requested {requested} particles but the store capacity is {capacity}")]
    CapacityExceeded { requested: u32, capacity: u32 },

    /// A store cannot be created without slots.
    #[error("particle store capacity must be non-zero")]
    ZeroCapacity,

    /// Workgroups need at least one invocation.
    #[error("workgroup size must be non-zero")]
    InvalidWorkgroupSize,

    /// Dispatch has fewer invocations than there are active particles.
    #[error("dispatch of {invocations} invocations cannot cover {active} active particles")]
    DispatchTooNarrow { invocations: u32, active: u32 },

    /// Time step is negative, NaN or infinite.
    #[error("time delta must be finite and >= 0, got {0}")]
    InvalidTimeDelta(f32),

    /// `step` was called before `init` ran.
    #[error("simulation stepped before init")]
    NotInitialized,
}
