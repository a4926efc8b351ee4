/// Common data types for hardware abstraction interfaces
pub use nalgebra::Vector3;

/// 3D vector representation using nalgebra
pub type Vector3d = Vector3<f32>;

/// Milliseconds read from a monotonic clock. Wraps around at `u32::MAX`.
pub type Millis = u32;
