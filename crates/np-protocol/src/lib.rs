pub mod device;
pub mod plan;
pub mod provider;
pub mod report;

pub use device::*;
pub use plan::*;
pub use provider::*;
pub use report::*;
