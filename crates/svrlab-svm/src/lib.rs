pub mod kernel;
pub mod params;
mod smo;
pub mod svr;

pub use kernel::Kernel;
pub use params::{Gamma, KernelKind, SVRParams};
pub use svr::{SVRModel, SVR};
