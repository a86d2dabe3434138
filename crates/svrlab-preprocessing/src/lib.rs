pub mod impute;
pub mod scaler;
pub mod select;
pub mod split;

pub use impute::*;
pub use scaler::*;
pub use select::*;
pub use split::*;
