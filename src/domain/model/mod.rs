pub mod context;
pub mod currency;
pub mod interval;
pub mod plan;
pub mod request;

pub use context::*;
pub use currency::*;
pub use interval::*;
pub use plan::*;
pub use request::*;
