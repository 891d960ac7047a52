pub mod bitmap;
pub mod common;
pub mod request;

pub use bitmap::*;
pub use common::*;
pub use request::*;
