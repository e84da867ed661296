pub mod access;
pub mod authorization;
pub mod client;
pub mod error;
pub mod scope;

pub use access::*;
pub use authorization::*;
pub use client::*;
pub use error::*;
pub use scope::*;
