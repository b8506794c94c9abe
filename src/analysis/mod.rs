pub mod aggregate;
pub mod bootstrap;
pub mod error;
pub mod params;
pub mod welch;
