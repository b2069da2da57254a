//! Discovery subsystem — worklist-driven graph expansion from a root file.

pub mod driver;
pub mod fs_source;

pub use driver::DiscoveryDriver;
pub use fs_source::FsContentSource;
