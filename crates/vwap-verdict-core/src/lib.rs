pub mod analysis;
pub mod bar;
pub mod error;
pub mod session;
pub mod verdict;
pub mod vwap;
