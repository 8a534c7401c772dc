pub mod distogram;
pub mod session;
pub mod stats;
