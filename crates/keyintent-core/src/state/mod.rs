// Keyintent State
// Per-key state kept between a press and its release

mod keystore;

pub use keystore::PressReleaseTracker;
