// Keyintent Input Layer
// Key events as delivered by the key controller, and chord filtering

mod event;
mod filter;

pub use event::KeyEvent;
pub use filter::{ChordFilter, CHORD_RECOVERY_MS};
