// Keyintent Blast Module
// IR forwarding of keys to legacy devices

mod blaster;
mod cicode;
mod request;
mod table;

pub use blaster::{BlastDecision, BlastOutcome, KeyBlaster};
pub use cicode::CiCodeTracker;
pub use request::{BlastAction, BlastRequest, BlastTransport, RecordingTransport};
pub use table::BlastedKeyTable;
