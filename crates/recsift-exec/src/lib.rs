#![forbid(unsafe_code)]
//! recsift-exec: the interactive session and its background workers.
//!
//! `Session` is driven from one thread. Persistence and voice capture run on
//! `std::thread` workers, one outstanding operation per class, and report a
//! single terminal result that `Session::tick` turns into a `SessionEvent`.

pub mod debounce;
pub mod error;
pub mod session;
pub mod voice;
pub mod worker;

pub use debounce::Debouncer;
pub use error::{Result, SessionError};
pub use session::{Session, SessionEvent, StoreOutcome};
pub use voice::{LineTranscriber, ScriptedVoice, VoiceCapture, VoiceError};
pub use worker::{OperationKind, WorkerSlot};
