// Purpose: voices, voice allocation and the shared effects chain
// This layer sits above the dsp primitives and owns everything that runs per sample

pub mod echo;
pub mod effects;
pub mod message;
pub mod poly;
#[cfg(feature = "rtrb")]
pub mod remote;
pub mod voice;

pub use message::SynthMessage;
pub use poly::Synth;
