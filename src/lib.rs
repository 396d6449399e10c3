pub mod dsp;
pub mod engine;
pub mod error;
pub mod fx; // Block-based effect stages driven by the engine
pub mod params;

pub use engine::events::{EventSink, FaultEvent, NullSink};
pub use engine::{Engine, EngineConfig};
pub use error::EngineError;
pub use fx::Interpolation;
pub use params::{EffectParams, ParamStore};

pub const MAX_BLOCK_SIZE: usize = 2048;
