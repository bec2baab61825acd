//! Filter graph planning: typed stages and the compiler that builds them

pub mod compiler;
pub mod graph;

pub use compiler::{CompileInput, FilterGraphCompiler, OverlayOutcome, DEFAULT_PIXEL_FORMAT};
pub use graph::{CompiledGraph, FilterStage, StageKind, StreamLabel, BASE_LABEL, OUTPUT_LABEL};
