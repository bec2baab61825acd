//! Typed filter graph representation and its ffmpeg serialization

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::errors::DomainError;
use crate::domain::model::TimeWindow;

/// Label of the adjusted primary video, the head of the chain
pub const BASE_LABEL: &str = "base";

/// Label of the terminal stage
pub const OUTPUT_LABEL: &str = "outv";

/// A stream consumed or produced by a stage
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum StreamLabel {
    /// Video stream of the N-th engine input (0 is the primary video)
    Input(usize),
    /// Output of another stage
    Chain(String),
}

impl StreamLabel {
    pub fn chain(name: impl Into<String>) -> Self {
        StreamLabel::Chain(name.into())
    }
}

impl fmt::Display for StreamLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamLabel::Input(index) => write!(f, "[{}:v]", index),
            StreamLabel::Chain(name) => write!(f, "[{}]", name),
        }
    }
}

/// What a stage does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StageKind {
    Adjust,
    Scale,
    Overlay,
    DrawText,
    Format,
}

/// One node of the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterStage {
    pub kind: StageKind,
    pub inputs: Vec<StreamLabel>,
    pub output: String,
    /// Filter expression, already escaped for the graph syntax
    pub operator: String,
}

impl FilterStage {
    /// Render as `[in]...operator[out]`
    pub fn render(&self) -> String {
        let mut rendered = String::new();
        for input in &self.inputs {
            rendered.push_str(&input.to_string());
        }
        rendered.push_str(&self.operator);
        rendered.push_str(&StreamLabel::chain(self.output.as_str()).to_string());
        rendered
    }
}

/// Compiler output: stages, terminal label, extra engine inputs and skip diagnostics
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledGraph {
    pub stages: Vec<FilterStage>,
    pub output_label: String,
    /// Overlay image files, in the order their stages were appended.
    /// Input `i + 1` of the engine is `aux_inputs[i]`.
    pub aux_inputs: Vec<PathBuf>,
    /// Recoverable problems encountered while compiling
    pub diagnostics: Vec<DomainError>,
}

impl CompiledGraph {
    /// Serialize to the engine's `-filter_complex` descriptor
    pub fn to_filter_complex(&self) -> String {
        self.stages
            .iter()
            .map(FilterStage::render)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Argument selecting the terminal label as the output stream
    pub fn output_map(&self) -> String {
        format!("[{}]", self.output_label)
    }

    pub fn count(&self, kind: StageKind) -> usize {
        self.stages.iter().filter(|s| s.kind == kind).count()
    }
}

/// Hands out chain labels that are never reused within one graph
#[derive(Debug, Default)]
pub(crate) struct LabelAllocator {
    counters: HashMap<String, usize>,
}

impl LabelAllocator {
    pub(crate) fn fresh(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_string()).or_insert(0);
        let label = format!("{}{}", prefix, counter);
        *counter += 1;
        label
    }
}

/// Format a number for a filter expression
pub(crate) fn number(value: f64) -> String {
    format!("{}", value)
}

/// `between(t,start,end)` gate; unbounded windows end at `INF`
pub(crate) fn enable_between(window: &TimeWindow) -> String {
    let end = window.end.map_or_else(|| "INF".to_string(), number);
    format!("enable='between(t,{},{})'", number(window.start), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_render() {
        let stage = FilterStage {
            kind: StageKind::Overlay,
            inputs: vec![StreamLabel::chain("base"), StreamLabel::chain("logo0")],
            output: "ovl0".to_string(),
            operator: "overlay=0:0".to_string(),
        };
        assert_eq!(stage.render(), "[base][logo0]overlay=0:0[ovl0]");
    }

    #[test]
    fn test_input_label_render() {
        assert_eq!(StreamLabel::Input(2).to_string(), "[2:v]");
    }

    #[test]
    fn test_allocator_never_repeats() {
        let mut labels = LabelAllocator::default();
        assert_eq!(labels.fresh("txt"), "txt0");
        assert_eq!(labels.fresh("txt"), "txt1");
        assert_eq!(labels.fresh("logo"), "logo0");
    }

    #[test]
    fn test_enable_between() {
        let bounded = TimeWindow {
            start: 0.0,
            end: Some(3.0),
        };
        assert_eq!(enable_between(&bounded), "enable='between(t,0,3)'");

        let open = TimeWindow {
            start: 1.5,
            end: None,
        };
        assert_eq!(enable_between(&open), "enable='between(t,1.5,INF)'");
    }
}
