//! Compiles edit requests into a linear filter chain

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{AdjustmentParams, ImageOverlay, TextOverlay, TimeWindow};
use crate::domain::rules::{FilterEscaper, ScalingCalculator, TimeWindowResolver};
use crate::planner::graph::*;

/// Pixel format the chain is normalized to before encoding
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// Everything the compiler needs for one request
#[derive(Debug, Clone, Copy)]
pub struct CompileInput<'a> {
    pub adjustment: AdjustmentParams,
    pub trim_start: f64,
    pub text_overlays: &'a [TextOverlay],
    pub image_overlays: &'a [ImageOverlay],
    /// Staged file for each image overlay source reference
    pub resolved_sources: &'a HashMap<String, PathBuf>,
    pub video_width: u32,
    pub video_height: u32,
}

/// Result of trying to place one image overlay
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayOutcome {
    Added { source_ref: String, input_index: usize },
    Skipped { reason: DomainError },
}

/// Filter graph compiler
#[derive(Debug, Clone)]
pub struct FilterGraphCompiler {
    scaling: ScalingCalculator,
    pixel_format: String,
}

impl Default for FilterGraphCompiler {
    fn default() -> Self {
        Self::new(ScalingCalculator::default())
    }
}

impl FilterGraphCompiler {
    /// Create a compiler using the given scaling rule
    pub fn new(scaling: ScalingCalculator) -> Self {
        Self {
            scaling,
            pixel_format: DEFAULT_PIXEL_FORMAT.to_string(),
        }
    }

    /// Set the pixel format of the terminal stage
    pub fn with_pixel_format(mut self, pixel_format: impl Into<String>) -> Self {
        self.pixel_format = pixel_format.into();
        self
    }

    /// Build the stage chain for a request.
    ///
    /// Never fails: image overlays whose source cannot be found are left out
    /// and reported in [`CompiledGraph::diagnostics`].
    pub fn compile(&self, input: &CompileInput<'_>) -> CompiledGraph {
        debug!(
            width = input.video_width,
            height = input.video_height,
            ratio = self.scaling.ratio(input.video_width),
            "Compiling filter graph"
        );
        if input.video_width == 0 {
            warn!("Source width unknown, overlays keep their authored size");
        }

        let mut builder = ChainBuilder::new();
        builder.push(FilterStage {
            kind: StageKind::Adjust,
            inputs: vec![StreamLabel::Input(0)],
            output: BASE_LABEL.to_string(),
            operator: format!(
                "eq=brightness={}:contrast={}:saturation={}",
                number(input.adjustment.brightness),
                number(input.adjustment.contrast),
                number(input.adjustment.saturation)
            ),
        });

        for (index, overlay) in input.image_overlays.iter().enumerate() {
            match self.add_image_overlay(&mut builder, overlay, input) {
                OverlayOutcome::Added {
                    source_ref,
                    input_index,
                } => {
                    debug!(index, %source_ref, input_index, "Image overlay added");
                }
                OverlayOutcome::Skipped { reason } => {
                    warn!(index, "Skipping image overlay: {}", reason);
                    builder.diagnostics.push(reason);
                }
            }
        }

        // Text is layered above every image regardless of request order
        for overlay in input.text_overlays {
            self.add_text_overlay(&mut builder, overlay, input);
        }

        let current = builder.current.clone();
        builder.push(FilterStage {
            kind: StageKind::Format,
            inputs: vec![StreamLabel::chain(current)],
            output: OUTPUT_LABEL.to_string(),
            operator: format!("format={}", self.pixel_format),
        });

        let graph = builder.finish();
        info!(
            stages = graph.stages.len(),
            aux_inputs = graph.aux_inputs.len(),
            skipped = graph.diagnostics.len(),
            "Filter graph compiled"
        );
        graph
    }

    fn add_image_overlay(
        &self,
        builder: &mut ChainBuilder,
        overlay: &ImageOverlay,
        input: &CompileInput<'_>,
    ) -> OverlayOutcome {
        let source_ref = overlay.source_ref();
        let path = match input.resolved_sources.get(source_ref) {
            Some(path) => path,
            None => {
                return OverlayOutcome::Skipped {
                    reason: DomainError::UnresolvedOverlaySource {
                        source_ref: source_ref.to_string(),
                        reason: "no file was staged under this name".to_string(),
                    },
                }
            }
        };
        if !path.exists() {
            return OverlayOutcome::Skipped {
                reason: DomainError::UnresolvedOverlaySource {
                    source_ref: source_ref.to_string(),
                    reason: format!("staged file {} does not exist", path.display()),
                },
            };
        }

        let (width, height) = overlay.size();
        let width = self.scaling.scale(width, input.video_width);
        let height = self.scaling.scale(height, input.video_width);
        let window = TimeWindowResolver::resolve(overlay.raw_window(), input.trim_start);
        log_inert("image", source_ref, &window);

        builder.aux_inputs.push(path.clone());
        let input_index = builder.aux_inputs.len();

        let scaled = builder.labels.fresh("logo");
        builder.push(FilterStage {
            kind: StageKind::Scale,
            inputs: vec![StreamLabel::Input(input_index)],
            output: scaled.clone(),
            operator: format!("scale={}:{}", width, height),
        });

        let composite = builder.labels.fresh("ovl");
        let current = builder.current.clone();
        builder.push(FilterStage {
            kind: StageKind::Overlay,
            inputs: vec![StreamLabel::chain(current), StreamLabel::chain(scaled)],
            output: composite,
            operator: format!(
                "overlay=(main_w*{}/100):(main_h*{}/100):{}",
                number(overlay.x),
                number(overlay.y),
                enable_between(&window)
            ),
        });

        OverlayOutcome::Added {
            source_ref: source_ref.to_string(),
            input_index,
        }
    }

    fn add_text_overlay(
        &self,
        builder: &mut ChainBuilder,
        overlay: &TextOverlay,
        input: &CompileInput<'_>,
    ) {
        let font_size = self.scaling.scale(overlay.font_size(), input.video_width);
        let window = TimeWindowResolver::resolve(overlay.raw_window(), input.trim_start);
        log_inert("text", overlay.text(), &window);

        let label = builder.labels.fresh("txt");
        let current = builder.current.clone();
        builder.push(FilterStage {
            kind: StageKind::DrawText,
            inputs: vec![StreamLabel::chain(current)],
            output: label,
            operator: format!(
                "drawtext=text={}:x=(w*{}/100):y=(h*{}/100):fontsize={}:fontcolor={}:{}",
                FilterEscaper::drawtext_text(overlay.text()),
                number(overlay.x),
                number(overlay.y),
                font_size,
                FilterEscaper::option_value(overlay.color()),
                enable_between(&window)
            ),
        });
    }
}

fn log_inert(kind: &str, name: &str, window: &TimeWindow) {
    if window.is_inert() {
        debug!(kind, name, "Overlay window ends before the trim point and will not render");
    }
}

/// Mutable state while appending stages
struct ChainBuilder {
    stages: Vec<FilterStage>,
    current: String,
    aux_inputs: Vec<PathBuf>,
    diagnostics: Vec<DomainError>,
    labels: LabelAllocator,
}

impl ChainBuilder {
    fn new() -> Self {
        Self {
            stages: Vec::new(),
            current: BASE_LABEL.to_string(),
            aux_inputs: Vec::new(),
            diagnostics: Vec::new(),
            labels: LabelAllocator::default(),
        }
    }

    /// Append a stage; its output becomes the head of the chain unless it
    /// only feeds a fan-in point
    fn push(&mut self, stage: FilterStage) {
        if stage.kind != StageKind::Scale {
            self.current = stage.output.clone();
        }
        self.stages.push(stage);
    }

    fn finish(self) -> CompiledGraph {
        CompiledGraph {
            output_label: self.current,
            stages: self.stages,
            aux_inputs: self.aux_inputs,
            diagnostics: self.diagnostics,
        }
    }
}
