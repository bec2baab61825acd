//! ffmpeg argument vector assembly

use std::ffi::OsString;

use crate::engine::{EncodeSettings, TranscodeJob};
use crate::planner::graph::number;

/// Build the ffmpeg argument vector (program name excluded) for a job.
///
/// Seek and duration are input options of the primary so the filter
/// timeline starts at zero at the trim point.
pub fn build_ffmpeg_args(job: &TranscodeJob, settings: &EncodeSettings) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-hide_banner".into()];

    args.push("-ss".into());
    args.push(number(job.trim.start).into());
    if let Some(duration) = job.trim.duration {
        args.push("-t".into());
        args.push(number(duration).into());
    }
    args.push("-i".into());
    args.push(job.primary.clone().into_os_string());

    for aux in &job.graph.aux_inputs {
        args.push("-i".into());
        args.push(aux.clone().into_os_string());
    }

    args.push("-filter_complex".into());
    args.push(job.graph.to_filter_complex().into());
    args.push("-map".into());
    args.push(job.graph.output_map().into());

    args.push("-c:v".into());
    args.push(settings.video_codec.clone().into());
    args.push("-preset".into());
    args.push(settings.preset.clone().into());
    args.push("-pix_fmt".into());
    args.push(settings.pixel_format.clone().into());
    if settings.faststart {
        args.push("-movflags".into());
        args.push("+faststart".into());
    }

    args.push("-y".into());
    args.push(job.output.clone().into_os_string());
    args
}
