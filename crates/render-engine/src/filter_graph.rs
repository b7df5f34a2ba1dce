//! ffmpeg `-filter_complex` graph for a slide video.
//!
//! Input 0 is the concat stream of slides and input 1 the background track.
//! The graph always exposes two outputs, `[vout]` and `[aout]`.

use slidecast_processing_core::timeline::format_secs;
use slidecast_project_model::params::ResolvedTransition;

/// Length of the background-track fade at the end of the video.
pub const AUDIO_FADE_SECS: f64 = 3.0;

/// Everything the graph depends on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterGraphInput {
    pub width: u32,
    pub height: u32,
    pub transition: ResolvedTransition,
    pub transition_duration_secs: f64,
    pub total_duration_secs: f64,
    pub bgm_volume: f64,
}

/// A built filter graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterGraph {
    graph: String,
}

impl FilterGraph {
    pub fn build(input: &FilterGraphInput) -> Self {
        let (w, h) = (input.width, input.height);
        let base = format!(
            "scale={w}:{h}:force_original_aspect_ratio=decrease,pad={w}:{h}:(ow-iw)/2:(oh-ih)/2:black"
        );

        let mut parts = Vec::with_capacity(3);
        match input.transition.filter_name() {
            "" => parts.push(format!("[0:v]{base}[vout]")),
            name => {
                // The segment keeps its own trailing ';', so joining yields ";;".
                parts.push(format!("[0:v]{base},split[v1][v2];"));
                parts.push(format!(
                    "[v1][v2]xfade=transition={name}:duration={}[vout]",
                    format_secs(input.transition_duration_secs)
                ));
            }
        }

        let fade_start = fade_start_secs(input.total_duration_secs);
        if fade_start <= 0.0 {
            tracing::warn!(
                total_duration_secs = input.total_duration_secs,
                fade_start_secs = fade_start,
                "Video is too short for the audio fade; fade start is not positive"
            );
        }
        parts.push(format!(
            "[1:a]volume={},afade=t=out:st={}:d={}[aout]",
            format_secs(input.bgm_volume),
            format_secs(fade_start),
            format_secs(AUDIO_FADE_SECS)
        ));

        let graph = parts.join(";");
        tracing::debug!(graph_len = graph.len(), transition = input.transition.filter_name(), "Built filter graph");
        Self { graph }
    }

    pub fn as_str(&self) -> &str {
        &self.graph
    }
}

impl std::fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.graph)
    }
}

/// Where the audio fade begins: `total - 3`, not clamped.
pub fn fade_start_secs(total_duration_secs: f64) -> f64 {
    total_duration_secs - AUDIO_FADE_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use slidecast_project_model::params::TransitionEffect;

    fn input(transition: ResolvedTransition) -> FilterGraphInput {
        FilterGraphInput {
            width: 1920,
            height: 1080,
            transition,
            transition_duration_secs: 1.0,
            total_duration_secs: 11.0,
            bgm_volume: 0.5,
        }
    }

    fn resolved(effect: TransitionEffect) -> ResolvedTransition {
        effect.resolve(&mut StdRng::seed_from_u64(1))
    }

    #[test]
    fn test_graph_without_transition() {
        let graph = FilterGraph::build(&input(ResolvedTransition::NONE));
        assert_eq!(
            graph.as_str(),
            "[0:v]scale=1920:1080:force_original_aspect_ratio=decrease,\
             pad=1920:1080:(ow-iw)/2:(oh-ih)/2:black[vout];\
             [1:a]volume=0.5,afade=t=out:st=8:d=3[aout]"
        );
        assert!(!graph.as_str().contains("xfade"));
    }

    #[test]
    fn test_graph_with_transition_keeps_double_separator() {
        let graph = FilterGraph::build(&input(resolved(TransitionEffect::SlideLeft)));
        assert_eq!(
            graph.as_str(),
            "[0:v]scale=1920:1080:force_original_aspect_ratio=decrease,\
             pad=1920:1080:(ow-iw)/2:(oh-ih)/2:black,split[v1][v2];;\
             [v1][v2]xfade=transition=slideleft:duration=1[vout];\
             [1:a]volume=0.5,afade=t=out:st=8:d=3[aout]"
        );
    }

    #[test]
    fn test_fractional_values_print_shortest() {
        let mut i = input(resolved(TransitionEffect::Fade));
        i.transition_duration_secs = 0.75;
        i.total_duration_secs = 7.5;
        i.bgm_volume = 1.0;
        let graph = FilterGraph::build(&i);
        assert!(graph.as_str().contains("xfade=transition=fade:duration=0.75[vout]"));
        assert!(graph.as_str().ends_with("[1:a]volume=1,afade=t=out:st=4.5:d=3[aout]"));
    }

    #[test]
    fn test_short_video_keeps_negative_fade_start() {
        let mut i = input(ResolvedTransition::NONE);
        i.total_duration_secs = 1.0;
        let graph = FilterGraph::build(&i);
        assert!(graph.as_str().contains("afade=t=out:st=-2:d=3"));
        assert_eq!(fade_start_secs(3.0), 0.0);
    }

    #[test]
    fn test_both_outputs_are_always_named() {
        for effect in TransitionEffect::ALL {
            let graph = FilterGraph::build(&input(resolved(effect)));
            assert!(graph.as_str().contains("[vout]"));
            assert!(graph.as_str().contains("[aout]"));
            assert!(!graph.as_str().contains("transition=random"));
        }
    }
}
