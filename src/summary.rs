//! Human-readable manifest summaries.

use crate::manifest::{Manifest, ParseReport};
use std::fmt::Write;
use streamforge_dash::ParsedManifest;
use streamforge_hls::ParsedPlaylist;

fn duration(seconds: f64) -> String {
    let total = seconds.max(0.0);
    let whole = total.trunc() as u64;
    let millis = ((total - whole as f64) * 1000.0).round() as u64;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        whole / 3600,
        (whole / 60) % 60,
        whole % 60,
        millis.min(999)
    )
}

fn playlist(out: &mut String, playlist: &ParsedPlaylist) {
    if playlist.is_multivariant() {
        let _ = writeln!(out, "Format: HLS multivariant playlist");
        let _ = writeln!(out, "Variant streams: {}", playlist.variant_streams.len());
        for variant in &playlist.variant_streams {
            let resolution = variant
                .resolution
                .map(|r| format!(" {}x{}", r.width, r.height))
                .unwrap_or_default();
            let _ = writeln!(out, "  {} bps{} {}", variant.bandwidth, resolution, variant.uri);
        }
        let groups = &playlist.rendition_groups;
        let renditions: usize = [&groups.audio, &groups.video, &groups.subtitles, &groups.closed_captions]
            .iter()
            .flat_map(|by_group| by_group.values())
            .map(Vec::len)
            .sum();
        let _ = writeln!(out, "Renditions: {renditions}");
        let _ = writeln!(out, "I-frame playlists: {}", playlist.i_frame_playlists.len());
        return;
    }

    let _ = writeln!(out, "Format: HLS media playlist");
    if let Some(version) = playlist.version {
        let _ = writeln!(out, "Version: {version}");
    }
    if let Some(playlist_type) = playlist.playlist_type {
        let _ = writeln!(out, "Type: {playlist_type}");
    }
    if let Some(target) = playlist.target_duration {
        let _ = writeln!(out, "Target duration: {target}s");
    }
    if let Some(sequence) = playlist.media_sequence {
        let _ = writeln!(out, "Media sequence: {sequence}");
    }
    let _ = writeln!(out, "Segments: {}", playlist.segments.len());
    let _ = writeln!(out, "Duration: {}", duration(playlist.total_duration()));
    let _ = writeln!(out, "Ended: {}", if playlist.end_list { "yes" } else { "no" });
}

fn manifest(out: &mut String, manifest: &ParsedManifest) {
    let _ = writeln!(out, "Format: DASH {} manifest", manifest.presentation_type);
    if let Some(total) = manifest.media_presentation_duration {
        let _ = writeln!(out, "Duration: {}", duration(total));
    }
    let _ = writeln!(out, "Periods: {}", manifest.periods.len());
    for period in &manifest.periods {
        let _ = writeln!(
            out,
            "  Period {} at {}",
            period.id.as_deref().unwrap_or("-"),
            duration(period.start)
        );
        for adaptation_set in &period.adaptation_sets {
            for representation in &adaptation_set.representations {
                let _ = writeln!(
                    out,
                    "    {} {} bps, {} segments",
                    representation.id,
                    representation.bandwidth,
                    representation.segments.len()
                );
            }
        }
    }
}

/// Render `report` as plain text.
pub fn render(report: &ParseReport) -> String {
    let mut out = String::new();
    match &report.manifest {
        Manifest::Hls(p) => playlist(&mut out, p),
        Manifest::Dash(m) => manifest(&mut out, m),
    }
    let _ = writeln!(out, "Diagnostics: {}", report.diagnostics.len());
    for diagnostic in &report.diagnostics {
        let _ = writeln!(out, "  {diagnostic}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_format() {
        assert_eq!(duration(0.0), "00:00:00.000");
        assert_eq!(duration(3723.5), "01:02:03.500");
    }

    #[test]
    fn test_render_media_playlist() {
        let parsed = streamforge_hls::parse(
            "#EXTM3U\n#EXT-X-TARGETDURATION:4\n#EXTINF:4,\na.ts\n#EXTINF:2,\nb.ts\n#EXT-X-ENDLIST\n",
            "https://cdn.example/index.m3u8",
        )
        .unwrap();
        let text = render(&ParseReport {
            manifest: Manifest::Hls(parsed),
            diagnostics: Vec::new(),
        });
        assert!(text.contains("Format: HLS media playlist"));
        assert!(text.contains("Segments: 2"));
        assert!(text.contains("Duration: 00:00:06.000"));
        assert!(text.contains("Ended: yes"));
        assert!(text.ends_with("Diagnostics: 0\n"));
    }

    #[test]
    fn test_render_dash_manifest() {
        let parsed = streamforge_dash::parse(
            r#"<MPD type="dynamic"><Period id="p0"><AdaptationSet><Representation id="v" bandwidth="100"/></AdaptationSet></Period></MPD>"#,
            "https://cdn.example/live.mpd",
        )
        .unwrap();
        let text = render(&ParseReport {
            manifest: Manifest::Dash(parsed),
            diagnostics: Vec::new(),
        });
        assert!(text.contains("Format: DASH dynamic manifest"));
        assert!(text.contains("Period p0 at 00:00:00.000"));
        assert!(text.contains("v 100 bps, 0 segments"));
    }
}
