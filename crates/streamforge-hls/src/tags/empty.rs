//! Bare flag tags.

use super::TagContext;

pub(super) fn m3u(ctx: &mut TagContext<'_>) {
    ctx.playlist.m3u = true;
}

pub(super) fn independent_segments(ctx: &mut TagContext<'_>) {
    ctx.playlist.independent_segments = true;
}

pub(super) fn end_list(ctx: &mut TagContext<'_>) {
    ctx.playlist.end_list = true;
}

pub(super) fn i_frames_only(ctx: &mut TagContext<'_>) {
    ctx.playlist.i_frames_only = true;
}

pub(super) fn discontinuity(ctx: &mut TagContext<'_>) {
    ctx.state.current_segment.is_discontinuity = true;
}

pub(super) fn gap(ctx: &mut TagContext<'_>) {
    ctx.state.current_segment.is_gap = true;
}
