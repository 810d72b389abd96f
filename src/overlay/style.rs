use crate::config::options::TourOptions;

/// Class toggled on rect-focused targets for drop shadowing.
pub const SHADOW_CLASS: &str = "waypost-shadowed";

/// Class marking the element currently picked in authoring mode.
pub const PICKED_CLASS: &str = "waypost-picked";

/// Build the stylesheet injected once per host page.
///
/// Transition durations come from the options, so the sheet is rebuilt (and
/// re-injected under a new rule set) only when those change.
pub fn stylesheet(options: &TourOptions) -> String {
    format!(
        ".waypost.text {{
    white-space: pre-wrap;
    border-radius: 8px;
    border: 8px solid transparent;
    background-color: rgba(0, 48, 96, 0.753);
    color: white;
    position: absolute;
    word-break: break-word;
    font-size: large;
    max-width: 40vw;
    pointer-events: auto;
    transition: opacity {text_s}s;
}}
.waypost-focus {{
    transition: all {anim_ms}ms;
}}
.waypost-cover {{
    pointer-events: all;
    transition: all {anim_ms}ms;
    position: absolute;
}}
.waypost-cover.top {{ top: 0; }}
.waypost-cover.right {{ right: 0; }}
.waypost-cover.bottom {{ bottom: 0; }}
.waypost-cover.left {{ left: 0; }}
.{shadow} {{
    box-shadow: 0px 0px 10px #606060;
}}
.waypost-still .waypost-focus, .waypost-still .waypost-cover, .waypost-still .waypost.text {{
    transition: none !important;
}}",
        text_s = options.text_transition_time_s,
        anim_ms = options.animation_time_ms,
        shadow = SHADOW_CLASS,
    )
}

/// Stylesheet for the authoring picker outlines.
pub fn author_stylesheet(selector: &str) -> String {
    format!(
        ".waypost-picking {sel}:not(.waypost.overlay, .waypost.overlay *) {{
    outline: 1px dashed #FF69B480;
}}
.waypost-picking {sel}:not(.waypost.overlay, .{picked}, .waypost.overlay *):hover {{
    outline: 1px solid hotpink;
}}",
        sel = selector,
        picked = PICKED_CLASS,
    )
}
