use crate::foundation::error::{WaypostError, WaypostResult};

/// Display mode for a tour.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// One step visible at a time; `previous()` is available.
    #[default]
    Single,
    /// `next()` shows all remaining steps cumulatively; `previous()` is a no-op.
    Multi,
}

/// How the overlay layer interacts with pointer events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlayType {
    /// Full mask capturing all pointer input.
    Blocking,
    /// Four cover tiles framing the target; the target stays interactive.
    #[default]
    Partial,
    /// Mask drawn but pointer events pass through.
    Clickthrough,
    /// No mask at all.
    None,
}

/// A dynamically assigned configuration value.
///
/// Mirrors the primitive types of the option whitelist; assigning the wrong
/// primitive to a key is a fatal [`WaypostError::Config`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// Boolean option value.
    Bool(bool),
    /// Integer option value (millisecond durations and similar).
    Int(u64),
    /// Floating-point option value.
    Float(f64),
    /// String option value (also used for enum-valued options).
    Str(String),
}

impl ConfigValue {
    fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Bool(_) => "bool",
            ConfigValue::Int(_) => "int",
            ConfigValue::Float(_) => "float",
            ConfigValue::Str(_) => "string",
        }
    }
}

/// The closed set of recognized option keys, in whitelist order.
pub const OPTION_KEYS: [&str; 13] = [
    "mode",
    "maskColor",
    "maskOpacity",
    "animationTime",
    "escapeToExit",
    "overlayType",
    "shadowTargets",
    "textTransitionTime",
    "clickToProgress",
    "bindKeys",
    "overlayId",
    "scrollIntoView",
    "maxMargin",
];

/// Tour configuration record.
///
/// Constructed with defaults, mutated only via [`TourOptions::set`] /
/// [`TourOptions::configure`], and read-only while a tour is showing (the
/// engine enforces that part).
#[derive(Clone, Debug, PartialEq)]
pub struct TourOptions {
    /// Display mode.
    pub mode: Mode,
    /// Mask fill color (CSS color string).
    pub mask_color: String,
    /// Mask fill opacity in `[0, 1]`. `None` takes the mode default: 0.4 in
    /// single mode, 0 in multi mode (everything shown stays unmasked).
    pub mask_opacity: Option<f64>,
    /// Focus transition settle time in milliseconds.
    pub animation_time_ms: u64,
    /// Whether `Escape` exits the tour.
    pub escape_to_exit: bool,
    /// Overlay pointer behavior.
    pub overlay_type: OverlayType,
    /// Whether rect-focused targets get a drop-shadow class.
    pub shadow_targets: bool,
    /// Text box opacity transition time in seconds.
    pub text_transition_time_s: f64,
    /// Whether clicking the overlay or text box advances the tour.
    pub click_to_progress: bool,
    /// Whether keyboard navigation is bound.
    pub bind_keys: bool,
    /// DOM id of the overlay node owned by this tour.
    pub overlay_id: String,
    /// Whether off-screen targets are scrolled into view before drawing.
    pub scroll_into_view: bool,
    /// Upper bound on the text/target margin in pixels.
    pub max_margin: f64,
}

impl Default for TourOptions {
    fn default() -> Self {
        Self {
            mode: Mode::Single,
            mask_color: "#000000".to_string(),
            mask_opacity: None,
            animation_time_ms: 700,
            escape_to_exit: true,
            overlay_type: OverlayType::Partial,
            shadow_targets: true,
            text_transition_time_s: 0.3,
            click_to_progress: true,
            bind_keys: true,
            overlay_id: "waypost-overlay".to_string(),
            scroll_into_view: true,
            max_margin: 50.0,
        }
    }
}

impl TourOptions {
    /// Assign one option by key, validating against the fixed whitelist.
    ///
    /// Unknown keys and primitive-type mismatches fail with a descriptive
    /// [`WaypostError::Config`] before any state changes.
    pub fn set(&mut self, key: &str, value: ConfigValue) -> WaypostResult<()> {
        match (key, &value) {
            ("mode", ConfigValue::Str(s)) => {
                self.mode = match s.as_str() {
                    "single" => Mode::Single,
                    "multi" => Mode::Multi,
                    other => {
                        return Err(WaypostError::config(format!(
                            "mode must be 'single' or 'multi', got '{other}'"
                        )));
                    }
                };
            }
            ("maskColor", ConfigValue::Str(s)) => self.mask_color = s.clone(),
            ("maskOpacity", ConfigValue::Float(f)) => self.mask_opacity = Some(*f),
            ("animationTime", ConfigValue::Int(ms)) => self.animation_time_ms = *ms,
            ("escapeToExit", ConfigValue::Bool(b)) => self.escape_to_exit = *b,
            ("overlayType", ConfigValue::Str(s)) => {
                self.overlay_type = match s.as_str() {
                    "blocking" => OverlayType::Blocking,
                    "partial" => OverlayType::Partial,
                    "clickthrough" => OverlayType::Clickthrough,
                    "none" => OverlayType::None,
                    other => {
                        return Err(WaypostError::config(format!(
                            "overlayType must be one of blocking|partial|clickthrough|none, got '{other}'"
                        )));
                    }
                };
            }
            ("shadowTargets", ConfigValue::Bool(b)) => self.shadow_targets = *b,
            ("textTransitionTime", ConfigValue::Float(f)) => self.text_transition_time_s = *f,
            ("clickToProgress", ConfigValue::Bool(b)) => self.click_to_progress = *b,
            ("bindKeys", ConfigValue::Bool(b)) => self.bind_keys = *b,
            ("overlayId", ConfigValue::Str(s)) => self.overlay_id = s.clone(),
            ("scrollIntoView", ConfigValue::Bool(b)) => self.scroll_into_view = *b,
            ("maxMargin", ConfigValue::Float(f)) => self.max_margin = *f,
            (key, value) if OPTION_KEYS.contains(&key) => {
                return Err(WaypostError::config(format!(
                    "invalid value type for '{key}': got {}",
                    value.type_name()
                )));
            }
            (key, _) => {
                return Err(WaypostError::config(format!(
                    "unknown configuration key '{key}'; valid keys are: {}",
                    OPTION_KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Apply a batch of `(key, value)` assignments in order.
    pub fn configure<'a, I>(&mut self, entries: I) -> WaypostResult<()>
    where
        I: IntoIterator<Item = (&'a str, ConfigValue)>,
    {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/options.rs"]
mod tests;
