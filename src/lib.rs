//! Waypost is a guided-tour overlay engine for walking users through a UI.
//!
//! A tour is a sequence of steps, each pairing explanatory text with an
//! optional target element. Waypost sequences the steps, computes where the
//! highlight, text box and connector go, and issues the drawing work to a
//! pluggable rendering surface.
//!
//! # Pipeline overview
//!
//! 1. **Sequence**: [`Tour`] walks a [`Sequence`] of [`Step`]s (next/previous,
//!    keyboard and pointer input, a one-shot exit signal)
//! 2. **Place**: [`geometry`] turns target and viewport rects into a focus
//!    shape, cover tiles, a text-box position and a connector curve
//! 3. **Draw**: [`Overlay`] applies the placement through a [`Surface`]
//! 4. **Orchestrate** (optional): [`MissionRunner`] persists progress in a
//!    [`ProgressStore`] and resumes unfinished tours; [`AuthorSession`] builds
//!    sequences by pointing and clicking
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No global state**: every tour is an explicit instance; independent
//!   overlay ids never interfere.
//! - **No IO in the engine**: the host owns the event loop, the clock and the
//!   surface; tests run against [`HeadlessSurface`] and [`TestClock`].
//!
//! # Getting started
//!
//! Build a [`Tour`] over a [`Surface`], [`Tour::load`] a sequence, then
//! [`Tour::fire`] it and feed host events through [`Tour::handle_event`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod author;
mod config;
mod foundation;
mod mission;
mod overlay;
mod runtime;
mod surface;
mod tour;

pub use foundation::geometry;

pub use author::picker::{AuthorOptions, AuthorProgressFn, AuthorSession, PickerState};
pub use config::options::{ConfigValue, Mode, OPTION_KEYS, OverlayType, TourOptions};
pub use foundation::error::{WaypostError, WaypostResult};
pub use foundation::geometry::{Connector, CoverRects, FocusShape};
pub use mission::runner::{DEFAULT_MISSION, MissionHooks, MissionRunner, StaticSite};
pub use mission::store::{MemoryStore, MissionRecord, ProgressStore, SITES_KEY, SiteMissions};
pub use overlay::Overlay;
pub use overlay::style::{PICKED_CLASS, SHADOW_CLASS};
pub use runtime::clock::{Clock, Debouncer, SystemClock, TestClock};
pub use surface::headless::{HeadlessSurface, SurfaceOp};
pub use surface::remote::{RemoteSurface, SurfaceCommand};
pub use surface::{MaskStyle, Surface};
pub use tour::input::{InputEvent, Key, PointerZone};
pub use tour::lifecycle::{ExitHandle, ExitReason, ExitResult, ExitSignal};
pub use tour::machine::{CallbackHooks, NoopHooks, Tour, TourHooks};
pub use tour::step::{Sequence, Step, StepId, parse_sequence, sequence_to_json};
