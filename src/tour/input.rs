use kurbo::Point;

/// Keys the engine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Escape key.
    Escape,
    /// Space bar.
    Space,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Any character key (authoring uses `Ctrl+S`).
    Char(char),
}

/// Which layer a pointer event landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerZone {
    /// The overlay mask or a cover tile.
    Overlay,
    /// The floating text box.
    TextBox,
    /// The underlying page.
    Page,
}

/// A user input event dispatched into the engine by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    /// A key-up event.
    Key {
        /// Released key.
        key: Key,
        /// Whether Ctrl was held.
        ctrl: bool,
    },
    /// A pointer-up event.
    PointerUp {
        /// Pointer position in viewport coordinates.
        pos: Point,
        /// Layer hit by the pointer.
        zone: PointerZone,
    },
}
