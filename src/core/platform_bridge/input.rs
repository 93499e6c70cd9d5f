//=========================================================================
// Input Events
//=========================================================================
//
// Platform-neutral keyboard and pointer input.
//
// Pointers cover both mouse buttons and touch contacts, so games handle a
// tap and a click through the same variants.
//
//   Platform (winit / touch) ──► InputEvent ──► Game::on_input
//                                          └──► EventsManager
//
//=========================================================================

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,

    /// System back navigation (Android back button, browser back key).
    Back,

    /// Fallback for keys not mapped by the platform layer.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state (Shift, Ctrl, Alt).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

//=== Pointers ============================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

/// Identifies the source of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerId {
    /// The mouse while a button is held. Drags carry the button that
    /// was pressed first.
    Mouse(MouseButton),

    /// The mouse cursor with no button held (hover).
    Cursor,

    /// A touch contact, identified by the platform's finger id.
    Touch(u64),
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// Pointer coordinates are in surface pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    KeyDown {
        key: KeyCode,
        modifiers: Modifiers,
    },

    KeyUp {
        key: KeyCode,
        modifiers: Modifiers,
    },

    PointerDown {
        pointer: PointerId,
        x: f32,
        y: f32,
    },

    PointerUp {
        pointer: PointerId,
        x: f32,
        y: f32,
    },

    PointerMoved {
        pointer: PointerId,
        x: f32,
        y: f32,
    },
}

impl InputEvent {
    /// Pointer position for pointer events.
    pub fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Self::PointerDown { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::PointerMoved { x, y, .. } => Some((x, y)),
            _ => None,
        }
    }

    pub fn pointer(&self) -> Option<PointerId> {
        match *self {
            Self::PointerDown { pointer, .. }
            | Self::PointerUp { pointer, .. }
            | Self::PointerMoved { pointer, .. } => Some(pointer),
            _ => None,
        }
    }

    pub fn key(&self) -> Option<KeyCode> {
        match *self {
            Self::KeyDown { key, .. } | Self::KeyUp { key, .. } => Some(key),
            _ => None,
        }
    }

    /// Moves are continuous and may be coalesced; everything else is a
    /// discrete transition whose order matters.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::PointerMoved { .. })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_match_variant() {
        let down = InputEvent::PointerDown {
            pointer: PointerId::Touch(3),
            x: 1.0,
            y: 2.0,
        };
        assert_eq!(down.position(), Some((1.0, 2.0)));
        assert_eq!(down.pointer(), Some(PointerId::Touch(3)));
        assert_eq!(down.key(), None);
        assert!(!down.is_continuous());

        let key = InputEvent::KeyUp {
            key: KeyCode::Back,
            modifiers: Modifiers::ALT,
        };
        assert_eq!(key.key(), Some(KeyCode::Back));
        assert_eq!(key.position(), None);
    }

    #[test]
    fn moves_are_continuous() {
        let moved = InputEvent::PointerMoved {
            pointer: PointerId::Mouse(MouseButton::Left),
            x: 0.0,
            y: 0.0,
        };
        assert!(moved.is_continuous());
    }

    #[test]
    fn default_modifiers_are_none() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
    }
}
