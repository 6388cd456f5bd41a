use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Class on the page root marking the slide-out menu as hidden
pub const MARKER_CLASS: &str = "menu-hidden";

/// Panel transform while hidden: shifted left by its own width
pub const HIDDEN_TRANSFORM: &str = "matrix(1, 0, 0, 1, -192, 0)";

/// Panel transform while visible
pub const VISIBLE_TRANSFORM: &str = "matrix(1, 0, 0, 1, 0, 0)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuState {
    Hidden,
    Visible,
}

impl MenuState {
    fn flipped(self) -> Self {
        match self {
            MenuState::Hidden => MenuState::Visible,
            MenuState::Visible => MenuState::Hidden,
        }
    }
}

/// The element carrying the menu marker class
pub trait MarkerSurface {
    fn toggle_marker(&mut self);
    fn has_marker(&self) -> bool;
}

/// The page's body element: its class list, and the menu transform that the
/// stylesheet derives from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRoot {
    classes: BTreeSet<String>,
}

impl PageRoot {
    /// A root in the initial page state, with the marker class present
    pub fn new() -> Self {
        Self {
            classes: BTreeSet::from([MARKER_CLASS.to_string()]),
        }
    }

    /// The `class` attribute value
    pub fn class_attr(&self) -> String {
        self.classes
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Computed transform of the slide-out panel
    pub fn menu_transform(&self) -> &'static str {
        if self.has_marker() {
            HIDDEN_TRANSFORM
        } else {
            VISIBLE_TRANSFORM
        }
    }
}

impl Default for PageRoot {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkerSurface for PageRoot {
    fn toggle_marker(&mut self) {
        if !self.classes.remove(MARKER_CLASS) {
            self.classes.insert(MARKER_CLASS.to_string());
        }
    }

    fn has_marker(&self) -> bool {
        self.classes.contains(MARKER_CLASS)
    }
}

/// Two-state slide-out menu kept in step with a marker on its surface.
///
/// The menu starts `Hidden`; a surface handed over without the marker gets it
/// added so state and marker agree from the first transition.
#[derive(Debug)]
pub struct MenuController<S: MarkerSurface> {
    state: MenuState,
    surface: S,
}

impl<S: MarkerSurface> MenuController<S> {
    pub fn new(mut surface: S) -> Self {
        if !surface.has_marker() {
            surface.toggle_marker();
        }
        Self {
            state: MenuState::Hidden,
            surface,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Flip between hidden and visible
    pub fn toggle(&mut self) -> MenuState {
        self.state = self.state.flipped();
        self.surface.toggle_marker();
        debug_assert_eq!(self.surface.has_marker(), self.state == MenuState::Hidden);
        debug!("Menu toggled to {:?}", self.state);
        self.state
    }

    /// Force the hidden state, as when a feed is picked from the menu
    pub fn hide(&mut self) {
        if self.state == MenuState::Visible {
            self.toggle();
        }
    }
}

impl Default for MenuController<PageRoot> {
    fn default() -> Self {
        Self::new(PageRoot::new())
    }
}
