//! Ordered view list plus the special settings view.
//!
//! Regular views are cycled with left/right taps. The settings view sits
//! outside the cycle: opening it remembers the regular view that was active,
//! and leaving it always goes back there.

use heapless::Vec;

use crate::views::{View, ViewKind};

/// Regular views the registry can hold.
pub const MAX_VIEWS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActiveView {
    Regular(usize),
    Settings { return_to: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Previous,
    Next,
}

pub struct ViewRegistry {
    regular: Vec<ViewKind, MAX_VIEWS>,
    settings: Option<ViewKind>,
    active: ActiveView,
}

impl ViewRegistry {
    pub const fn new() -> Self {
        Self {
            regular: Vec::new(),
            settings: None,
            active: ActiveView::Regular(0),
        }
    }

    /// Append a regular view. Hands the view back when the registry is full.
    pub fn push(
        &mut self,
        view: impl Into<ViewKind>,
    ) -> Result<(), ViewKind> {
        self.regular.push(view.into())
    }

    pub fn set_settings(
        &mut self,
        view: impl Into<ViewKind>,
    ) {
        self.settings = Some(view.into());
    }

    #[inline]
    pub fn len(&self) -> usize { self.regular.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.regular.is_empty() }

    #[inline]
    pub const fn active(&self) -> ActiveView { self.active }

    #[inline]
    pub const fn is_settings_active(&self) -> bool { matches!(self.active, ActiveView::Settings { .. }) }

    /// The view that renders and receives input; `None` for an empty registry.
    pub fn active_mut(&mut self) -> Option<&mut ViewKind> {
        match self.active {
            ActiveView::Regular(i) => self.regular.get_mut(i),
            ActiveView::Settings { .. } => self.settings.as_mut(),
        }
    }

    /// Move one step through the regular views, wrapping at both ends.
    /// From the settings view this behaves like [`Self::leave_settings`].
    ///
    /// Returns the newly active view's name.
    pub fn navigate(
        &mut self,
        direction: Direction,
    ) -> Option<&'static str> {
        let n = self.regular.len();
        if n == 0 {
            return None;
        }
        let next = match self.active {
            ActiveView::Settings { return_to } => return_to,
            ActiveView::Regular(i) => match direction {
                Direction::Next => (i + 1) % n,
                Direction::Previous => (i + n - 1) % n,
            },
        };
        self.activate(ActiveView::Regular(next.min(n - 1)))
    }

    /// Switch to the settings view. No-op when it is already active or none
    /// was registered.
    pub fn open_settings(&mut self) -> Option<&'static str> {
        let ActiveView::Regular(current) = self.active else {
            return None;
        };
        self.settings.as_ref()?;
        self.activate(ActiveView::Settings { return_to: current })
    }

    /// Return from settings to the view that was active before it.
    pub fn leave_settings(&mut self) -> Option<&'static str> {
        let ActiveView::Settings { return_to } = self.active else {
            return None;
        };
        if self.regular.is_empty() {
            return None;
        }
        self.activate(ActiveView::Regular(return_to.min(self.regular.len() - 1)))
    }

    /// Force the active view to redraw from scratch.
    pub fn refresh_active(&mut self) {
        if let Some(view) = self.active_mut() {
            view.force_redraw();
        }
    }

    fn activate(
        &mut self,
        target: ActiveView,
    ) -> Option<&'static str> {
        self.active = target;
        let view = self.active_mut()?;
        view.force_redraw();
        Some(view.name())
    }
}

impl Default for ViewRegistry {
    fn default() -> Self { Self::new() }
}
