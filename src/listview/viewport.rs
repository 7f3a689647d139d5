//! Focus and scroll state of the list viewport.
//!
//! The viewport is re-derived on every render pass from the collection length,
//! the available height and the focus carried over from the previous pass.

use std::ops::Range;

/// Where the focused row is anchored inside the visible window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Valign {
    /// Keep the previous scroll offset, moving it only as far as needed to
    /// keep the focused row visible.
    #[default]
    Default,
    /// Place the focused row flush against the bottom edge.
    Bottom,
}

/// Navigation requests handled by the scrolling primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
}

/// Viewport focus, scroll offset and anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewportState {
    focus: usize,
    offset: usize,
    valign: Valign,
    height: usize,
}

impl ViewportState {
    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    /// Index of the first visible row.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub const fn valign(&self) -> Valign {
        self.valign
    }

    /// Rows currently inside the window for a collection of `len` rows.
    #[must_use]
    pub fn visible_range(&self, len: usize) -> Range<usize> {
        let start = self.offset.min(len);
        let end = self.offset.saturating_add(self.height).min(len);
        start..end
    }

    /// Whether the first row of the list is inside the window.
    #[must_use]
    pub const fn top_visible(&self) -> bool {
        self.offset == 0
    }

    /// Focus the first row and scroll to the top.
    pub fn reset_to_top(&mut self) {
        self.focus = 0;
        self.offset = 0;
        self.valign = Valign::Default;
    }

    /// Move focus to `index`, keeping the anchor and scroll offset for the
    /// next layout pass.
    pub fn set_focus(&mut self, index: usize) {
        self.focus = index;
    }

    /// Keep focus inside a collection of `len` rows.
    pub fn clamp(&mut self, len: usize) {
        if len == 0 {
            self.reset_to_top();
        } else if self.focus >= len {
            self.focus = len - 1;
        }
    }

    /// Snap focus to the last row of the window and anchor it at the bottom,
    /// unless the top of the list is already visible.
    ///
    /// Returns whether focus was moved.
    pub fn follow_bottom(&mut self, len: usize) -> bool {
        if len == 0 || self.height == 0 || self.top_visible() {
            return false;
        }
        self.focus = self.height.min(len) - 1;
        self.valign = Valign::Bottom;
        true
    }

    /// Recompute the scroll offset for the current focus, anchor and height.
    pub fn layout(&mut self, len: usize) {
        if len == 0 || self.height == 0 {
            self.offset = 0;
            return;
        }
        match self.valign {
            Valign::Bottom => {
                self.offset = (self.focus + 1).saturating_sub(self.height);
            }
            Valign::Default => {
                if self.focus < self.offset {
                    self.offset = self.focus;
                } else if self.focus >= self.offset + self.height {
                    self.offset = self.focus + 1 - self.height;
                }
                self.offset = self.offset.min(len.saturating_sub(self.height));
            }
        }
    }

    /// One render pass: adopt `height`, clamp focus, apply auto-follow when
    /// `follow` is set, and lay out the window.
    ///
    /// Returns whether auto-follow moved focus.
    pub fn prepare(&mut self, len: usize, height: usize, follow: bool) -> bool {
        self.height = height;
        self.clamp(len);
        self.layout(len);
        let moved = follow && self.follow_bottom(len);
        if moved {
            self.layout(len);
        }
        moved
    }

    /// Scrolling primitive for navigation keys.
    ///
    /// Returns whether focus changed.
    pub fn navigate(&mut self, nav: Nav, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        let before = self.focus;
        let last = len - 1;
        let page = self.height.max(1);
        self.focus = match nav {
            Nav::Up => self.focus.saturating_sub(1),
            Nav::Down => (self.focus + 1).min(last),
            Nav::PageUp => self.focus.saturating_sub(page),
            Nav::PageDown => (self.focus + page).min(last),
            Nav::Home => 0,
            Nav::End => last,
        };
        self.valign = Valign::Default;
        self.layout(len);
        self.focus != before
    }
}
