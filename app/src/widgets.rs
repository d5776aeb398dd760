//! Small per-widget state. Each widget owns its state; nothing is
//! shared between widgets and nothing survives a remount.

/// At most one card of a group expanded at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disclosure {
    #[default]
    Collapsed,
    Expanded(i64),
}

impl Disclosure {
    pub fn from_param(expanded: Option<i64>) -> Self {
        expanded.map_or(Disclosure::Collapsed, Disclosure::Expanded)
    }

    /// Clicking the expanded card collapses it; clicking another moves the
    /// expansion there.
    pub fn toggle(self, id: i64) -> Self {
        match self {
            Disclosure::Expanded(current) if current == id => Disclosure::Collapsed,
            _ => Disclosure::Expanded(id),
        }
    }

    pub fn is_expanded(self, id: i64) -> bool {
        self == Disclosure::Expanded(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Open,
}

impl Modal {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("open") => Modal::Open,
            _ => Modal::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self == Modal::Open
    }
}

/// Horizontal row showing `visible` items out of `len`. Paging runs in the
/// page script, which reads the bounds rendered from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Carousel {
    len: usize,
    visible: usize,
}

/// Pointer travel needed before a drag pages the row.
pub const DRAG_THRESHOLD_PX: i32 = 100;

impl Carousel {
    pub fn new(len: usize, visible: usize) -> Self {
        Self {
            len,
            visible: visible.max(1),
        }
    }

    /// Last index that still fills the whole window.
    pub fn max_index(&self) -> usize {
        self.len.saturating_sub(self.visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disclosure_toggles_one_card() {
        let state = Disclosure::default().toggle(3);
        assert!(state.is_expanded(3));
        let state = state.toggle(5);
        assert!(!state.is_expanded(3));
        assert!(state.is_expanded(5));
        assert_eq!(state.toggle(5), Disclosure::Collapsed);
    }

    #[test]
    fn modal_parses_param() {
        assert!(Modal::from_param(Some("open")).is_open());
        assert!(!Modal::from_param(Some("yes")).is_open());
        assert!(!Modal::from_param(None).is_open());
    }

    #[test]
    fn carousel_max_index_is_last_full_window() {
        assert_eq!(Carousel::new(8, 6).max_index(), 2);
        assert_eq!(Carousel::new(20, 6).max_index(), 14);
        assert_eq!(Carousel::new(3, 6).max_index(), 0);
        assert_eq!(Carousel::new(4, 0).max_index(), 3);
    }
}
