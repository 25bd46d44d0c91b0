//! Small page behaviors: theme, navigation, swipe gestures, counters and
//! the certificate viewer

mod counter;
mod modal;
mod nav;
mod swipe;
mod theme;

pub use counter::{counter_targets, parse_count, CounterAnimation, DEFAULT_COUNTER_DURATION};
pub use modal::{
    cert_view_sources, close_cert_modal, is_modal_open, open_cert_modal, CERT_VIEW_ATTR,
};
pub use nav::{mark_active_links, set_footer_year, toggle_nav};
pub use swipe::{mark_swipe_neighbors, swipe_target, Point, SwipeConfig, SwipeDirection, SwipeTracker};
pub use theme::{apply_theme, MemoryStore, PreferenceStore, Theme, ThemeToggle, THEME_KEY};
