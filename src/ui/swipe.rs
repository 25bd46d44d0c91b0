//! Horizontal swipe gestures between pages

use std::time::Duration;

use crate::document::Document;
use crate::helpers::normalize_path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeDirection {
    /// Finger moved right to left; go to the next page
    Left,
    /// Finger moved left to right; go to the previous page
    Right,
}

/// Gesture thresholds
#[derive(Debug, Clone, Copy)]
pub struct SwipeConfig {
    /// Minimum horizontal travel in pixels
    pub min_distance: f64,
    /// Vertical travel may be at most this fraction of horizontal travel
    pub max_off_axis: f64,
    /// Slower gestures are scrolls, not swipes
    pub max_duration: Duration,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            min_distance: 60.0,
            max_off_axis: 0.5,
            max_duration: Duration::from_millis(600),
        }
    }
}

/// Tracks one touch from start to end
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    config: SwipeConfig,
    start: Option<(Point, Duration)>,
}

impl SwipeTracker {
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            start: None,
        }
    }

    /// Record the touch start; `at` is a monotonic timestamp
    pub fn start(&mut self, point: Point, at: Duration) {
        self.start = Some((point, at));
    }

    /// Forget the current touch (e.g. on multi-touch)
    pub fn cancel(&mut self) {
        self.start = None;
    }

    /// Finish the touch and classify it
    pub fn end(&mut self, point: Point, at: Duration) -> Option<SwipeDirection> {
        let (start, started_at) = self.start.take()?;
        let elapsed = at.checked_sub(started_at)?;
        if elapsed > self.config.max_duration {
            return None;
        }

        let dx = point.x - start.x;
        let dy = point.y - start.y;
        if dx.abs() < self.config.min_distance || dy.abs() > dx.abs() * self.config.max_off_axis {
            return None;
        }

        Some(if dx < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        })
    }
}

/// Page to navigate to after a swipe, given the nav order.
///
/// No wrap-around: swiping past either end goes nowhere.
pub fn swipe_target<'a>(pages: &'a [String], current: &str, direction: SwipeDirection) -> Option<&'a str> {
    let current = normalize_path(current);
    let index = pages.iter().position(|p| normalize_path(p) == current)?;
    let target = match direction {
        SwipeDirection::Left => index.checked_add(1)?,
        SwipeDirection::Right => index.checked_sub(1)?,
    };
    pages.get(target).map(String::as_str)
}

/// Record the pages a swipe leads to as `data-swipe-prev`/`data-swipe-next`
/// on `<body>`. Returns how many neighbors were set.
pub fn mark_swipe_neighbors(doc: &mut Document, pages: &[String], current: &str) -> usize {
    [
        ("data-swipe-prev", SwipeDirection::Right),
        ("data-swipe-next", SwipeDirection::Left),
    ]
    .into_iter()
    .filter_map(|(attr, direction)| Some((attr, swipe_target(pages, current, direction)?)))
    .filter(|(attr, target)| doc.set_tag_attribute("body", attr, target))
    .count()
}
