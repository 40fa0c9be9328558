//! Keyboard navigation through the candidate list.
//!
//! Movement is clamped to the list bounds with one twist: trying to move past
//! an edge deselects instead of staying put. Pressing down on the last option
//! clears the highlight, and pressing down again starts over from the top.
//! Disabled options are skipped in the direction of travel.

use crate::option::AutocompleteOption;

/// Direction of travel through the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the end of the list (+1).
    Next,
    /// Towards the start of the list (-1).
    Previous,
}

impl Direction {
    fn offset(self) -> isize {
        match self {
            Self::Next => 1,
            Self::Previous => -1,
        }
    }
}

/// Compute the active index after one move.
///
/// `None` stands for "nothing highlighted" and counts as position -1. The
/// result never points at a disabled option.
pub fn step<V>(
    options: &[AutocompleteOption<V>],
    active: Option<usize>,
    direction: Direction,
) -> Option<usize> {
    let len = options.len();
    if len == 0 {
        return None;
    }
    let last = (len - 1) as isize;

    let mut current = active.filter(|&index| index < len);
    // Each pass moves strictly in one direction, so len + 1 passes always
    // reach either an enabled option or the edge.
    for _ in 0..=len {
        let base = current.map_or(-1, |index| index as isize);
        let next = (base + direction.offset()).clamp(0, last) as usize;

        if current == Some(next) {
            return None;
        }
        if options[next].is_selectable() {
            return Some(next);
        }
        current = Some(next);
    }
    None
}
