//! Queue navigation: which catalog index plays next
//!
//! Pure functions over `(current index, catalog length, shuffle flag)`.
//! Repeat handling lives in the controller; the navigator only reports
//! whether sequential order wrapped around.
//!
//! Shuffle here is a *weak* shuffle: the next index is drawn uniformly from
//! every index except the current one. There is no memory beyond the
//! immediately preceding track, so a track can come back much sooner than a
//! shuffled permutation would allow.

use rand::Rng;

/// Result of a navigation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Catalog index to play
    pub index: usize,

    /// Sequential order went from the last index back to 0.
    /// With repeat off, the controller treats this as "queue exhausted".
    pub wrapped: bool,
}

/// Next index using the thread-local RNG
///
/// `current` is `None` when nothing (or a non-catalog track) is selected.
/// Returns `None` only for an empty catalog.
pub fn next_index(current: Option<usize>, len: usize, shuffle: bool) -> Option<Step> {
    next_index_with(current, len, shuffle, &mut rand::thread_rng())
}

/// Next index drawing randomness from `rng`
pub fn next_index_with<R: Rng + ?Sized>(
    current: Option<usize>,
    len: usize,
    shuffle: bool,
    rng: &mut R,
) -> Option<Step> {
    if len == 0 {
        return None;
    }

    // Indices past the end (stale) are treated like "no current track"
    let current = current.filter(|&i| i < len);

    if shuffle {
        let index = match current {
            Some(i) if len == 1 => i,
            // Draw from len-1 slots and skip over the current one
            Some(i) => {
                let drawn = rng.gen_range(0..len - 1);
                if drawn >= i {
                    drawn + 1
                } else {
                    drawn
                }
            }
            None => rng.gen_range(0..len),
        };
        return Some(Step {
            index,
            wrapped: false,
        });
    }

    Some(match current {
        Some(i) => {
            let index = (i + 1) % len;
            Step {
                index,
                wrapped: index == 0,
            }
        }
        None => Step {
            index: 0,
            wrapped: false,
        },
    })
}

/// Previous index in sequential order
///
/// From no current track this is the last index. Returns `None` only for an
/// empty catalog.
pub fn previous_index(current: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }

    Some(match current.filter(|&i| i < len) {
        Some(i) => (i + len - 1) % len,
        None => len - 1,
    })
}
