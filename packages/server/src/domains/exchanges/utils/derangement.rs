//! Derangement generation: a shuffle in which nothing stays in place.
//!
//! Algorithm:
//! 1. Shuffle up to `max_attempts` times and keep the first shuffle with no
//!    fixed point. About 37% of uniform shuffles qualify, so 100 attempts
//!    fail with probability around 1e-20.
//! 2. Otherwise rotate by one: `result[i] = items[(i + 1) % n]`. With unique
//!    items and n >= 2, position i always receives the item from a different
//!    position, so the rotation is a derangement for every n >= 2.
//!
//! The result is any permutation without fixed points, not necessarily a
//! single cycle: for four people, two mutual pairs is a valid draw.

use fastrand::Rng;

/// Shuffle attempts before falling back to rotation
pub const MAX_SHUFFLE_ATTEMPTS: usize = 100;

/// Derange `items` with the default attempt bound.
///
/// Fewer than two items cannot be deranged; they are returned unchanged.
pub fn derange<T: Clone + PartialEq>(items: &[T], rng: &mut Rng) -> Vec<T> {
    derange_with_attempts(items, MAX_SHUFFLE_ATTEMPTS, rng)
}

/// Derange `items`, trying at most `max_attempts` random shuffles.
///
/// `max_attempts = 0` goes straight to the rotation.
pub fn derange_with_attempts<T: Clone + PartialEq>(
    items: &[T],
    max_attempts: usize,
    rng: &mut Rng,
) -> Vec<T> {
    if items.len() < 2 {
        return items.to_vec();
    }

    let mut candidate = items.to_vec();
    for _ in 0..max_attempts {
        rng.shuffle(&mut candidate);
        if is_derangement_of(items, &candidate) {
            return candidate;
        }
    }

    rotate_by_one(items)
}

/// Cyclic shift left by one position.
pub fn rotate_by_one<T: Clone>(items: &[T]) -> Vec<T> {
    let mut rotated = items.to_vec();
    if !rotated.is_empty() {
        rotated.rotate_left(1);
    }
    rotated
}

/// True when `candidate` has the same length as `original` and differs from
/// it at every position.
pub fn is_derangement_of<T: PartialEq>(original: &[T], candidate: &[T]) -> bool {
    original.len() == candidate.len() && original.iter().zip(candidate).all(|(a, b)| a != b)
}
