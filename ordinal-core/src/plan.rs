//! Shift arithmetic.
//!
//! Everything here is pure: given a sibling count and the positions involved,
//! compute the clamped target and the band of siblings that moves by one.
//! The [`Sequencer`](crate::sequencer::Sequencer) applies these plans through
//! a repository transaction.

use crate::types::{Ordinal, OrdinalRange, Shift};

/// Where a new item lands and which existing siblings make room for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertPlan {
    pub ordinal: Ordinal,
    /// Siblings at `ordinal..` that shift up. `None` when appending.
    pub displaced: Option<OrdinalRange>,
}

/// A non-trivial reposition within one parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub from: Ordinal,
    pub to: Ordinal,
    pub displaced: OrdinalRange,
    pub shift: Shift,
}

/// Clamp an insert position to `[0, count]`. `None` appends.
pub fn clamp_insert(desired: Option<i64>, count: usize) -> Ordinal {
    let end = count as i64;
    match desired {
        None => Ordinal::from_index(count),
        Some(d) => Ordinal::from_index(d.clamp(0, end) as usize),
    }
}

/// Clamp a move target to `[0, count - 1]`.
///
/// `count` includes the moving item, so it is at least one.
pub fn clamp_move(target: i64, count: usize) -> Ordinal {
    let last = count.saturating_sub(1) as i64;
    Ordinal::from_index(target.clamp(0, last) as usize)
}

pub fn plan_insert(count: usize, desired: Option<i64>) -> InsertPlan {
    let ordinal = clamp_insert(desired, count);
    let displaced = match count.checked_sub(1) {
        Some(last) => OrdinalRange::new(ordinal, Ordinal::from_index(last)),
        None => None,
    };
    InsertPlan { ordinal, displaced }
}

/// Returns `None` when the clamped target equals `current`.
pub fn plan_move(current: Ordinal, target: i64, count: usize) -> Option<MovePlan> {
    let to = clamp_move(target, count);
    if to == current {
        return None;
    }
    let (displaced, shift) = if to > current {
        // (current, to] slides toward the front.
        (OrdinalRange::new(Ordinal(current.0 + 1), to)?, Shift::Down)
    } else {
        // [to, current) slides toward the back.
        (OrdinalRange::new(to, Ordinal(current.0 - 1))?, Shift::Up)
    };
    Some(MovePlan {
        from: current,
        to,
        displaced,
        shift,
    })
}

/// The band that shifts down once the item at `ordinal` leaves a parent of
/// `count` siblings (the item included). `None` when it was the last one.
pub fn plan_removal(ordinal: Ordinal, count: usize) -> Option<OrdinalRange> {
    let last = count.checked_sub(1)?;
    OrdinalRange::new(Ordinal(ordinal.0.saturating_add(1)), Ordinal::from_index(last))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn range(lo: u32, hi: u32) -> OrdinalRange {
        OrdinalRange::new(Ordinal(lo), Ordinal(hi)).expect("valid range")
    }

    #[rstest]
    #[case(None, 3, 3)]
    #[case(Some(0), 3, 0)]
    #[case(Some(2), 3, 2)]
    #[case(Some(3), 3, 3)]
    #[case(Some(99), 3, 3)]
    #[case(Some(-4), 3, 0)]
    #[case(Some(5), 0, 0)]
    fn insert_clamps_to_count(
        #[case] desired: Option<i64>,
        #[case] count: usize,
        #[case] expected: u32,
    ) {
        assert_eq!(clamp_insert(desired, count), Ordinal(expected));
    }

    #[rstest]
    #[case(-5, 5, 0)]
    #[case(0, 5, 0)]
    #[case(3, 5, 3)]
    #[case(4, 5, 4)]
    #[case(1000, 5, 4)]
    #[case(7, 1, 0)]
    fn move_clamps_to_last(#[case] target: i64, #[case] count: usize, #[case] expected: u32) {
        assert_eq!(clamp_move(target, count), Ordinal(expected));
    }

    #[test]
    fn append_displaces_nothing() {
        let plan = plan_insert(4, None);
        assert_eq!(plan.ordinal, Ordinal(4));
        assert_eq!(plan.displaced, None);
    }

    #[test]
    fn insert_into_empty_parent() {
        let plan = plan_insert(0, Some(3));
        assert_eq!(plan.ordinal, Ordinal::ZERO);
        assert_eq!(plan.displaced, None);
    }

    #[test]
    fn insert_in_middle_displaces_tail() {
        let plan = plan_insert(5, Some(2));
        assert_eq!(plan.ordinal, Ordinal(2));
        assert_eq!(plan.displaced, Some(range(2, 4)));
    }

    #[test]
    fn moving_later_shifts_band_down() {
        // A B C D E: move B (1) to 3.
        let plan = plan_move(Ordinal(1), 3, 5).expect("plan");
        assert_eq!(plan.to, Ordinal(3));
        assert_eq!(plan.displaced, range(2, 3));
        assert_eq!(plan.shift, Shift::Down);
    }

    #[test]
    fn moving_earlier_shifts_band_up() {
        // A B C D E: move D (3) to 1.
        let plan = plan_move(Ordinal(3), 1, 5).expect("plan");
        assert_eq!(plan.to, Ordinal(1));
        assert_eq!(plan.displaced, range(1, 2));
        assert_eq!(plan.shift, Shift::Up);
    }

    #[rstest]
    #[case(2, 2)]
    #[case(4, 9)]
    #[case(0, -3)]
    fn clamped_move_to_current_is_noop(#[case] current: u32, #[case] target: i64) {
        assert_eq!(plan_move(Ordinal(current), target, 5), None);
    }

    #[test]
    fn out_of_range_move_matches_edge_move() {
        assert_eq!(plan_move(Ordinal(2), -5, 5), plan_move(Ordinal(2), 0, 5));
        assert_eq!(plan_move(Ordinal(2), 1000, 5), plan_move(Ordinal(2), 4, 5));
    }

    #[test]
    fn removal_band() {
        assert_eq!(plan_removal(Ordinal(0), 3), Some(range(1, 2)));
        assert_eq!(plan_removal(Ordinal(2), 3), None);
        assert_eq!(plan_removal(Ordinal(0), 1), None);
        assert_eq!(plan_removal(Ordinal(0), 0), None);
    }
}
