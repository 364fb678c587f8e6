//! Gradual servo stepping.

use core::ops::Range;

/// Positions issued when stepping from `current` towards `goal`, one unit at
/// a time.
///
/// Neither the current position nor the goal itself is part of the sequence:
/// 900 → 905 yields 901..=904 and 905 → 900 yields 904 down to 901.
pub fn gradual_steps(
    current: i32,
    goal: i32,
) -> GradualSteps {
    let (range, descending) = if current < goal {
        (current + 1..goal, false)
    } else if current > goal {
        (goal + 1..current, true)
    } else {
        (0..0, false)
    };
    GradualSteps { range, descending }
}

/// Iterator returned by [`gradual_steps`].
#[derive(Debug, Clone)]
pub struct GradualSteps {
    range: Range<i32>,
    descending: bool,
}

impl Iterator for GradualSteps {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.descending {
            self.range.next_back()
        } else {
            self.range.next()
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl ExactSizeIterator for GradualSteps {}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn upward_excludes_both_ends() {
        let steps: Vec<i32> = gradual_steps(900, 905).collect();
        assert_eq!(steps, [901, 902, 903, 904]);
    }

    #[test]
    fn downward_excludes_both_ends() {
        let steps: Vec<i32> = gradual_steps(905, 900).collect();
        assert_eq!(steps, [904, 903, 902, 901]);
    }

    #[test]
    fn adjacent_and_equal_issue_nothing() {
        assert_eq!(gradual_steps(900, 900).len(), 0);
        assert_eq!(gradual_steps(900, 901).len(), 0);
        assert_eq!(gradual_steps(901, 900).len(), 0);
    }
}
