//! Catalog scan used to recover from a rejected move.
//!
//! Starting next to the rejected position `p`, candidates alternate outward:
//! `p-1, p+1, p-2, p+2, ...`. Positions that fall off either end are skipped
//! and the other direction continues until it is exhausted too. Every
//! in-range position other than `p` is produced exactly once, so a scan ends
//! after at most `len - 1` candidates.

/// Iterator over catalog positions radiating out from a center.
///
/// ```
/// use columns_training::repair::RepairScan;
///
/// let order = RepairScan::around(2, 6).collect::<Vec<_>>();
/// assert_eq!(order, [1, 3, 0, 4, 5]);
/// ```
#[derive(Debug, Clone)]
pub struct RepairScan {
    center: usize,
    len: usize,
    step: usize,
    upper_turn: bool,
    include_center: bool,
}

impl RepairScan {
    /// Scan around a rejected position, excluding the position itself.
    ///
    /// `center` may lie outside the catalog (an out-of-range selection); the
    /// scan then walks down from it into the catalog.
    #[must_use]
    pub fn around(center: usize, len: usize) -> Self {
        Self {
            center,
            len,
            step: 1,
            upper_turn: false,
            include_center: false,
        }
    }

    /// Scan of the whole catalog in position order, for when nothing was
    /// selected.
    #[must_use]
    pub fn from_start(len: usize) -> Self {
        Self {
            include_center: true,
            ..Self::around(0, len)
        }
    }
}

impl Iterator for RepairScan {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.include_center {
            self.include_center = false;
            if self.center < self.len {
                return Some(self.center);
            }
        }
        loop {
            let step = self.step;
            let lower_exhausted = step > self.center;
            let upper_exhausted = self.center.saturating_add(step) >= self.len;
            if lower_exhausted && upper_exhausted {
                return None;
            }
            let candidate = if self.upper_turn {
                self.upper_turn = false;
                self.step += 1;
                (!upper_exhausted).then(|| self.center + step)
            } else {
                self.upper_turn = true;
                (!lower_exhausted).then(|| self.center - step)
            };
            if let Some(position) = candidate.filter(|&p| p < self.len) {
                return Some(position);
            }
        }
    }
}
