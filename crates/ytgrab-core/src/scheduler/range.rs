//! Slice-style (start, stop, step) selection over a batch snapshot.

use crate::error::DownloadError;

/// Raw selection as given by the caller. Validated against the batch length
/// before anything is dispatched; a bad range fails the whole call with no
/// partial work started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    /// First index to select.
    pub start: usize,
    /// Exclusive upper bound; `None` means the batch length.
    pub stop: Option<usize>,
    /// Distance between selected indices. Must be >= 1.
    pub step: usize,
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self {
            start: 0,
            stop: None,
            step: 1,
        }
    }
}

impl RangeSpec {
    /// Validates against `len` and pins the concrete bounds.
    pub fn resolve(&self, len: usize) -> Result<ResolvedRange, DownloadError> {
        if self.step == 0 {
            return Err(DownloadError::InvalidRange(
                "step must be >= 1, got 0".to_string(),
            ));
        }
        let stop = self.stop.unwrap_or(len);
        if stop > len {
            return Err(DownloadError::InvalidRange(format!(
                "stop ({stop}) exceeds batch length ({len})"
            )));
        }
        Ok(ResolvedRange {
            start: self.start,
            stop,
            step: self.step,
        })
    }
}

/// Validated selection; iterate `indices` for the dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRange {
    start: usize,
    stop: usize,
    step: usize,
}

impl ResolvedRange {
    /// Selected indices in dispatch order: start, start+step, ... < stop.
    pub fn indices(&self) -> impl Iterator<Item = usize> {
        (self.start..self.stop).step_by(self.step)
    }

    /// Number of selected indices.
    pub fn count(&self) -> usize {
        if self.start >= self.stop {
            0
        } else {
            (self.stop - self.start).div_ceil(self.step)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_of(spec: RangeSpec, len: usize) -> Vec<usize> {
        spec.resolve(len).unwrap().indices().collect()
    }

    #[test]
    fn default_selects_everything() {
        assert_eq!(indices_of(RangeSpec::default(), 4), vec![0, 1, 2, 3]);
    }

    #[test]
    fn step_two_over_seven_items() {
        let spec = RangeSpec {
            start: 0,
            stop: Some(7),
            step: 2,
        };
        assert_eq!(indices_of(spec, 7), vec![0, 2, 4, 6]);
        assert_eq!(spec.resolve(7).unwrap().count(), 4);
    }

    #[test]
    fn start_offset_and_step() {
        let spec = RangeSpec {
            start: 1,
            stop: None,
            step: 3,
        };
        assert_eq!(indices_of(spec, 10), vec![1, 4, 7]);
    }

    #[test]
    fn start_at_or_past_stop_is_empty() {
        let spec = RangeSpec {
            start: 5,
            stop: Some(5),
            step: 1,
        };
        assert_eq!(indices_of(spec, 5), Vec::<usize>::new());
        let spec = RangeSpec {
            start: 9,
            stop: Some(3),
            step: 1,
        };
        assert_eq!(indices_of(spec, 10), Vec::<usize>::new());
        assert_eq!(spec.resolve(10).unwrap().count(), 0);
    }

    #[test]
    fn zero_step_is_invalid() {
        let spec = RangeSpec {
            start: 0,
            stop: None,
            step: 0,
        };
        assert!(matches!(
            spec.resolve(3).unwrap_err(),
            DownloadError::InvalidRange(_)
        ));
    }

    #[test]
    fn stop_beyond_len_is_invalid() {
        let spec = RangeSpec {
            start: 0,
            stop: Some(11),
            step: 1,
        };
        assert!(matches!(
            spec.resolve(10).unwrap_err(),
            DownloadError::InvalidRange(_)
        ));
    }
}
