//! Operations on the selected points of a path.

use crate::error::{EditError, Result};
use crate::path::Path;
use crate::point::PathPoint;

/// The paths cut out of a path by [`Path::filter_selection`].
#[derive(Debug, Clone, Default)]
pub struct Filtered {
    pub paths: Vec<Path>,
    /// The number of points that were copied in to complete segments that
    /// were only partly kept. These points appear in `paths` in addition to
    /// the kept points.
    pub synthesized: usize,
}

impl Filtered {
    /// The total number of points in the resulting paths.
    pub fn point_count(&self) -> usize {
        self.paths.iter().map(Path::len).sum()
    }
}

impl Path {
    /// The selected points of this path (or, if `invert`, the unselected
    /// points) as new open paths.
    ///
    /// This path is not modified.
    pub fn filter_selection(&self, invert: bool) -> Filtered {
        let keep = |pt: &PathPoint| pt.selected != invert;
        if self.points().iter().all(keep) {
            return Filtered {
                paths: vec![self.clone()],
                synthesized: 0,
            };
        }

        let mut filtered = Filtered::default();
        for run in self.runs(keep) {
            let prefix = self.missing_points(run[0], false);
            let suffix = self.missing_points(run[run.len() - 1], true);
            let mut points: Vec<PathPoint> = prefix
                .iter()
                .rev()
                .chain(run.iter())
                .chain(suffix.iter())
                .map(|idx| self.points()[*idx].detached())
                .collect();
            if points.first().map(PathPoint::is_off_curve).unwrap_or(true) {
                log::warn!("dropping malformed selection run {:?}", run);
                continue;
            }
            clear_end_smoothness(&mut points);
            filtered.synthesized += prefix.len() + suffix.len();
            filtered.paths.push(Path::from_raw_parts(points, false));
        }
        filtered
    }

    /// Remove the selected points, returning the paths made of what is
    /// left.
    ///
    /// Handles left without a neighbouring segment are dropped, as are runs
    /// that are reduced to a single point. A path with no selection is
    /// returned as is.
    pub fn delete_selection(&self) -> Vec<Path> {
        if !self.has_selection() {
            return vec![self.clone()];
        }

        let mut result = Vec::new();
        for run in self.runs(|pt| !pt.selected) {
            let points = self.points();
            let first = run.iter().position(|idx| points[*idx].is_on_curve());
            let last = run.iter().rposition(|idx| points[*idx].is_on_curve());
            let (first, last) = match (first, last) {
                (Some(first), Some(last)) if first < last => (first, last),
                _ => continue,
            };
            let mut points: Vec<PathPoint> = run[first..=last]
                .iter()
                .map(|idx| points[*idx].detached())
                .collect();
            clear_end_smoothness(&mut points);
            let mut path = Path::from_raw_parts(points, false);
            path.mark_dirty();
            result.push(path);
        }
        log::debug!("deleting selection left {} paths", result.len());
        result
    }

    /// Remove the selected points while keeping the rest of the path
    /// together.
    ///
    /// Removing an on-curve point removes the segment it closes; removing a
    /// handle turns its curve into a line. Returns `None` if nothing is left,
    /// and an error if the path was not well formed to begin with.
    pub fn fold_selection(&self) -> Result<Option<Path>> {
        let mut path = self.clone();
        while let Some(idx) = path.points().iter().position(|pt| pt.selected) {
            let doomed = path.points_to_fold(idx);
            let mut i = 0;
            path.points_mut().retain(|_| {
                i += 1;
                !doomed.contains(&(i - 1))
            });
            path.mark_dirty();
            if path.is_empty() {
                return Ok(None);
            }
            path.normalize();
            if !path.debug_validate() {
                log::warn!("error folding point {} of\n{:?}", idx, self);
                return Err(EditError::InvalidPath(format!(
                    "folding point {} left {:?}",
                    idx, path
                )));
            }
        }
        if !path.is_closed() {
            path.points_mut()[0].smooth = false;
        }
        Ok(Some(path))
    }

    /// The points that go away along with the point at `idx`.
    fn points_to_fold(&self, idx: usize) -> Vec<usize> {
        let is_off = |i: &usize| self.points()[*i].is_off_curve();
        let prev = self.prev_idx(idx);
        let next = self.next_idx(idx);
        let prev_off = prev.filter(is_off);
        let next_off = next.filter(is_off);

        let mut doomed = vec![idx];
        if self.points()[idx].is_off_curve() {
            doomed.extend(prev_off.or(next_off));
        } else if prev_off.is_some() && next_off.is_some() {
            doomed.extend(prev_off);
            doomed.extend(next_off);
        // curve at end of open path: remove whole segment
        } else if prev_off.is_some() && next.is_none() {
            doomed.extend(prev_off);
            doomed.extend(self.step_idx(idx, false, 2));
        } else if next_off.is_some() && prev.is_none() {
            doomed.extend(next_off);
            doomed.extend(self.step_idx(idx, true, 2));
        }
        doomed
    }

    /// Maximal runs of consecutive points matching `keep`, as indices.
    ///
    /// Runs of a closed path never wrap past the end of the point list; the
    /// walk starts just after a point that is not kept.
    fn runs(&self, keep: impl Fn(&PathPoint) -> bool) -> Vec<Vec<usize>> {
        let len = self.len();
        let start = if self.is_closed() {
            self.points()
                .iter()
                .position(|pt| !keep(pt))
                .map(|idx| idx + 1)
                .unwrap_or(0)
        } else {
            0
        };

        let mut runs = Vec::new();
        let mut current = Vec::new();
        for offset in 0..len {
            let idx = (start + offset) % len;
            if keep(&self.points()[idx]) {
                current.push(idx);
            } else if !current.is_empty() {
                runs.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    /// The points needed to complete the segment that `idx` is part of, in
    /// walk order away from `idx`.
    fn missing_points(&self, idx: usize, forward: bool) -> Vec<usize> {
        let mut missing = Vec::new();
        let mut idx = idx;
        while self.points()[idx].is_off_curve() && missing.len() < 2 {
            idx = match self.step_idx(idx, forward, 1) {
                Some(idx) => idx,
                None => break,
            };
            missing.push(idx);
        }
        missing
    }
}

fn clear_end_smoothness(points: &mut [PathPoint]) {
    if let Some(first) = points.first_mut() {
        first.smooth = false;
    }
    if let Some(last) = points.last_mut() {
        last.smooth = false;
    }
}
