//! The outline of a glyph: an ordered collection of paths.

use kurbo::BezPath;

use crate::design_space::DVec2;
use crate::error::{EditError, Result};
use crate::motion::MovePolicy;
use crate::path::Path;
use crate::selection::Filtered;

/// Removes overlaps between closed paths.
///
/// The boolean geometry lives outside this crate; an implementation takes
/// a set of closed paths and returns their union as new closed paths.
pub trait OverlapRemover {
    fn remove_overlaps(&self, paths: Vec<Path>) -> Vec<Path>;
}

/// The paths of one glyph.
///
/// The outline owns its paths; they are addressed by index, and indices
/// shift when paths are added or removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outline {
    paths: Vec<Path>,
    /// Set when paths are added or removed.
    dirty: bool,
}

impl Outline {
    pub fn new() -> Outline {
        Outline::default()
    }

    pub fn from_paths(paths: Vec<Path>) -> Outline {
        Outline {
            paths,
            dirty: false,
        }
    }

    pub fn from_norad_contours(contours: &[norad::Contour]) -> Result<Outline> {
        let paths = contours
            .iter()
            .map(Path::from_norad)
            .collect::<Result<Vec<_>>>()?;
        Ok(Outline::from_paths(paths))
    }

    pub fn to_norad_contours(&self) -> Vec<norad::Contour> {
        self.paths.iter().map(Path::to_norad).collect()
    }

    /// All paths, as a single bezier.
    pub fn to_bezier(&self) -> BezPath {
        let mut bez = BezPath::new();
        for path in &self.paths {
            path.append_to_bezier(&mut bez);
        }
        bez
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn path(&self, idx: usize) -> Option<&Path> {
        self.paths.get(idx)
    }

    pub fn path_mut(&mut self, idx: usize) -> Result<&mut Path> {
        let len = self.paths.len();
        self.paths
            .get_mut(idx)
            .ok_or(EditError::PathOutOfRange { index: idx, len })
    }

    /// Add a path, returning its index.
    pub fn add_path(&mut self, path: Path) -> usize {
        self.paths.push(path);
        self.dirty = true;
        self.paths.len() - 1
    }

    pub fn remove_path(&mut self, idx: usize) -> Result<Path> {
        self.path_mut(idx)?;
        self.dirty = true;
        Ok(self.paths.remove(idx))
    }

    /// `true` if the outline or any of its paths has changed.
    pub fn is_dirty(&self) -> bool {
        self.dirty || self.paths.iter().any(Path::is_dirty)
    }

    /// The indices of the paths that have changed.
    pub fn dirty_paths(&self) -> Vec<usize> {
        self.paths
            .iter()
            .enumerate()
            .filter(|(_, path)| path.is_dirty())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Returns whether anything has changed, and clears every dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        let mut dirty = std::mem::replace(&mut self.dirty, false);
        for path in &mut self.paths {
            dirty |= path.take_dirty();
        }
        dirty
    }

    pub fn has_selection(&self) -> bool {
        self.paths.iter().any(Path::has_selection)
    }

    pub fn select(&mut self, path: usize, point: usize, selected: bool) -> Result<()> {
        self.path_mut(path)?.select(point, selected)
    }

    pub fn select_all(&mut self) {
        self.paths.iter_mut().for_each(Path::select_all);
    }

    pub fn clear_selection(&mut self) {
        self.paths.iter_mut().for_each(Path::clear_selection);
    }

    /// Move the selected points of every path.
    pub fn move_selection(&mut self, delta: DVec2, policy: MovePolicy) -> Result<()> {
        for path in self.paths.iter_mut().filter(|path| path.has_selection()) {
            path.move_selection_with(delta, policy)?;
        }
        Ok(())
    }

    /// The selected (or, if `invert`, unselected) points of every path, as
    /// new paths.
    pub fn filter_selection(&self, invert: bool) -> Filtered {
        let mut result = Filtered::default();
        for filtered in self.paths.iter().map(|path| path.filter_selection(invert)) {
            result.paths.extend(filtered.paths);
            result.synthesized += filtered.synthesized;
        }
        result
    }

    /// Delete the selected points, breaking paths where points were removed.
    pub fn delete_selection(&mut self) {
        if !self.has_selection() {
            return;
        }
        let paths = std::mem::take(&mut self.paths);
        self.paths = paths.iter().flat_map(Path::delete_selection).collect();
        self.dirty = true;
    }

    /// Delete the selected points, keeping paths together where possible.
    ///
    /// If any path cannot be folded, the outline is left as it was.
    pub fn fold_selection(&mut self) -> Result<()> {
        if !self.has_selection() {
            return Ok(());
        }
        let folded = self
            .paths
            .iter()
            .map(Path::fold_selection)
            .collect::<Result<Vec<_>>>()?;
        self.paths = folded.into_iter().flatten().collect();
        self.dirty = true;
        Ok(())
    }

    /// Break the path at `path_idx` at one of its on-curve points.
    ///
    /// The pieces replace the path, in order.
    pub fn break_path(&mut self, path_idx: usize, point: usize) -> Result<()> {
        let pieces = self.path_mut(path_idx)?.break_at(point)?;
        self.paths.splice(path_idx..=path_idx, pieces);
        self.dirty = true;
        Ok(())
    }

    /// Join the start or end of path `a` to the start or end of path `b`.
    ///
    /// If `a` and `b` are the same path, it is closed. Otherwise the joined
    /// path replaces `a`, `b` is removed, and the new index of the joined
    /// path is returned. With `merge`, the two joined points are assumed to
    /// be duplicates and only one is kept.
    pub fn join_paths(
        &mut self,
        a: usize,
        at_start_a: bool,
        b: usize,
        at_start_b: bool,
        merge: bool,
    ) -> Result<usize> {
        for idx in &[a, b] {
            if self.path_mut(*idx)?.is_closed() {
                return Err(EditError::PathNotOpen(*idx));
            }
        }

        if a == b {
            self.paths[a].close_joined(merge);
            return Ok(a);
        }

        let mut other = self.paths[b].clone();
        if !at_start_b {
            other.reverse();
        }
        let path = &mut self.paths[a];
        if at_start_a {
            path.reverse();
        }
        path.append_path(other, merge);
        self.paths.remove(b);
        self.dirty = true;
        Ok(if b < a { a - 1 } else { a })
    }

    /// Add pasted paths, selecting all of their points.
    pub fn paste_paths(&mut self, paths: Vec<Path>) {
        self.clear_selection();
        for mut path in paths {
            path.select_all();
            path.mark_dirty();
            self.paths.push(path);
        }
        self.dirty = true;
    }

    /// Replace the closed paths with their union.
    ///
    /// Open paths are kept as they are.
    pub fn remove_overlaps(&mut self, remover: &dyn OverlapRemover) {
        let (closed, open): (Vec<Path>, Vec<Path>) = std::mem::take(&mut self.paths)
            .into_iter()
            .partition(Path::is_closed);
        let count = closed.len();
        let merged = remover.remove_overlaps(closed);
        log::debug!("removing overlaps: {} paths became {}", count, merged.len());
        self.paths = open;
        for mut path in merged {
            path.mark_dirty();
            self.paths.push(path);
        }
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design_space::DPoint;
    use crate::path::tests::{circle, line_then_curve, square};

    /// Keeps only the first closed path.
    struct KeepFirst;

    impl OverlapRemover for KeepFirst {
        fn remove_overlaps(&self, mut paths: Vec<Path>) -> Vec<Path> {
            assert!(paths.iter().all(Path::is_closed));
            paths.truncate(1);
            paths
        }
    }

    fn outline() -> Outline {
        Outline::from_paths(vec![square(), line_then_curve(), circle()])
    }

    #[test]
    fn dirty_tracking() {
        let mut outline = outline();
        assert!(!outline.is_dirty());
        outline.select(0, 1, true).unwrap();
        outline
            .move_selection(DVec2::new(0., 5.), MovePolicy::Free)
            .unwrap();
        assert_eq!(outline.dirty_paths(), vec![0]);
        assert!(outline.take_dirty());
        assert!(!outline.is_dirty());

        outline.add_path(Path::new(DPoint::new(1., 1.)));
        assert!(outline.is_dirty());
        assert!(outline.dirty_paths().is_empty());
    }

    #[test]
    fn move_without_selection_is_clean() {
        let mut outline = outline();
        outline
            .move_selection(DVec2::new(4., 4.), MovePolicy::Slide)
            .unwrap();
        assert!(!outline.is_dirty());
    }

    #[test]
    fn bad_indices() {
        let mut outline = outline();
        assert_eq!(
            outline.select(3, 0, true),
            Err(EditError::PathOutOfRange { index: 3, len: 3 })
        );
        assert!(outline.select(0, 4, true).is_err());
        assert!(outline.remove_path(5).is_err());
        assert!(outline.break_path(1, 2).is_err());
    }

    #[test]
    fn delete_and_fold() {
        let mut outline = outline();
        outline.select(0, 1, true).unwrap();
        outline.select(2, 2, true).unwrap();
        let mut folded = outline.clone();

        outline.delete_selection();
        assert_eq!(outline.len(), 3);
        assert!(outline.paths().iter().all(|path| !path.is_closed()));

        folded.fold_selection().unwrap();
        assert_eq!(folded.len(), 3);
        assert!(folded.paths()[0].is_closed());
        assert_eq!(folded.paths()[0].len(), 3);
        assert!(folded.take_dirty());
    }

    #[test]
    fn fold_removes_consumed_paths() {
        let mut outline = outline();
        for idx in 0..4 {
            outline.select(0, idx, true).unwrap();
        }
        outline.fold_selection().unwrap();
        assert_eq!(outline.len(), 2);
    }

    #[test]
    fn failed_fold_leaves_outline_alone() {
        let mut outline = outline();
        outline.select(0, 0, true).unwrap();
        let broken = outline.path_mut(1).unwrap();
        broken.points_mut()[1].typ = crate::point::PointType::OffCurve;
        broken.select(0, true).unwrap();
        let before = outline.clone();

        assert!(matches!(
            outline.fold_selection(),
            Err(EditError::InvalidPath(_))
        ));
        assert_eq!(outline, before);
        assert_eq!(outline.len(), 3);
        assert_eq!(outline.paths()[0].len(), 4);
    }

    #[test]
    fn filter_whole_outline() {
        let mut outline = outline();
        outline.select_all();
        let filtered = outline.filter_selection(false);
        assert_eq!(filtered.paths.len(), 3);
        assert_eq!(filtered.synthesized, 0);
        assert!(outline.filter_selection(true).paths.is_empty());
    }

    #[test]
    fn break_path_replaces_in_place() {
        let mut outline = outline();
        outline.break_path(1, 1).unwrap();
        assert_eq!(outline.len(), 4);
        assert_eq!(outline.paths()[1].len(), 2);
        assert_eq!(outline.paths()[2].len(), 4);
        assert!(outline.paths()[3].is_closed());
    }

    #[test]
    fn paste_selects_pasted() {
        let mut outline = outline();
        outline.select(0, 0, true).unwrap();
        outline.paste_paths(vec![square()]);
        assert_eq!(outline.len(), 4);
        assert!(!outline.paths()[0].has_selection());
        assert_eq!(outline.paths()[3].selected_indices(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn overlap_removal_keeps_open_paths() {
        let mut outline = outline();
        outline.remove_overlaps(&KeepFirst);
        assert_eq!(outline.len(), 2);
        assert!(!outline.paths()[0].is_closed());
        assert!(outline.paths()[1].is_closed());
        assert_eq!(outline.paths()[1].len(), 4);
    }

    #[test]
    fn norad_and_bezier() {
        let outline = outline();
        let contours = outline.to_norad_contours();
        assert_eq!(contours.len(), 3);
        let back = Outline::from_norad_contours(&contours).unwrap();
        assert_eq!(back, outline);

        let bez = outline.to_bezier();
        let moves = bez
            .elements()
            .iter()
            .filter(|el| matches!(el, kurbo::PathEl::MoveTo(_)))
            .count();
        assert_eq!(moves, 3);
    }
}
