//! Moving points while keeping smooth points smooth.
//!
//! All motion goes through [`Path::move_point`]. A moved on-curve point
//! carries its handles with it; a moved handle may pull the handle on the
//! far side of a smooth point along with it. The batch operations apply
//! `move_point` to each selected point in index order, so a point's
//! behaviour depends on which of its neighbours are selected.

use std::str::FromStr;

use crate::consts::{MIN_HANDLE_LENGTH, SMOOTH_TOLERANCE};
use crate::design_space::{DPoint, DVec2};
use crate::error::{EditError, Result};
use crate::geom::{self, ProjectionBounds};
use crate::path::{Path, Segment};

/// How a batch move treats the points around the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovePolicy {
    /// Selected points move by the delta; attached handles follow.
    Free,
    /// As `Free`, and the handles of neighbouring curves are rescaled so
    /// that the curve keeps its shape as its endpoint moves.
    Nudge,
    /// Points slide along the lines defined by their unmoved neighbours.
    Slide,
}

impl Default for MovePolicy {
    fn default() -> Self {
        MovePolicy::Free
    }
}

impl FromStr for MovePolicy {
    type Err = EditError;

    fn from_str(s: &str) -> Result<MovePolicy> {
        match s {
            "" | "free" => Ok(MovePolicy::Free),
            "nudge" => Ok(MovePolicy::Nudge),
            "slide" => Ok(MovePolicy::Slide),
            other => Err(EditError::UnknownPolicy(other.to_string())),
        }
    }
}

impl Path {
    /// Move a single point by `delta`.
    ///
    /// An off-curve point whose on-curve anchor is selected does not move;
    /// it will move with its anchor.
    pub fn move_point(&mut self, idx: usize, delta: DVec2) -> Result<()> {
        self.check_index(idx)?;
        if self.points()[idx].is_on_curve() {
            self.move_on_curve(idx, delta, true);
            Ok(())
        } else {
            self.move_handle(idx, delta)
        }
    }

    /// Move every selected point of this path by `delta`, in index order.
    ///
    /// A path with no selection is left untouched, and is not marked dirty.
    pub fn move_selection(&mut self, delta: DVec2) -> Result<()> {
        for idx in self.selected_indices() {
            self.move_point(idx, delta)?;
        }
        Ok(())
    }

    pub fn move_selection_with(&mut self, delta: DVec2, policy: MovePolicy) -> Result<()> {
        match policy {
            MovePolicy::Free => self.move_selection(delta),
            MovePolicy::Nudge => self.nudge_selection(delta),
            MovePolicy::Slide => self.slide_selection(delta),
        }
    }

    /// The on-curve point a handle belongs to.
    ///
    /// A handle has exactly one on-curve neighbour; anything else means the
    /// path is corrupt.
    pub(crate) fn anchor_for(&self, idx: usize) -> Result<usize> {
        let on_curve = |i: &usize| self.points()[*i].is_on_curve();
        let prev = self.prev_idx(idx).filter(on_curve);
        let next = self.next_idx(idx).filter(on_curve);
        match (prev, next) {
            (Some(anchor), None) | (None, Some(anchor)) => Ok(anchor),
            _ => {
                log::warn!("off-curve point {} has no unique anchor", idx);
                Err(EditError::MissingAnchor(idx))
            }
        }
    }

    /// The neighbour of `anchor` on the side away from `from`.
    fn far_neighbour(&self, anchor: usize, from: usize) -> Option<usize> {
        if self.prev_idx(anchor) == Some(from) {
            self.next_idx(anchor)
        } else {
            self.prev_idx(anchor)
        }
    }

    fn move_on_curve(&mut self, idx: usize, delta: DVec2, with_handles: bool) {
        if delta.is_zero() {
            return;
        }
        self.points_mut()[idx].translate(delta);
        if with_handles {
            let mut handles = vec![self.prev_idx(idx), self.next_idx(idx)];
            handles.dedup();
            for handle in handles.into_iter().flatten() {
                if handle != idx && self.points()[handle].is_off_curve() {
                    self.points_mut()[handle].translate(delta);
                }
            }
        }
        self.mark_dirty();
    }

    fn move_handle(&mut self, idx: usize, delta: DVec2) -> Result<()> {
        let anchor = self.anchor_for(idx)?;
        if self.points()[anchor].selected || delta.is_zero() {
            return Ok(());
        }
        self.points_mut()[idx].translate(delta);
        self.mark_dirty();
        if self.points()[anchor].is_smooth() {
            if let Some(other) = self.far_neighbour(anchor, idx) {
                self.constrain_smooth(anchor, idx, other);
            }
        }
        Ok(())
    }

    /// Restore collinearity around a smooth point after one of its handles
    /// moved.
    fn constrain_smooth(&mut self, anchor: usize, handle: usize, other: usize) {
        let on_curve = self.points()[anchor].point;
        let moved = self.points()[handle].point;
        let far = &self.points()[other];
        if far.is_off_curve() && !far.selected {
            if let Some(pos) = opposite_handle(on_curve, moved, far.point) {
                self.points_mut()[other].point = pos;
            }
        } else if far.is_on_curve() {
            // never drag the next node around; the handle gives way instead
            let projection =
                geom::line_projection(far.point, on_curve, moved, ProjectionBounds::Unbounded);
            if let Some((pos, _)) = projection {
                self.points_mut()[handle].point = pos;
            }
        } else {
            let pos = far_side_projection(moved, on_curve, far.point);
            self.points_mut()[other].point = pos;
        }
    }

    fn nudge_selection(&mut self, delta: DVec2) -> Result<()> {
        let before: Vec<DPoint> = self.points().iter().map(|pt| pt.point).collect();
        self.move_selection(delta)?;

        let segments: Vec<Segment> = self.segments().collect();
        for seg in segments {
            if let Segment::Cubic { start, p1, p2, end } = seg {
                let (fixed, handle, moved) =
                    match (self.points()[start].selected, self.points()[end].selected) {
                        (true, false) => (end, p2, start),
                        (false, true) => (start, p1, end),
                        _ => continue,
                    };
                if self.points()[handle].selected {
                    continue;
                }
                let fixed_pt = self.points()[fixed].point;
                let old_len = (before[moved] - fixed_pt).hypot();
                if old_len < MIN_HANDLE_LENGTH {
                    continue;
                }
                let scale = (self.points()[moved].point - fixed_pt).hypot() / old_len;
                let offset = self.points()[handle].point - fixed_pt;
                self.points_mut()[handle].point = fixed_pt + offset * scale;
            }
        }
        Ok(())
    }

    fn slide_selection(&mut self, delta: DVec2) -> Result<()> {
        for idx in self.selected_indices() {
            let current = self.points()[idx].point;
            let target = current + delta;

            if self.points()[idx].is_off_curve() {
                let anchor = self.anchor_for(idx)?;
                let anchor_pt = self.points()[anchor].point;
                let step =
                    geom::line_projection(anchor_pt, current, target, ProjectionBounds::Unbounded)
                        .map(|(proj, _)| proj - current)
                        .unwrap_or(delta);
                self.move_handle(idx, step)?;
                continue;
            }

            let prev = self.prev_idx(idx);
            let next = self.next_idx(idx);
            let prev_selected = prev.map(|i| self.points()[i].selected).unwrap_or(false);
            let next_selected = next.map(|i| self.points()[i].selected).unwrap_or(false);
            match (prev_selected, next_selected) {
                (false, false) => self.slide_between(idx, prev, next, target, delta),
                (true, false) => self.slide_away_from(idx, next, target, delta),
                (false, true) => self.slide_away_from(idx, prev, target, delta),
                (true, true) => self.move_on_curve(idx, delta, true),
            }
        }
        Ok(())
    }

    /// Slide an on-curve point whose neighbours both stay put.
    fn slide_between(
        &mut self,
        idx: usize,
        prev: Option<usize>,
        next: Option<usize>,
        target: DPoint,
        delta: DVec2,
    ) {
        if let (true, Some(prev), Some(next)) = (self.points()[idx].is_smooth(), prev, next) {
            let a = self.points()[prev].point;
            let b = self.points()[next].point;
            if let Some((proj, _)) = geom::line_projection(a, b, target, ProjectionBounds::Clamp) {
                let step = proj - self.points()[idx].point;
                self.move_on_curve(idx, step, false);
                return;
            }
        }
        self.move_on_curve(idx, delta, true);
    }

    /// Slide an on-curve point with one selected neighbour; `far` is the
    /// neighbour that stays put.
    fn slide_away_from(&mut self, idx: usize, far: Option<usize>, target: DPoint, delta: DVec2) {
        let far = match far {
            Some(far) => far,
            None => return self.move_on_curve(idx, delta, true),
        };
        let current = self.points()[idx].point;

        if self.points()[far].is_on_curve() {
            let far_pt = self.points()[far].point;
            let step = geom::line_projection(far_pt, current, target, ProjectionBounds::Unbounded)
                .map(|(proj, _)| proj - current)
                .unwrap_or(delta);
            self.move_on_curve(idx, step, true);
        } else if !self.points()[idx].is_smooth() {
            let forward = self.next_idx(idx) == Some(far);
            let chord_end = self
                .step_idx(idx, forward, 3)
                .filter(|i| *i != idx && self.points()[*i].is_on_curve());
            self.move_on_curve(idx, delta, true);
            if let Some(end) = chord_end {
                let end_pt = self.points()[end].point;
                let node = self.points()[idx].point;
                let old_chord = end_pt - current;
                let new_chord = end_pt - node;
                if !old_chord.is_zero() && !new_chord.is_zero() {
                    let angle = new_chord.atan2() - old_chord.atan2();
                    let offset = self.points()[far].point - node;
                    self.points_mut()[far].point = node + offset.rotated(angle);
                }
            }
        } else {
            self.move_on_curve(idx, delta, true);
        }
    }
}

/// The position of the handle opposite `moved` around a smooth point,
/// keeping its existing length.
fn opposite_handle(on_curve: DPoint, moved: DPoint, other: DPoint) -> Option<DPoint> {
    let raw = moved - on_curve;
    let len = raw.hypot();
    if len < MIN_HANDLE_LENGTH {
        return None;
    }
    // that angle is in the opposite direction, so flip it
    let direction = raw * (-1.0 / len);
    let handle_len = (other - on_curve).hypot();
    Some(on_curve + direction * handle_len)
}

/// Project `point` onto the line through `through` and `on_curve`.
///
/// The projection must land on the far side of `on_curve` from `through`,
/// give or take `SMOOTH_TOLERANCE` of rounding; if it does not, the point
/// collapses onto `on_curve`.
fn far_side_projection(through: DPoint, on_curve: DPoint, point: DPoint) -> DPoint {
    let projection = geom::line_projection(through, on_curve, point, ProjectionBounds::Unbounded);
    let (proj, _) = match projection {
        Some(hit) => hit,
        None => return point,
    };
    let outward = on_curve - through;
    let offset = proj - on_curve;
    let same_side = |offset: f64, outward: f64| offset * outward >= -SMOOTH_TOLERANCE;
    if same_side(offset.x, outward.x) && same_side(offset.y, outward.y) {
        proj
    } else {
        on_curve
    }
}
