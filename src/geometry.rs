//! Rectangle-set algebra for decoration hit-testing and damage scoping.

use std::fmt;

use smithay::utils::{Logical, Physical, Point, Rectangle, Scale};

/// A union of pixel rectangles, in decoration-local logical coordinates
/// unless stated otherwise.
///
/// The stored rectangles never overlap, so every pixel of the region is
/// covered exactly once and iterating the rectangles never paints twice.
pub struct Region<Kind = Logical> {
    rects: Vec<Rectangle<i32, Kind>>,
}

impl<Kind> Default for Region<Kind> {
    fn default() -> Self {
        Self { rects: Vec::new() }
    }
}

impl<Kind> Clone for Region<Kind>
where
    Rectangle<i32, Kind>: Clone,
{
    fn clone(&self) -> Self {
        Self {
            rects: self.rects.clone(),
        }
    }
}

impl<Kind> PartialEq for Region<Kind>
where
    Rectangle<i32, Kind>: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.rects == other.rects
    }
}

impl<Kind> fmt::Debug for Region<Kind>
where
    Rectangle<i32, Kind>: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region").field("rects", &self.rects).finish()
    }
}

impl<Kind> Region<Kind> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rects(rects: impl IntoIterator<Item = Rectangle<i32, Kind>>) -> Self {
        let mut region = Self::new();
        for rect in rects {
            region.add_rect(rect);
        }
        region
    }

    /// Adds `rect` to the region, keeping only the parts not already covered.
    pub fn add_rect(&mut self, rect: Rectangle<i32, Kind>) {
        if rect_is_empty(rect) {
            return;
        }

        let mut pieces = vec![rect];
        for existing in &self.rects {
            pieces = pieces
                .into_iter()
                .flat_map(|piece| {
                    if piece.overlaps(*existing) {
                        piece.subtract_rect(*existing)
                    } else {
                        vec![piece]
                    }
                })
                .filter(|piece| !rect_is_empty(*piece))
                .collect();
            if pieces.is_empty() {
                return;
            }
        }
        self.rects.extend(pieces);
    }

    /// Pixels covered by both regions.
    pub fn intersect(&self, other: &Self) -> Self {
        let rects = self
            .rects
            .iter()
            .flat_map(|rect| {
                other
                    .rects
                    .iter()
                    .filter_map(move |clip| rect.intersection(*clip))
            })
            .filter(|rect| !rect_is_empty(*rect))
            .collect();
        Self { rects }
    }

    pub fn clear(&mut self) {
        self.rects.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn rects(&self) -> &[Rectangle<i32, Kind>] {
        &self.rects
    }

    pub fn contains(&self, point: impl Into<Point<i32, Kind>>) -> bool {
        let point = point.into();
        self.rects.iter().any(|rect| rect.contains(point))
    }

    /// Number of pixels covered by the region.
    pub fn area(&self) -> i64 {
        self.rects
            .iter()
            .map(|rect| i64::from(rect.size.w) * i64::from(rect.size.h))
            .sum()
    }

    /// Smallest rectangle enclosing the whole region.
    pub fn bbox(&self) -> Option<Rectangle<i32, Kind>> {
        let mut rects = self.rects.iter().copied();
        let first = rects.next()?;
        Some(rects.fold(first, |acc, rect| acc.merge(rect)))
    }

    pub fn translated(&self, offset: Point<i32, Kind>) -> Self {
        Self {
            rects: self
                .rects
                .iter()
                .map(|rect| Rectangle::new(rect.loc + offset, rect.size))
                .collect(),
        }
    }
}

impl Region<Logical> {
    /// The region in physical pixels at `scale`.
    ///
    /// Corners are rounded independently, so neighbouring rectangles stay
    /// adjacent after scaling.
    pub fn to_physical(&self, scale: Scale<f64>) -> Region<Physical> {
        Region::from_rects(
            self.rects
                .iter()
                .map(|rect| rect.to_physical_precise_round(scale)),
        )
    }
}

fn rect_is_empty<Kind>(rect: Rectangle<i32, Kind>) -> bool {
    rect.size.w <= 0 || rect.size.h <= 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i32, y: i32, w: i32, h: i32) -> Rectangle<i32, Logical> {
        Rectangle::new((x, y).into(), (w, h).into())
    }

    #[test]
    fn overlapping_rects_are_counted_once() {
        let region = Region::from_rects([rect(0, 0, 10, 10), rect(5, 5, 10, 10)]);
        assert_eq!(region.area(), 175);
        assert!(region.contains((12, 12)));
        assert!(!region.contains((12, 2)));
    }

    #[test]
    fn contained_rect_adds_nothing() {
        let region = Region::from_rects([rect(0, 0, 10, 10), rect(2, 2, 3, 3)]);
        assert_eq!(region.rects().len(), 1);
        assert_eq!(region.area(), 100);
    }

    #[test]
    fn empty_rects_are_ignored() {
        let region = Region::from_rects([rect(0, 0, 0, 10), rect(3, 3, 5, 0)]);
        assert!(region.is_empty());
        assert_eq!(region.bbox(), None);
    }

    #[test]
    fn translation_moves_every_rect() {
        let region = Region::from_rects([rect(0, 0, 4, 4), rect(10, 0, 4, 4)]);
        let moved = region.translated((100, 50).into());
        assert!(moved.contains((101, 51)));
        assert!(moved.contains((111, 53)));
        assert!(!moved.contains((1, 1)));
        assert_eq!(moved.bbox(), Some(rect(100, 50, 14, 4)));
    }

    #[test]
    fn physical_rects_follow_scale() {
        let region = Region::from_rects([rect(0, 0, 10, 4)]);
        let physical = region.to_physical(Scale::from(2.0));
        assert_eq!(physical.rects(), [Rectangle::new((0, 0).into(), (20, 8).into())]);
    }

    #[test]
    fn intersection_keeps_pixels_covered_once() {
        let frame = Region::from_rects([rect(0, 0, 20, 4), rect(0, 4, 4, 16)]);
        let damage = Region::from_rects([rect(0, 0, 10, 10), rect(5, 0, 10, 10)]);
        let clipped = frame.intersect(&damage);

        assert_eq!(clipped.area(), 15 * 4 + 4 * 6);
        assert!(clipped.contains((7, 1)));
        assert!(!clipped.contains((7, 7)));
        for (index, a) in clipped.rects().iter().enumerate() {
            for b in &clipped.rects()[index + 1..] {
                assert!(!a.overlaps(*b), "{a:?} overlaps {b:?}");
            }
        }
    }
}
