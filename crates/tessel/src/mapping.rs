//! Mappings describe how a widget's screen estate is produced.
//!
//! A [`Mapping`] is a list of [`MappingEntry`] triples. If `(source, target,
//! widget)` is in the list, the rectangle `source` of the owning widget is
//! rendered by rendering the rectangle of the same size at position `target`
//! of `widget`. If `widget` is `None`, the owning widget renders `source`
//! itself.
//!
//! The screen keeps one mapping from screen space to the widgets that draw
//! it, obtained by [`Mapping::unfolded`] on the top widget. Pending damage is
//! kept as a mapping too: a sub-mapping of the unfolded one, grown with
//! [`Mapping::extend`].

use std::{collections::HashMap, ops::Sub, slice};

use crate::{
    geom::{Position, Rectangle},
    id::WidgetId,
};

/// One delegation rule of a [`Mapping`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingEntry {
    /// Rectangle in the owning widget's local space.
    pub source: Rectangle,
    /// Where the same-sized rectangle starts in `widget`'s local space.
    pub target: Position,
    /// The widget that renders `source`, or `None` for the owner itself.
    pub widget: Option<WidgetId>,
}

impl MappingEntry {
    /// Construct an entry.
    pub fn new(source: Rectangle, target: Position, widget: impl Into<Option<WidgetId>>) -> Self {
        Self {
            source,
            target,
            widget: widget.into(),
        }
    }

    /// An entry that the owning widget renders itself.
    pub fn local(source: Rectangle) -> Self {
        Self {
            source,
            target: source.pos(),
            widget: None,
        }
    }

    /// The image of `source` in the target widget's space.
    pub fn target_rect(&self) -> Rectangle {
        self.source.at(self.target)
    }
}

/// A rectangle in a widget's local coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetRect {
    /// Owning widget.
    pub widget: WidgetId,
    /// Rectangle in the widget's local coordinates.
    pub rect: Rectangle,
}

impl WidgetRect {
    /// Construct a new widget rectangle.
    pub fn new(widget: impl Into<WidgetId>, rect: Rectangle) -> Self {
        Self {
            widget: widget.into(),
            rect,
        }
    }
}

/// Resolves the mapping owned by a widget. The arena implements this;
/// anything that can answer "what does this widget delegate" can be used to
/// unfold a mapping.
pub trait MappingLookup {
    /// The mapping of `widget`, or `None` if it renders everything itself.
    fn mapping_of(&self, widget: WidgetId) -> Option<&Mapping>;

    /// An upper bound on the number of widgets that own a mapping. Delegation
    /// chains longer than this can only arise from a cycle.
    fn node_count(&self) -> usize;
}

impl MappingLookup for HashMap<WidgetId, Mapping> {
    fn mapping_of(&self, widget: WidgetId) -> Option<&Mapping> {
        self.get(&widget)
    }

    fn node_count(&self) -> usize {
        self.len()
    }
}

/// An ordered collection of mapping entries.
#[derive(Debug, Clone, Default)]
pub struct Mapping {
    /// The entries, in priority order.
    entries: Vec<MappingEntry>,
}

impl Mapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Are there any entries?
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> slice::Iter<'_, MappingEntry> {
        self.entries.iter()
    }

    /// The entries as a slice.
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Append an entry.
    pub fn push(&mut self, entry: MappingEntry) {
        self.entries.push(entry);
    }

    /// Total area of the domain, counting overlapping entries twice.
    pub fn area(&self) -> u64 {
        self.entries.iter().map(|e| e.source.area()).sum()
    }

    /// Return the sub-mapping whose image lies within the given widget
    /// rectangles. Each matching entry is clipped so its target covers exactly
    /// the intersection, and its source is shifted to match.
    pub fn restrict_image(&self, targets: &[WidgetRect]) -> Self {
        let mut by_widget: HashMap<WidgetId, Vec<Rectangle>> = HashMap::new();
        for wr in targets {
            by_widget.entry(wr.widget).or_default().push(wr.rect);
        }
        let mut entries = Vec::new();
        for entry in &self.entries {
            let Some(widget) = entry.widget else {
                continue;
            };
            let Some(rects) = by_widget.get(&widget) else {
                continue;
            };
            let image = entry.target_rect();
            for rect in rects {
                let Some(isec) = rect.intersect(&image) else {
                    continue;
                };
                entries.push(MappingEntry {
                    source: isec.at(entry.source.pos() + (isec.pos() - entry.target)),
                    target: isec.pos(),
                    widget: Some(widget),
                });
            }
        }
        Self { entries }
    }

    /// Resolve all delegation. The result maps the same domain, but every
    /// entry names the widget that actually draws it: one whose own mapping is
    /// `None`, or one that claimed the area with a local entry.
    ///
    /// Panics if delegation is cyclic.
    pub fn unfolded(&self, lookup: &dyn MappingLookup) -> Self {
        let limit = lookup.node_count();
        // (entry, delegation depth, resolved)
        let mut stack: Vec<(MappingEntry, usize, bool)> =
            self.entries.iter().rev().map(|e| (*e, 0, false)).collect();
        let mut entries = Vec::new();
        while let Some((entry, depth, resolved)) = stack.pop() {
            if resolved {
                entries.push(entry);
                continue;
            }
            let Some(widget) = entry.widget else {
                entries.push(entry);
                continue;
            };
            let Some(mapping) = lookup.mapping_of(widget) else {
                entries.push(entry);
                continue;
            };
            assert!(
                depth <= limit,
                "cyclic mapping delegation through {widget:?}"
            );
            let image = entry.target_rect();
            let mut expanded = Vec::new();
            for inner in &mapping.entries {
                let Some(isec) = inner.source.intersect(&image) else {
                    continue;
                };
                let source = isec.at(entry.source.pos() + (isec.pos() - image.pos()));
                let target = inner.target + (isec.pos() - inner.source.pos());
                expanded.push(match inner.widget {
                    None => (MappingEntry::new(source, target, widget), depth + 1, true),
                    Some(w) => (MappingEntry::new(source, target, w), depth + 1, false),
                });
            }
            stack.extend(expanded.into_iter().rev());
        }
        Self { entries }
    }

    /// Extend this mapping with `other`. Points in the existing domain keep
    /// their entry; points only in `other`'s domain adopt `other`'s.
    pub fn extend(&mut self, other: &Self) {
        let extra = other.subtract(self);
        self.entries.extend(extra.entries);
    }

    /// Restrict this mapping to its domain minus the domain of `other`.
    ///
    /// Well-formed mappings have no two overlapping entries with different
    /// targets; the result is unspecified otherwise.
    pub fn subtract(&self, other: &Self) -> Self {
        let mut current = self.entries.clone();
        for carve in &other.entries {
            let mut next = Vec::with_capacity(current.len());
            for entry in current {
                if entry.source == carve.source {
                    continue;
                }
                if entry.source.intersect(&carve.source).is_none() {
                    next.push(entry);
                    continue;
                }
                let pieces = entry.source.refine(&carve.source);
                // The final piece is the intersection, which is dropped.
                for piece in &pieces[..pieces.len() - 1] {
                    next.push(MappingEntry {
                        source: *piece,
                        target: entry.target + (piece.pos() - entry.source.pos()),
                        widget: entry.widget,
                    });
                }
            }
            current = next;
        }
        Self { entries: current }
    }
}

impl Sub for &Mapping {
    type Output = Mapping;

    fn sub(self, other: Self) -> Mapping {
        self.subtract(other)
    }
}

impl PartialEq for Mapping {
    fn eq(&self, other: &Self) -> bool {
        if self.entries.len() != other.entries.len() {
            return false;
        }
        let mut counts: HashMap<&MappingEntry, isize> = HashMap::new();
        for e in &self.entries {
            *counts.entry(e).or_default() += 1;
        }
        for e in &other.entries {
            *counts.entry(e).or_default() -= 1;
        }
        counts.values().all(|c| *c == 0)
    }
}

impl Eq for Mapping {}

impl From<Vec<MappingEntry>> for Mapping {
    fn from(entries: Vec<MappingEntry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<MappingEntry> for Mapping {
    fn from_iter<I: IntoIterator<Item = MappingEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a MappingEntry;
    type IntoIter = slice::Iter<'a, MappingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    /// Shorthand rectangle constructor.
    fn r(row: i32, column: i32, height: u32, width: u32) -> Rectangle {
        Rectangle::new(row, column, height, width)
    }

    /// Shorthand position constructor.
    fn p(row: i32, column: i32) -> Position {
        Position::new(row, column)
    }

    /// Allocate `n` distinct widget ids.
    fn ids(n: usize) -> Vec<WidgetId> {
        let mut sm: SlotMap<WidgetId, ()> = SlotMap::with_key();
        (0..n).map(|_| sm.insert(())).collect()
    }

    /// The two mappings used by the subtraction and extension examples.
    fn sample(w: &[WidgetId]) -> (Mapping, Mapping) {
        let m1 = Mapping::from(vec![
            MappingEntry::new(r(0, 0, 5, 5), p(1, 1), w[1]),
            MappingEntry::new(r(0, 7, 2, 2), p(6, 0), w[2]),
            MappingEntry::new(r(7, 0, 2, 2), p(0, 6), w[3]),
        ]);
        let m2 = Mapping::from(vec![
            MappingEntry::new(r(2, 3, 4, 5), p(2, 2), w[4]),
            MappingEntry::new(r(7, 7, 2, 2), p(6, 0), w[5]),
            MappingEntry::new(r(7, 0, 2, 2), p(9, 9), w[0]),
        ]);
        (m1, m2)
    }

    #[test]
    fn subtract() {
        let w = ids(6);
        let (m1, m2) = sample(&w);
        assert_eq!(
            &m1 - &m2,
            Mapping::from(vec![
                MappingEntry::new(r(0, 0, 2, 5), p(1, 1), w[1]),
                MappingEntry::new(r(2, 0, 3, 3), p(3, 1), w[1]),
                MappingEntry::new(r(0, 7, 2, 2), p(6, 0), w[2]),
            ])
        );
    }

    #[test]
    fn subtract_swallowed_entry() {
        let w = ids(2);
        let small = Mapping::from(vec![MappingEntry::new(r(2, 2, 2, 2), p(0, 0), w[0])]);
        let big = Mapping::from(vec![MappingEntry::new(r(0, 0, 10, 10), p(0, 0), w[1])]);
        assert!((&small - &big).is_empty());
        let carved = &big - &small;
        assert_eq!(carved.len(), 4);
        assert_eq!(carved.area(), 96);
        assert!(carved.iter().all(|e| e.source.intersect(&r(2, 2, 2, 2)).is_none()));
    }

    #[test]
    fn extend() {
        let w = ids(6);
        let (m1, mut m2) = sample(&w);
        m2.extend(&m1);
        assert_eq!(
            m2,
            Mapping::from(vec![
                MappingEntry::new(r(0, 0, 2, 5), p(1, 1), w[1]),
                MappingEntry::new(r(2, 0, 3, 3), p(3, 1), w[1]),
                MappingEntry::new(r(0, 7, 2, 2), p(6, 0), w[2]),
                MappingEntry::new(r(2, 3, 4, 5), p(2, 2), w[4]),
                MappingEntry::new(r(7, 7, 2, 2), p(6, 0), w[5]),
                MappingEntry::new(r(7, 0, 2, 2), p(9, 9), w[0]),
            ])
        );
    }

    #[test]
    fn extend_idempotent() {
        let w = ids(6);
        let (m1, m2) = sample(&w);

        let mut same = m1.clone();
        same.extend(&m1);
        assert_eq!(same, m1);

        let mut once = m1.clone();
        once.extend(&m2);
        let mut twice = once.clone();
        twice.extend(&m2);
        assert_eq!(twice, once);
    }

    #[test]
    fn equality_ignores_order() {
        let w = ids(2);
        let a = MappingEntry::new(r(0, 0, 1, 1), p(0, 0), w[0]);
        let b = MappingEntry::new(r(0, 1, 1, 1), p(0, 0), w[1]);
        assert_eq!(Mapping::from(vec![a, b]), Mapping::from(vec![b, a]));
        assert_ne!(Mapping::from(vec![a, a]), Mapping::from(vec![a, b]));
        assert_ne!(Mapping::from(vec![a]), Mapping::from(vec![a, b]));
    }

    #[test]
    fn restrict_image() {
        let w = ids(2);
        let m = Mapping::from(vec![
            MappingEntry::new(r(0, 0, 10, 10), p(0, 0), w[0]),
            MappingEntry::new(r(0, 10, 10, 10), p(5, 5), w[1]),
        ]);
        let restricted = m.restrict_image(&[WidgetRect::new(w[1], r(6, 6, 2, 2))]);
        assert_eq!(
            restricted,
            Mapping::from(vec![MappingEntry::new(r(1, 11, 2, 2), p(6, 6), w[1])])
        );
        assert!(m.restrict_image(&[]).is_empty());
        // Rectangles outside the image contribute nothing.
        assert!(
            m.restrict_image(&[WidgetRect::new(w[0], r(20, 20, 3, 3))])
                .is_empty()
        );
    }

    #[test]
    fn unfold_empty() {
        let lookup: HashMap<WidgetId, Mapping> = HashMap::new();
        assert_eq!(Mapping::new().unfolded(&lookup), Mapping::new());
    }

    #[test]
    fn unfold_leaves_is_identity() {
        let w = ids(2);
        let lookup: HashMap<WidgetId, Mapping> = HashMap::new();
        let m = Mapping::from(vec![
            MappingEntry::new(r(0, 0, 3, 3), p(0, 0), w[0]),
            MappingEntry::new(r(0, 3, 3, 3), p(1, 1), w[1]),
        ]);
        assert_eq!(m.unfolded(&lookup), m);
    }

    #[test]
    fn unfold_nested() {
        // top -> split into left leaf and a right container, which frames a
        // leaf with a one-cell self-rendered border.
        let w = ids(4);
        let (top, left, frame, inner) = (w[0], w[1], w[2], w[3]);
        let mut lookup = HashMap::new();
        lookup.insert(
            top,
            Mapping::from(vec![
                MappingEntry::new(r(0, 0, 4, 4), p(0, 0), left),
                MappingEntry::new(r(0, 4, 4, 4), p(0, 0), frame),
            ]),
        );
        lookup.insert(
            frame,
            Mapping::from(vec![
                MappingEntry::local(r(0, 0, 1, 4)),
                MappingEntry::local(r(3, 0, 1, 4)),
                MappingEntry::local(r(1, 0, 2, 1)),
                MappingEntry::local(r(1, 3, 2, 1)),
                MappingEntry::new(r(1, 1, 2, 2), p(0, 0), inner),
            ]),
        );
        let screen = Mapping::from(vec![MappingEntry::new(r(0, 0, 4, 8), p(0, 0), top)]);
        let unfolded = screen.unfolded(&lookup);
        assert_eq!(
            unfolded,
            Mapping::from(vec![
                MappingEntry::new(r(0, 0, 4, 4), p(0, 0), left),
                MappingEntry::new(r(0, 4, 1, 4), p(0, 0), frame),
                MappingEntry::new(r(3, 4, 1, 4), p(3, 0), frame),
                MappingEntry::new(r(1, 4, 2, 1), p(1, 0), frame),
                MappingEntry::new(r(1, 7, 2, 1), p(1, 3), frame),
                MappingEntry::new(r(1, 5, 2, 2), p(0, 0), inner),
            ])
        );
        assert_eq!(unfolded.area(), 32);
    }

    #[test]
    fn unfold_clips_to_child_domain() {
        let w = ids(2);
        let mut lookup = HashMap::new();
        // The child maps only its top half onward.
        lookup.insert(
            w[0],
            Mapping::from(vec![MappingEntry::new(r(0, 0, 2, 4), p(0, 0), w[1])]),
        );
        let m = Mapping::from(vec![MappingEntry::new(r(10, 10, 4, 4), p(0, 0), w[0])]);
        assert_eq!(
            m.unfolded(&lookup),
            Mapping::from(vec![MappingEntry::new(r(10, 10, 2, 4), p(0, 0), w[1])])
        );
    }

    #[test]
    #[should_panic(expected = "cyclic mapping delegation")]
    fn unfold_cycle_panics() {
        let w = ids(2);
        let mut lookup = HashMap::new();
        lookup.insert(
            w[0],
            Mapping::from(vec![MappingEntry::new(r(0, 0, 2, 2), p(0, 0), w[1])]),
        );
        lookup.insert(
            w[1],
            Mapping::from(vec![MappingEntry::new(r(0, 0, 2, 2), p(0, 0), w[0])]),
        );
        let m = Mapping::from(vec![MappingEntry::new(r(0, 0, 2, 2), p(0, 0), w[0])]);
        let _unfolded = m.unfolded(&lookup);
    }
}
