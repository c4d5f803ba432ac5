//! 3-D k-d tree for photon positions.
//!
//! The tree has two phases. A [`KdTreeBuilder`] collects points; `build()`
//! partitions them once and returns a frozen [`KdTree`] that only answers
//! radius queries. There is no insertion or deletion after the build.
//!
//! Construction splits at the median of the longest axis of each node's point
//! bounds (`select_nth_unstable_by`, O(N log N) overall). Queries prune whole
//! subtrees whose bounds lie farther than the radius.

use prism_math::{Aabb, Vec3};
use std::cmp::Ordering;

/// Maximum points per leaf before splitting.
const LEAF_MAX_SIZE: usize = 8;

/// Tree node - either a branch with two children or a leaf with points.
enum KdNode {
    /// Internal node with two children.
    Branch {
        left: Box<KdNode>,
        right: Box<KdNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of points.
    Leaf { points: Vec<Vec3>, bbox: Aabb },
    /// Empty tree.
    Empty,
}

impl KdNode {
    fn build(mut points: Vec<Vec3>) -> Self {
        if points.is_empty() {
            return KdNode::Empty;
        }

        let bbox = Aabb::bounding(points.iter().copied());
        if points.len() <= LEAF_MAX_SIZE {
            return KdNode::Leaf { points, bbox };
        }

        let axis = bbox.longest_axis();
        let mid = points.len() / 2;
        points.select_nth_unstable_by(mid, |a, b| {
            a[axis].partial_cmp(&b[axis]).unwrap_or(Ordering::Equal)
        });

        let right_points = points.split_off(mid);
        let left = Self::build(points);
        let right = Self::build(right_points);

        KdNode::Branch {
            left: Box::new(left),
            right: Box::new(right),
            bbox,
        }
    }

    fn visit_within<F: FnMut(Vec3)>(&self, center: Vec3, radius2: f32, visit: &mut F) {
        match self {
            KdNode::Empty => {}
            KdNode::Leaf { points, bbox } => {
                if bbox.distance_squared_to(center) > radius2 {
                    return;
                }
                for &p in points {
                    if p.distance_squared(center) <= radius2 {
                        visit(p);
                    }
                }
            }
            KdNode::Branch { left, right, bbox } => {
                if bbox.distance_squared_to(center) > radius2 {
                    return;
                }
                left.visit_within(center, radius2, visit);
                right.visit_within(center, radius2, visit);
            }
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            KdNode::Empty => Aabb::EMPTY,
            KdNode::Leaf { bbox, .. } | KdNode::Branch { bbox, .. } => *bbox,
        }
    }
}

/// Mutable build phase of a [`KdTree`].
#[derive(Debug, Clone, Default)]
pub struct KdTreeBuilder {
    points: Vec<Vec3>,
}

impl KdTreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    /// Add a point to the pending set.
    pub fn insert(&mut self, point: Vec3) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Partition all pending points and freeze the tree.
    pub fn build(self) -> KdTree {
        let len = self.points.len();
        KdTree {
            root: KdNode::build(self.points),
            len,
        }
    }
}

impl Extend<Vec3> for KdTreeBuilder {
    fn extend<I: IntoIterator<Item = Vec3>>(&mut self, iter: I) {
        self.points.extend(iter);
    }
}

impl FromIterator<Vec3> for KdTreeBuilder {
    fn from_iter<I: IntoIterator<Item = Vec3>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Frozen, read-only 3-D point index.
pub struct KdTree {
    root: KdNode,
    len: usize,
}

impl KdTree {
    /// A tree with no points.
    pub fn empty() -> Self {
        KdTreeBuilder::new().build()
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bounds of all indexed points.
    pub fn bounds(&self) -> Aabb {
        self.root.bounds()
    }

    /// Count the points within `radius` (inclusive) of `center`.
    pub fn range_count(&self, center: Vec3, radius: f32) -> usize {
        if radius < 0.0 {
            return 0;
        }
        let mut count = 0;
        self.root
            .visit_within(center, radius * radius, &mut |_| count += 1);
        count
    }

    /// Collect the points within `radius` (inclusive) of `center`, in no
    /// particular order.
    pub fn range_query(&self, center: Vec3, radius: f32) -> Vec<Vec3> {
        let mut found = Vec::new();
        if radius >= 0.0 {
            self.root
                .visit_within(center, radius * radius, &mut |p| found.push(p));
        }
        found
    }
}
