use smallvec::SmallVec;

/// Augmented interval tree over `[start, end)` frame ranges.
///
/// A plain binary search tree ordered by `start`, where every node also
/// carries `max_end`, the largest `end` in its subtree. The tree is not
/// rebalanced; timeline clips are typically inserted roughly in start
/// order, and correctness does not depend on balance.
pub struct IntervalIndex<T> {
    root: Option<Box<Node<T>>>,
    len: usize,
}

struct Node<T> {
    start: i64,
    end: i64,
    max_end: i64,
    payload: T,
    left: Option<Box<Node<T>>>,
    right: Option<Box<Node<T>>>,
}

impl<T: Clone> IntervalIndex<T> {
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, start: i64, end: i64, payload: T) {
        insert_node(&mut self.root, start, end, payload);
        self.len += 1;
    }

    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Payloads whose interval contains `point` (`start <= point < end`),
    /// in tree visitation order (stable for a given insert sequence).
    pub fn query_point(&self, point: i64) -> Vec<T> {
        let mut out = SmallVec::<[T; 8]>::new();
        query_point_node(self.root.as_deref(), point, &mut out);
        out.into_vec()
    }

    /// Payloads whose interval intersects `[lo, hi)`
    /// (`start < hi && lo < end`), in tree visitation order.
    pub fn query_range(&self, lo: i64, hi: i64) -> Vec<T> {
        let mut out = SmallVec::<[T; 8]>::new();
        query_range_node(self.root.as_deref(), lo, hi, &mut out);
        out.into_vec()
    }
}

impl<T: Clone> Default for IntervalIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn insert_node<T>(slot: &mut Option<Box<Node<T>>>, start: i64, end: i64, payload: T) {
    match slot {
        None => {
            *slot = Some(Box::new(Node {
                start,
                end,
                max_end: end,
                payload,
                left: None,
                right: None,
            }));
        }
        Some(node) => {
            if start < node.start {
                insert_node(&mut node.left, start, end, payload);
            } else {
                insert_node(&mut node.right, start, end, payload);
            }
            node.max_end = node.max_end.max(end);
        }
    }
}

fn query_point_node<T: Clone>(node: Option<&Node<T>>, point: i64, out: &mut SmallVec<[T; 8]>) {
    let Some(node) = node else { return };
    // Nothing in this subtree ends after `point`.
    if point >= node.max_end {
        return;
    }
    if let Some(left) = node.left.as_deref()
        && left.max_end > point
    {
        query_point_node(Some(left), point, out);
    }
    if node.start <= point && point < node.end {
        out.push(node.payload.clone());
    }
    if point >= node.start {
        query_point_node(node.right.as_deref(), point, out);
    }
}

fn query_range_node<T: Clone>(node: Option<&Node<T>>, lo: i64, hi: i64, out: &mut SmallVec<[T; 8]>) {
    let Some(node) = node else { return };
    if lo >= node.max_end {
        return;
    }
    query_range_node(node.left.as_deref(), lo, hi, out);
    if node.start < hi && lo < node.end {
        out.push(node.payload.clone());
    }
    if hi > node.start {
        query_range_node(node.right.as_deref(), lo, hi, out);
    }
}
