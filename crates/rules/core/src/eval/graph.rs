//! Dependency ordering with cycle detection.
//!
//! Tarjan's strongly connected components algorithm over the attributes
//! reachable from the one being resolved. Components come out in reverse
//! topological order of the condensed graph, which for "depends on" edges is
//! exactly the order the attributes must be folded in. Any component with
//! more than one member (or a member that reads itself) is a cycle.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::attr::AttrId;

/// Resolution order for `root` and its unresolved dependencies, dependencies first.
///
/// `is_resolved` marks memoized attributes, which are treated as leaves.
/// On a cycle, returns every member of the first cyclic component found, sorted.
pub(crate) fn resolution_order<R, S>(
    root: &AttrId,
    is_resolved: R,
    successors: S,
) -> Result<Vec<AttrId>, Vec<AttrId>>
where
    R: Fn(&AttrId) -> bool,
    S: Fn(&AttrId) -> Vec<AttrId>,
{
    let mut tarjan = Tarjan {
        is_resolved,
        successors,
        index: HashMap::new(),
        lowlink: HashMap::new(),
        on_stack: HashSet::new(),
        stack: Vec::new(),
        frames: Vec::new(),
        next_index: 0,
        order: Vec::new(),
    };

    match tarjan.run(root) {
        Some(cycle) => Err(cycle),
        None => Ok(tarjan.order),
    }
}

/// One node of the explicit depth-first stack.
struct Frame {
    node: AttrId,
    successors: Vec<AttrId>,
    next: usize,
    reads_itself: bool,
}

struct Tarjan<R, S> {
    is_resolved: R,
    successors: S,
    index: HashMap<AttrId, usize>,
    lowlink: HashMap<AttrId, usize>,
    on_stack: HashSet<AttrId>,
    stack: Vec<AttrId>,
    frames: Vec<Frame>,
    next_index: usize,
    order: Vec<AttrId>,
}

impl<R, S> Tarjan<R, S>
where
    R: Fn(&AttrId) -> bool,
    S: Fn(&AttrId) -> Vec<AttrId>,
{
    /// Iterative DFS from `root`; dependency chains may be thousands deep.
    /// Returns the first cyclic component found.
    fn run(&mut self, root: &AttrId) -> Option<Vec<AttrId>> {
        self.enter(root.clone());

        while let Some(frame) = self.frames.last_mut() {
            if frame.next < frame.successors.len() {
                let w = frame.successors[frame.next].clone();
                frame.next += 1;
                let v = frame.node.clone();

                if (self.is_resolved)(&w) {
                    continue;
                }
                if !self.index.contains_key(&w) {
                    self.enter(w);
                } else if self.on_stack.contains(&w) {
                    let w_index = self.index[&w];
                    self.lower(&v, w_index);
                }
                continue;
            }

            let Some(frame) = self.frames.pop() else {
                break;
            };
            let v_low = self.lowlink[&frame.node];
            if let Some(parent) = self.frames.last() {
                let parent = parent.node.clone();
                self.lower(&parent, v_low);
            }
            if v_low != self.index[&frame.node] {
                continue;
            }

            let mut component = BTreeSet::new();
            while let Some(w) = self.stack.pop() {
                self.on_stack.remove(&w);
                let is_root = w == frame.node;
                component.insert(w);
                if is_root {
                    break;
                }
            }

            if component.len() > 1 || frame.reads_itself {
                return Some(component.into_iter().collect());
            }
            self.order.extend(component);
        }

        None
    }

    fn enter(&mut self, v: AttrId) {
        let v_index = self.next_index;
        self.next_index += 1;
        self.index.insert(v.clone(), v_index);
        self.lowlink.insert(v.clone(), v_index);
        self.stack.push(v.clone());
        self.on_stack.insert(v.clone());

        let successors = (self.successors)(&v);
        let reads_itself = successors.contains(&v);
        self.frames.push(Frame {
            node: v,
            successors,
            next: 0,
            reads_itself,
        });
    }

    fn lower(&mut self, v: &AttrId, candidate: usize) {
        if let Some(low) = self.lowlink.get_mut(v) {
            *low = (*low).min(candidate);
        }
    }
}
