use petgraph::unionfind::UnionFind;

use crate::cells::GridCoordinate;
use crate::utils::{self, FnvHashMap};

/// Disjoint sets of grid cells, each member starts out in its own singleton set.
#[derive(Debug, Clone)]
pub struct DisjointSet {
    members: FnvHashMap<GridCoordinate, usize>,
    sets: UnionFind<usize>,
    sets_count: usize,
}

impl DisjointSet {
    pub fn new<I>(cells: I) -> DisjointSet
        where I: IntoIterator<Item = GridCoordinate>
    {
        let mut members = utils::fnv_hashmap(0);
        for cell in cells {
            let next_id = members.len();
            members.entry(cell).or_insert(next_id);
        }
        let count = members.len();

        DisjointSet {
            members,
            sets: UnionFind::new(count),
            sets_count: count,
        }
    }

    pub fn contains(&self, cell: GridCoordinate) -> bool {
        self.members.contains_key(&cell)
    }

    /// The representative id of the set holding `cell`, None for non-members.
    pub fn find(&self, cell: GridCoordinate) -> Option<usize> {
        self.members.get(&cell).map(|id| self.sets.find(*id))
    }

    pub fn same_set(&self, a: GridCoordinate, b: GridCoordinate) -> bool {
        match (self.find(a), self.find(b)) {
            (Some(set_a), Some(set_b)) => set_a == set_b,
            _ => false,
        }
    }

    /// Merge the sets holding `a` and `b`.
    /// Returns false if they were already one set or either cell is not a member.
    pub fn union(&mut self, a: GridCoordinate, b: GridCoordinate) -> bool {
        let ids = (self.members.get(&a).cloned(), self.members.get(&b).cloned());
        if let (Some(id_a), Some(id_b)) = ids {
            let merged = self.sets.union(id_a, id_b);
            if merged {
                self.sets_count -= 1;
            }
            merged
        } else {
            false
        }
    }

    pub fn sets_count(&self) -> usize {
        self.sets_count
    }

    pub fn members_count(&self) -> usize {
        self.members.len()
    }
}
