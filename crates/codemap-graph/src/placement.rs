use crate::builder::CodeGraph;
use crate::config::LayoutConfig;
use crate::geometry::{GridCell, RingSlots};
use codemap_core::FileId;
use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};

/// Grid slot of every file, translated so the minimum coordinate on each axis is 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridPlacement {
    cells: IndexMap<FileId, GridCell>,
    /// Neighbor searches that ran out of slots and restarted from the origin
    pub fallbacks: usize,
}

impl GridPlacement {
    pub fn cell(&self, id: FileId) -> Option<GridCell> {
        self.cells.get(&id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FileId, GridCell)> + '_ {
        self.cells.iter().map(|(id, cell)| (*id, *cell))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Weighted breadth-first placement of files on an infinite grid.
///
/// Seeds are taken in descending total edge weight (ties by path). Each seed
/// lands on the free slot nearest the origin, then its unplaced neighbors are
/// placed around it, heaviest edge first, and so on breadth-first. Strongly
/// connected files therefore end up in adjacent cells.
#[derive(Debug, Clone, Copy)]
pub struct GridPlacer {
    /// Slots tried around an anchor before falling back to the origin search
    pub neighbor_slot_limit: usize,
}

impl Default for GridPlacer {
    fn default() -> Self {
        Self {
            neighbor_slot_limit: LayoutConfig::DEFAULT_NEIGHBOR_SLOT_LIMIT,
        }
    }
}

impl GridPlacer {
    pub fn new(neighbor_slot_limit: usize) -> Self {
        Self {
            neighbor_slot_limit,
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.neighbor_slot_limit)
    }

    pub fn place(&self, graph: &CodeGraph) -> GridPlacement {
        let file_count = graph.files.len();

        let mut adjacency: Vec<Vec<(FileId, u32)>> = vec![Vec::new(); file_count];
        for (&(a, b), &weight) in &graph.edge_weights {
            if a == b || weight == 0 || a.0 >= file_count || b.0 >= file_count {
                continue;
            }
            adjacency[a.0].push((b, weight));
            adjacency[b.0].push((a, weight));
        }
        let node_weights: Vec<u32> = adjacency
            .iter()
            .map(|edges| edges.iter().map(|(_, weight)| weight).sum())
            .collect();

        let mut seeds: Vec<FileId> = (0..file_count).map(FileId).collect();
        seeds.sort_by(|a, b| {
            node_weights[b.0]
                .cmp(&node_weights[a.0])
                .then_with(|| graph.files[a.0].path.cmp(&graph.files[b.0].path))
        });

        let mut cells: Vec<Option<GridCell>> = vec![None; file_count];
        let mut occupied: HashSet<GridCell> = HashSet::with_capacity(file_count);
        let mut fallbacks = 0;
        let mut queue = VecDeque::new();

        for seed in seeds {
            if cells[seed.0].is_some() {
                continue;
            }
            let cell = nearest_free_to_origin(&occupied);
            occupied.insert(cell);
            cells[seed.0] = Some(cell);
            queue.push_back((seed, cell));

            while let Some((current, anchor)) = queue.pop_front() {
                let mut neighbors: Vec<(FileId, u32)> = adjacency[current.0]
                    .iter()
                    .filter(|(id, _)| cells[id.0].is_none())
                    .copied()
                    .collect();
                neighbors.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

                for (neighbor, _) in neighbors {
                    let cell = match RingSlots::around(anchor)
                        .take(self.neighbor_slot_limit)
                        .find(|slot| !occupied.contains(slot))
                    {
                        Some(cell) => cell,
                        None => {
                            fallbacks += 1;
                            nearest_free_to_origin(&occupied)
                        }
                    };
                    occupied.insert(cell);
                    cells[neighbor.0] = Some(cell);
                    queue.push_back((neighbor, cell));
                }
            }
        }

        let min_x = cells.iter().flatten().map(|c| c.x).min().unwrap_or(0);
        let min_y = cells.iter().flatten().map(|c| c.y).min().unwrap_or(0);
        let cells: IndexMap<FileId, GridCell> = cells
            .into_iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|c| (FileId(idx), c.offset(-min_x, -min_y))))
            .collect();

        if fallbacks > 0 {
            tracing::debug!(
                "Grid placement fell back to origin search {} times",
                fallbacks
            );
        }
        tracing::debug!("Placed {} files on the grid", cells.len());

        GridPlacement { cells, fallbacks }
    }
}

fn nearest_free_to_origin(occupied: &HashSet<GridCell>) -> GridCell {
    if !occupied.contains(&GridCell::ORIGIN) {
        return GridCell::ORIGIN;
    }
    let mut ring = RingSlots::around(GridCell::ORIGIN);
    loop {
        let cell = ring.next_cell();
        if !occupied.contains(&cell) {
            return cell;
        }
    }
}
