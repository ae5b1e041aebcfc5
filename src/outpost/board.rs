//! Board topology: a square grid of tiles whose corners are nodes

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

pub type NodeId = usize;
pub type TileId = usize;

/// Road position, stored with the smaller node first
pub type Edge = (NodeId, NodeId);

pub fn edge(a: NodeId, b: NodeId) -> Edge {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resource {
    Wood,
    Brick,
    Sheep,
    Wheat,
    Ore,
}

pub const RESOURCES: [Resource; 5] = [
    Resource::Wood,
    Resource::Brick,
    Resource::Sheep,
    Resource::Wheat,
    Resource::Ore,
];

impl Resource {
    pub fn name(self) -> &'static str {
        match self {
            Resource::Wood => "wood",
            Resource::Brick => "brick",
            Resource::Sheep => "sheep",
            Resource::Wheat => "wheat",
            Resource::Ore => "ore",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    /// `None` for the desert
    pub resource: Option<Resource>,
    pub number: Option<u8>,
    pub corners: [NodeId; 4],
}

#[derive(Debug, Clone)]
pub struct Board {
    tiles: Vec<Tile>,
    edges: Vec<Edge>,
    neighbors: Vec<Vec<NodeId>>,
    node_tiles: Vec<Vec<TileId>>,
}

const NUMBERS: [u8; 10] = [2, 3, 4, 5, 6, 8, 9, 10, 11, 12];

impl Board {
    /// `size` x `size` tiles with a desert in the middle. Resources and
    /// number tokens are dealt round-robin and then shuffled by `rng`.
    pub fn grid(size: usize, rng: &mut impl Rng) -> Self {
        let size = size.max(2);
        let row = size + 1;
        let node = |r: usize, c: usize| r * row + c;

        let desert = (size / 2) * size + size / 2;
        let mut deal: Vec<(Resource, u8)> = (0..size * size - 1)
            .map(|i| (RESOURCES[i % RESOURCES.len()], NUMBERS[i % NUMBERS.len()]))
            .collect();
        deal.shuffle(rng);
        let mut deal = deal.into_iter();

        let mut tiles = Vec::with_capacity(size * size);
        for r in 0..size {
            for c in 0..size {
                let corners = [node(r, c), node(r, c + 1), node(r + 1, c), node(r + 1, c + 1)];
                let (resource, number) = if tiles.len() == desert {
                    (None, None)
                } else {
                    deal.next().map_or((None, None), |(res, n)| (Some(res), Some(n)))
                };
                tiles.push(Tile {
                    resource,
                    number,
                    corners,
                });
            }
        }

        let node_count = row * row;
        let mut edges = Vec::new();
        let mut neighbors = vec![Vec::new(); node_count];
        for r in 0..row {
            for c in 0..row {
                let here = node(r, c);
                if c + 1 < row {
                    edges.push(edge(here, node(r, c + 1)));
                }
                if r + 1 < row {
                    edges.push(edge(here, node(r + 1, c)));
                }
            }
        }
        for &(a, b) in &edges {
            neighbors[a].push(b);
            neighbors[b].push(a);
        }

        let mut node_tiles = vec![Vec::new(); node_count];
        for (id, tile) in tiles.iter().enumerate() {
            for &corner in &tile.corners {
                node_tiles[corner].push(id);
            }
        }

        Self {
            tiles,
            edges,
            neighbors,
            node_tiles,
        }
    }

    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        self.neighbors.get(node).map_or(&[], Vec::as_slice)
    }

    pub fn tiles_at(&self, node: NodeId) -> &[TileId] {
        self.node_tiles.get(node).map_or(&[], Vec::as_slice)
    }

    pub fn edges_at(&self, node: NodeId) -> impl Iterator<Item = Edge> + '_ {
        self.neighbors(node).iter().map(move |&other| edge(node, other))
    }

    pub fn desert(&self) -> TileId {
        self.tiles
            .iter()
            .position(|tile| tile.resource.is_none())
            .unwrap_or(0)
    }
}

/// Longest simple trail through `roads` (no edge used twice)
pub fn longest_trail(roads: &[Edge]) -> u32 {
    let mut adjacency: BTreeMap<NodeId, Vec<Edge>> = BTreeMap::new();
    for &road in roads {
        adjacency.entry(road.0).or_default().push(road);
        adjacency.entry(road.1).or_default().push(road);
    }

    fn walk(node: NodeId, adjacency: &BTreeMap<NodeId, Vec<Edge>>, used: &mut BTreeSet<Edge>) -> u32 {
        let mut best = 0;
        for &road in adjacency.get(&node).map_or(&[][..], Vec::as_slice) {
            if !used.insert(road) {
                continue;
            }
            let next = if road.0 == node { road.1 } else { road.0 };
            best = best.max(1 + walk(next, adjacency, used));
            used.remove(&road);
        }
        best
    }

    adjacency
        .keys()
        .map(|&start| walk(start, &adjacency, &mut BTreeSet::new()))
        .max()
        .unwrap_or(0)
}
