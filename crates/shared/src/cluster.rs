//! Screen-space marker clustering.
//!
//! Points whose pins would visually collide at the current zoom level are
//! merged greedily: the first colliding pair (in ascending index order) is
//! merged, its centroid recomputed, and the scan starts over. This repeats
//! until a full scan finds no collision or the pass limit is reached.

use crate::collision::collides;
use crate::models::{Cluster, ClusterOrPoint, Partition, Point, ScreenSize, ViewportRegion};
use crate::modes::{config_for, Mode, ModeConfig};
use crate::projection::offset_coords;

/// Upper bound on merge passes for a single run.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// A marker under construction. `members` index into the input slice.
#[derive(Debug, Clone)]
struct WorkItem {
    latitude: f64,
    longitude: f64,
    members: Vec<usize>,
}

impl WorkItem {
    fn singleton(index: usize, point: &Point) -> Self {
        WorkItem {
            latitude: point.latitude,
            longitude: point.longitude,
            members: vec![index],
        }
    }

    fn coords(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }

    /// Plain mean of all member coordinates.
    fn recenter(&mut self, points: &[Point]) {
        let n = self.members.len() as f64;
        let (lat_sum, lng_sum) = self
            .members
            .iter()
            .map(|&m| (points[m].latitude, points[m].longitude))
            .fold((0.0, 0.0), |(la, lo), (lat, lng)| (la + lat, lo + lng));
        self.latitude = lat_sum / n;
        self.longitude = lng_sum / n;
    }
}

/// Work items addressed by stable index. Merged-away slots become `None`.
struct Arena {
    slots: Vec<Option<WorkItem>>,
}

impl Arena {
    fn new(points: &[Point]) -> Self {
        Arena {
            slots: points
                .iter()
                .enumerate()
                .map(|(i, p)| Some(WorkItem::singleton(i, p)))
                .collect(),
        }
    }

    fn live(&self) -> impl Iterator<Item = (usize, &WorkItem)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|item| (i, item)))
    }

    /// Fold slot `j` into slot `i` and tombstone `j`.
    fn merge(&mut self, i: usize, j: usize, points: &[Point]) {
        let Some(absorbed) = self.slots[j].take() else {
            return;
        };
        if let Some(target) = self.slots[i].as_mut() {
            target.members.extend(absorbed.members);
            target.recenter(points);
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClusterBuilder {
    screen: ScreenSize,
    max_iterations: usize,
}

impl ClusterBuilder {
    pub fn new(screen: ScreenSize) -> Self {
        ClusterBuilder {
            screen,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Partition `points` into markers for the given viewport and mode.
    ///
    /// Every input point ends up in exactly one item. If the pass limit stops
    /// merging before a fixed point, the partition is still complete but
    /// `converged` is false.
    pub fn build(&self, points: &[Point], region: ViewportRegion, mode: Mode) -> Partition {
        let cfg = config_for(mode);
        let mut arena = Arena::new(points);
        let mut passes = 0;
        let mut converged = false;

        while passes < self.max_iterations {
            passes += 1;
            match self.first_collision(&arena, region, &cfg) {
                Some((i, j)) => arena.merge(i, j, points),
                None => {
                    converged = true;
                    break;
                }
            }
        }

        if !converged {
            converged = self.first_collision(&arena, region, &cfg).is_none();
            if !converged {
                tracing::warn!(
                    points = points.len(),
                    passes,
                    mode = %mode,
                    "Clustering hit pass limit before converging"
                );
            }
        }

        let items: Vec<ClusterOrPoint> = arena
            .live()
            .map(|(_, item)| to_output(item, points))
            .collect();

        tracing::debug!(
            points = points.len(),
            markers = items.len(),
            passes,
            converged,
            mode = %mode,
            "Clustered points"
        );

        Partition {
            items,
            passes,
            converged,
        }
    }

    /// First colliding live pair `(i, j)`, `i < j`, in ascending order.
    fn first_collision(
        &self,
        arena: &Arena,
        region: ViewportRegion,
        cfg: &ModeConfig,
    ) -> Option<(usize, usize)> {
        let live: Vec<(usize, &WorkItem)> = arena.live().collect();
        for (a, &(i, item_i)) in live.iter().enumerate() {
            for &(j, item_j) in &live[a + 1..] {
                // No offset means a degenerate viewport: the pair cannot collide.
                let hit = offset_coords(item_i.coords(), item_j.coords(), region, self.screen)
                    .is_some_and(|off| collides(off, cfg.pin, cfg.cluster_padding));
                if hit {
                    return Some((i, j));
                }
            }
        }
        None
    }
}

/// Cluster with the default pass limit and return only the markers.
pub fn cluster(
    points: &[Point],
    region: ViewportRegion,
    screen: ScreenSize,
    mode: Mode,
) -> Vec<ClusterOrPoint> {
    ClusterBuilder::new(screen)
        .build(points, region, mode)
        .into_items()
}

fn to_output(item: &WorkItem, points: &[Point]) -> ClusterOrPoint {
    if let [only] = item.members.as_slice() {
        return ClusterOrPoint::Point(points[*only].clone());
    }

    let member_ids: Vec<String> = item.members.iter().map(|&m| points[m].id.clone()).collect();
    let player_count = item
        .members
        .iter()
        .fold(0u32, |acc, &m| acc.saturating_add(points[m].player_count));

    // Avatars follow input order, whatever order the merges happened in.
    let mut by_input_order = item.members.clone();
    by_input_order.sort_unstable();
    let mut avatars: Vec<String> = Vec::with_capacity(Cluster::MAX_AVATARS);
    'outer: for &m in &by_input_order {
        for avatar in &points[m].avatars {
            if avatars.len() >= Cluster::MAX_AVATARS {
                break 'outer;
            }
            if !avatars.contains(avatar) {
                avatars.push(avatar.clone());
            }
        }
    }

    ClusterOrPoint::Cluster(Cluster {
        id: Cluster::id_for(&member_ids),
        latitude: item.latitude,
        longitude: item.longitude,
        player_count,
        member_ids,
        avatars,
    })
}
