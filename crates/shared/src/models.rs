use serde::{Deserialize, Serialize};

use crate::activity::{level_for, ActivityLevel};

/// A geolocated court as supplied by the data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Aggregate players across the court's sessions.
    pub player_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub avatars: Vec<String>,
}

impl Point {
    pub fn new(id: impl Into<String>, latitude: f64, longitude: f64, player_count: u32) -> Self {
        Point {
            id: id.into(),
            latitude,
            longitude,
            player_count,
            avatars: Vec::new(),
        }
    }

    pub fn with_avatars<I, S>(mut self, avatars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avatars = avatars.into_iter().map(Into::into).collect();
        self
    }
}

/// Visible map region. Only the deltas matter for clustering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportRegion {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl ViewportRegion {
    pub fn new(latitude: f64, longitude: f64, latitude_delta: f64, longitude_delta: f64) -> Self {
        ViewportRegion {
            latitude,
            longitude,
            latitude_delta,
            longitude_delta,
        }
    }

    /// Region centered on the origin with the given angular span.
    pub fn span(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self::new(0.0, 0.0, latitude_delta, longitude_delta)
    }
}

/// Device screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub fn new(width: f64, height: f64) -> Self {
        ScreenSize { width, height }
    }
}

/// Two or more points merged into one marker.
///
/// `avatars` holds at most [`Cluster::MAX_AVATARS`] distinct references,
/// taken from the members in their original input order (not ranked by
/// activity).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub player_count: u32,
    /// Member ids in merge order.
    pub member_ids: Vec<String>,
    pub avatars: Vec<String>,
}

impl Cluster {
    pub const MAX_AVATARS: usize = 5;

    /// Identifier derived from member ids, stable across identical inputs.
    ///
    /// Each member id is length-prefixed (`cluster:3:a-b|1:c`), so distinct
    /// member lists never encode to the same string whatever characters the
    /// ids contain.
    pub fn id_for<S: AsRef<str>>(member_ids: &[S]) -> String {
        let mut id = String::from("cluster:");
        for (n, member) in member_ids.iter().enumerate() {
            let member = member.as_ref();
            if n > 0 {
                id.push('|');
            }
            id.push_str(&member.len().to_string());
            id.push(':');
            id.push_str(member);
        }
        id
    }

    pub fn len(&self) -> usize {
        self.member_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_ids.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClusterOrPoint {
    Point(Point),
    Cluster(Cluster),
}

impl ClusterOrPoint {
    pub fn id(&self) -> &str {
        match self {
            ClusterOrPoint::Point(p) => &p.id,
            ClusterOrPoint::Cluster(c) => &c.id,
        }
    }

    /// Rendering key, unique within one partition.
    ///
    /// Points are prefixed with `point:` and cluster ids start with
    /// `cluster:`, so a court id can never shadow a cluster.
    pub fn key(&self) -> String {
        match self {
            ClusterOrPoint::Point(p) => format!("point:{}", p.id),
            ClusterOrPoint::Cluster(c) => c.id.clone(),
        }
    }

    /// Marker position as `(latitude, longitude)`.
    pub fn coordinates(&self) -> (f64, f64) {
        match self {
            ClusterOrPoint::Point(p) => (p.latitude, p.longitude),
            ClusterOrPoint::Cluster(c) => (c.latitude, c.longitude),
        }
    }

    pub fn player_count(&self) -> u32 {
        match self {
            ClusterOrPoint::Point(p) => p.player_count,
            ClusterOrPoint::Cluster(c) => c.player_count,
        }
    }

    /// Ids of every input point this marker stands for.
    pub fn member_ids(&self) -> Vec<&str> {
        match self {
            ClusterOrPoint::Point(p) => vec![p.id.as_str()],
            ClusterOrPoint::Cluster(c) => c.member_ids.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_cluster(&self) -> bool {
        matches!(self, ClusterOrPoint::Cluster(_))
    }

    pub fn activity_level(&self) -> ActivityLevel {
        level_for(self.player_count())
    }
}

/// Result of one clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Partition {
    pub items: Vec<ClusterOrPoint>,
    /// Merge passes performed.
    pub passes: usize,
    /// False when the pass limit cut merging short of a fixed point.
    pub converged: bool,
}

impl Partition {
    pub fn cluster_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_cluster()).count()
    }

    pub fn into_items(self) -> Vec<ClusterOrPoint> {
        self.items
    }
}
