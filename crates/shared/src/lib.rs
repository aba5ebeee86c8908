pub mod activity;
pub mod cluster;
pub mod collision;
pub mod error;
pub mod models;
pub mod modes;
pub mod projection;

pub use activity::{color_for, level_for, ActivityLevel};
pub use cluster::{cluster, ClusterBuilder, DEFAULT_MAX_ITERATIONS};
pub use collision::{collides, collides_in_mode};
pub use error::EngineError;
pub use models::{Cluster, ClusterOrPoint, Partition, Point, ScreenSize, ViewportRegion};
pub use modes::{config_for, Mode, ModeConfig, PinSize};
pub use projection::{offset, PixelOffset};
