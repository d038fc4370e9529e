mod collect;
mod encode;
mod error;
mod fetch;
mod graph;
mod layout;
mod parse;
mod scene;
mod utilities;

pub use collect::{graph_from_body, load_neighborhood};
pub use encode::{LinkEncoder, NodeEncoder, VisualRange};
pub use error::{FetchError, FetchResult};
pub use fetch::{DEFAULT_SERVICE_URL, DataFetcher, PendingFetch};
pub use graph::{GraphData, Link, NeighborhoodSnapshot, Node};
pub use layout::{
    LayoutNode, Point, RadialLayout, RadialLayoutConfig, apply_alpha_linear, polar_to_cartesian,
};
pub use parse::parse_neighborhood;
pub use scene::{
    FOCUS_RING, NEIGHBOR_RING, OUTER_RING, RadialScene, SceneConfig, SceneLink, SceneNode,
    assign_rings, build_scene, ring_sizes,
};
pub use utilities::{FilteredLayout, LayoutEngine, filter_force_nodes, group_by, list_neighbors_of};
