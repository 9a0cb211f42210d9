pub mod hydrate;
pub mod load;
pub mod sample;
mod types;

pub use hydrate::hydrate;
pub use load::{GraphLoad, LoadNotice, load_graph};
pub use sample::generate_sample_graph;
pub use types::{Edge, GraphData, Node, NodeData};
