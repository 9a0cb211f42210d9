pub mod graph_scene;
pub mod node_panel;
pub mod search_panel;
