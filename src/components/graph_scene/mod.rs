mod component;
mod frame_loop;
mod pick;
mod render;
mod state;

pub use component::GraphScene;
pub use frame_loop::running_loops;
