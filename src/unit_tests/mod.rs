pub mod resources;
pub mod step;
