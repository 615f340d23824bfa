pub mod chrome;
pub mod renderer;
pub mod widgets;
