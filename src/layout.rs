pub mod grid;

pub use grid::GridLayout;
