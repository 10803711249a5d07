pub mod entries;
pub mod state;
pub mod tokens;
