// Library exports for the tree-search Battlesnake
// The server binary and the replay tool both drive the engine through these modules

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod moves;
pub mod replay;
pub mod reward;
pub mod search;
pub mod simulator;
pub mod state;
pub mod tree;
pub mod types;
