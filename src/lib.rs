pub mod audit;
pub mod cards;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod context;
pub mod display;
pub mod error;
pub mod gates;
pub mod generator;
pub mod hand_evaluator;
pub mod leverage;
pub mod math_engine;
pub mod options;
pub mod pedagogy;
pub mod ranges;
pub mod scenario;
pub mod spot;
pub mod texture;
pub mod theory;
