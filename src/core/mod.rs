pub mod calculator;
pub mod event;
pub mod log;
pub mod ops;
pub mod ports;
pub mod regenerate;
pub mod replace;
pub mod strategy;
