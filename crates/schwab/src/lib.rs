pub mod rest;

pub use rest::SchwabRest;
