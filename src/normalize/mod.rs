pub mod coerce;
pub mod normalizer;
