pub mod aggregator;
pub mod calibration;
pub mod cosmetic_scorer;
pub mod mood;
pub mod pixel;
pub mod pixel_classifier;
pub mod sampler;
pub mod session_history;
pub mod skin_report;
pub mod validity_gate;
