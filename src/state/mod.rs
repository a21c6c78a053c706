pub mod aggregate;
pub mod bounds;
pub mod data_model;
pub mod reconcile;
pub mod session;
