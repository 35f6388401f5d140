pub mod components;
pub mod deployments;
pub mod pulls;
