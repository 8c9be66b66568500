pub mod lenient;
pub mod movie;
pub mod plan;
pub mod region;
