pub mod input;
pub mod lifecycle;
pub mod machine;
pub mod step;
