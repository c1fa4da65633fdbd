//! Command implementations.
//!
//! Each command returns its rendered output; `main` prints it.

pub mod bounds;
pub mod demo;
pub mod merge;
pub mod study;

pub use self::bounds::execute_bounds;
pub use self::demo::execute_demo;
pub use self::merge::execute_merge;
pub use self::study::execute_study;
