//! SeaORM entities for the published content items progress records point at.

pub mod prelude;

pub mod lesson;
pub mod practice;
pub mod program;
pub mod shorts;
