pub mod bootstrap;
pub mod companion;
