//! Built-in scenarios, one per service under test

pub mod album;
pub mod product;
pub mod search;

pub use album::AlbumScenario;
pub use product::ProductScenario;
pub use search::ProductSearchScenario;
