pub mod model;
pub mod overlap;
pub mod translate;
pub mod types;

pub use model::{Diagram, Graph};
pub use translate::build;
pub use types::{EdgeDefinition, Elements, NodeDefinition};
