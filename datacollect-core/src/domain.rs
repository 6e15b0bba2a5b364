pub mod attribute;
pub mod element;
pub mod dimension;
pub mod query;
pub mod result;

pub use attribute::*;
pub use element::*;
pub use dimension::*;
pub use query::*;
pub use result::*;
