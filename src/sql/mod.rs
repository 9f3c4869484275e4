//! Safe SQL assembly: identifiers from the catalog only, values as parameters.

mod builder;
pub mod ident;
pub mod join;
pub use builder::*;
pub use ident::*;
pub use join::*;
