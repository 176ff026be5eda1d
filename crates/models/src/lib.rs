pub mod team;
pub mod fixture;
pub mod tournament;
pub mod scorers;
pub mod error;

pub use team::*;
pub use fixture::*;
pub use tournament::*;
pub use scorers::*;
pub use error::*;
