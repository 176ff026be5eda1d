pub mod bracket;
pub mod demo;
pub mod metrics;
pub mod simulator;
pub mod tournament;

pub use bracket::*;
pub use demo::*;
pub use metrics::*;
pub use simulator::*;
pub use tournament::*;
