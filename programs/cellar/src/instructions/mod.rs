pub mod call_on_adaptor;
pub mod catalogue;
pub mod deposit;
pub mod initialize;
pub mod oracle;
pub mod positions;
pub mod registry;
pub mod withdraw;

pub use call_on_adaptor::*;
pub use catalogue::*;
pub use deposit::*;
pub use initialize::*;
pub use oracle::*;
pub use positions::*;
pub use registry::*;
pub use withdraw::*;
