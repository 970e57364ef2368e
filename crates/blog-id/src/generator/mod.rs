mod atomic;
mod interface;
mod lock;
mod mutex;
mod state;

pub use atomic::*;
pub use interface::*;
pub use lock::*;
