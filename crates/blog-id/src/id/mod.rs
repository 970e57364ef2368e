mod decoded;
mod interface;
mod layout;

pub use decoded::*;
pub use interface::*;
pub use layout::*;
