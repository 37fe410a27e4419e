mod blob;
mod exotic;
mod host_string;

pub use blob::*;
pub use exotic::*;
pub use host_string::*;
