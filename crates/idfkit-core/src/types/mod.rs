mod handle;

pub use handle::{Handle, HandleError};
