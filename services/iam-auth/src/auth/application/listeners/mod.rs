mod session_lifecycle;

pub use session_lifecycle::*;
