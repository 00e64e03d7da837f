mod bundle;
mod ports;
mod request;

pub use bundle::*;
pub use ports::*;
pub use request::*;
