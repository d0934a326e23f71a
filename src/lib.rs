pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod proxy;
pub mod resolve;
pub mod surface;

pub use config::Config;
pub use controller::{LookupController, SourceEvent};
pub use error::LookupError;
pub use host::{HostEvent, HostRuntime};
pub use proxy::{LookupBackend, LookupResponse, ProxyClient};
pub use surface::{Binding, FormSurface, Indicator};
