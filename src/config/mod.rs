//! Configuration module

mod site;

pub use site::ClientConfig;
pub use site::Environment;
pub use site::ServerConfig;
pub use site::SiteConfig;
pub use site::StoreConfig;
