//! Configuration module

mod site;

pub use site::resolve_api_base;
pub use site::ApiConfig;
pub use site::CategoryConfig;
pub use site::ContactConfig;
pub use site::ContactEncoding;
pub use site::MountConfig;
pub use site::SiteConfig;
pub use site::ThemeConfig;
pub use site::API_OFF;
