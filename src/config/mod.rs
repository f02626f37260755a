//! Configuration module

mod site;

pub use site::HighlightConfig;
pub use site::SidebarConfig;
pub use site::SiteConfig;
