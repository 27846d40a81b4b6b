pub mod health;
pub mod images;
pub mod root;

pub use health::health_check;
pub use images::{convert_image, resize_image, trim_image};
pub use root::{method_not_allowed, not_found, service_info};
