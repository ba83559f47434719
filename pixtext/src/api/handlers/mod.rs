pub(crate) mod convert;
pub(crate) mod health;

pub use convert::convert_image_to_text;
pub use health::health_check;
