pub mod cnb;
pub mod html;
