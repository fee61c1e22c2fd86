pub mod decor;
pub mod html;
