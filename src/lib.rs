pub mod config;
pub mod layout;
pub mod render;
#[doc(hidden)]
pub mod test_support;
pub mod tree;
pub mod view;
