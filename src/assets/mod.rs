pub(crate) mod color;
pub(crate) mod fetch;
pub(crate) mod loader;
pub(crate) mod locator;
