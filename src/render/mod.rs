pub(crate) mod canvas;
pub(crate) mod instruction;
pub(crate) mod pipeline;
pub(crate) mod trim;
