pub(crate) mod polygon;
pub(crate) mod wipe;
