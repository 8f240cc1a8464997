pub(crate) mod overlap;
pub(crate) mod probe;
