pub(crate) mod decode;
pub(crate) mod image;
pub(crate) mod mip;
