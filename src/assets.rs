pub(crate) mod decode;
pub(crate) mod frame;
pub(crate) mod signature;
pub(crate) mod source;
