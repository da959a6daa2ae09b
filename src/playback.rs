pub(crate) mod control;
pub(crate) mod display;
pub(crate) mod engine;
pub(crate) mod state;
pub(crate) mod timer;
