pub(crate) mod performance;
