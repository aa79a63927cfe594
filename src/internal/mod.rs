//! Internal implementation details.

mod slots;

pub(crate) use slots::InstanceTable;
