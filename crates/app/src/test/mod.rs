//! Test support for service-level tests.


pub(crate) use clock::ManualClock;
pub(crate) use context::TestContext;
pub(crate) use stores::{InterferingStore, YieldingStore};
