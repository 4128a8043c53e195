
pub use payloads::{headerless_payload, object, sync_payload};
pub use test_client::{
    connected_client, standalone_client, test_config, tick, TestClient, PERIOD,
};
pub use test_simulation::{
    AppliedInput, LifecycleRecord, StepRecord, TestObject, TestRenderer, TestSimulation, TestWorld,
};
