pub mod envelope;

pub use envelope::{
    ClientErrorMessage, DataDeleted, DataFound, DataStored, HealthStatus, Response,
    ResponseData, ResponsePayload,
};
