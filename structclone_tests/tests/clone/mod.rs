pub mod blobs;
pub mod e2e;
pub mod errors;
pub mod graphs;
pub mod helpers;
pub mod limits;
pub mod round_trip;
pub mod transfer;
