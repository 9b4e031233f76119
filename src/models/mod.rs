//! Core data structures: resources, requests, steps and HTTP responses.

pub mod request;
pub mod resource;
pub mod response;

pub use request::{Request, Step};
pub use resource::{HttpMethod, ImportType, PathSegment, Resource};
pub use response::HttpResponse;
