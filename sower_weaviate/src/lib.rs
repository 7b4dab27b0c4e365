pub mod client;
pub mod error;
pub mod types;

pub use client::{CreateClassOutcome, WeaviateClient};
pub use error::{ClientError, Result};
pub use types::{
    ClassDefinition, ObjectResult, ObjectStatus, PropertyDefinition, RetrievedObject,
    WeaviateObject,
};
