use super::status::Status;
use std::any::Any;

// responders can stash whatever they resolved during validation
// so the build step doesn't have to do the work twice
pub type Validation = Option<Box<dyn Any + Send>>;

pub type ValidationResult = Result<Validation, Status>;
