// Domain-layer modules and shared errors/models
pub mod models {
    pub use crate::models::*;
}

pub mod registry {
    pub use crate::registry::*;
}

pub mod errors {
    pub use crate::errors::*;
}

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::errors::AppError;
pub use crate::models::{CustomerId, CustomerRecord, CustomerSnapshot, Segment, Segments};
pub use crate::registry::Registry;
