// Domain-layer modules and shared errors/models
pub mod discovery {
    pub use crate::discovery::*;
}

pub mod enrichment {
    pub use crate::enrichment::*;
}

pub mod validation {
    pub use crate::validation::*;
}

pub mod export {
    pub use crate::export::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
