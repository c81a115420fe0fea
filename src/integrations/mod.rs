//! External service integrations.

pub mod provider {
    pub use crate::provider::*;
}

pub mod gemini_client {
    pub use crate::gemini_client::*;
}

pub mod openai_client {
    pub use crate::openai_client::*;
}
