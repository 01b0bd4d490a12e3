mod reminder;
mod status;
mod webhooks;

pub mod dtos {
    pub use crate::reminder::dtos::*;
}

pub use crate::reminder::api::*;
pub use crate::status::api::*;
pub use crate::webhooks::api::*;
