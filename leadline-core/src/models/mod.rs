mod ai_assist;
mod contract;
mod conversation;
mod followup;
mod lead;
mod user;

pub use ai_assist::*;
pub use contract::*;
pub use conversation::*;
pub use followup::*;
pub use lead::*;
pub use user::*;
