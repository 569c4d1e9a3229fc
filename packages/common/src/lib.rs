pub mod flags;
pub mod overrides;
pub mod payment;

pub use flags::{FlagMap, FlagResolver};
pub use overrides::{OverrideError, OverrideStore};
pub use payment::{DeclineCode, PaymentMethod};
