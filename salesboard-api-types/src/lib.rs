mod sale;
mod user;

pub mod seed;

pub use sale::{timestamp, PaymentMethod, Sale, SalePatch, UnknownPaymentMethod};
pub use user::{User, UserRole, UserStatus};
