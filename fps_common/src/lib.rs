mod rupees;
mod secret;

pub use rupees::{Rupees, RupeesConversionError, INR_CURRENCY_CODE, INR_CURRENCY_CODE_LOWER};
pub use secret::Secret;
