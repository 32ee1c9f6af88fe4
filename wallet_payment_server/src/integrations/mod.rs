mod email;

pub use email::{EmailApi, EmailApiError};
