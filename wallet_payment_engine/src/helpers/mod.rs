mod codes;

pub use codes::{new_session_id, new_token_code, TOKEN_DIGITS};
