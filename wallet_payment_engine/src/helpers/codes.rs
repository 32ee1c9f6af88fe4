use rand::{rngs::OsRng, Rng};
use uuid::Uuid;

use crate::db_types::{SessionId, TokenCode};

/// Width of the numeric confirmation code.
pub const TOKEN_DIGITS: usize = 6;

/// Mints a fresh fixed-width numeric confirmation code.
///
/// The code authorizes a debit, so it is always drawn from the OS CSPRNG, never from a seeded or
/// thread-local generator.
pub fn new_token_code() -> TokenCode {
    let n = OsRng.gen_range(0..1_000_000u32);
    TokenCode::from(format!("{n:0width$}", width = TOKEN_DIGITS))
}

/// Mints a fresh session identifier.
pub fn new_session_id() -> SessionId {
    SessionId::from(Uuid::new_v4().to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn token_codes_are_fixed_width_digits() {
        for _ in 0..100 {
            let code = new_token_code();
            assert_eq!(code.as_str().len(), TOKEN_DIGITS);
            assert!(code.as_str().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn session_ids_do_not_repeat() {
        let a = new_session_id();
        let b = new_session_id();
        assert_ne!(a, b);
    }
}
