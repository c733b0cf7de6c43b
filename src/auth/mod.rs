//! Registration, OTP verification, and bearer-session authentication.
//!
//! The OTP is parked in the shared key-value cache (`otp:{user_id}`) with the
//! user record as fallback, so a cache outage never blocks verification.

pub mod extract;
pub mod password;
pub mod service;
pub mod session;

pub use extract::{CurrentUser, MaybeUser};
pub use service::AuthService;
pub use session::SessionStore;

use uuid::Uuid;

/// Generate a 6-digit one-time passcode
pub fn generate_otp() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    let n = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    format!("{}", 100_000 + n % 900_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_is_six_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            let n: u32 = otp.parse().unwrap();
            assert!((100_000..1_000_000).contains(&n));
        }
    }
}
