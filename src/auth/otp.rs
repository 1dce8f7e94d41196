use rand::{rngs::OsRng, Rng};

/// Six-digit one-time passcode, drawn from the OS CSPRNG.
pub fn generate_otp() -> String {
    OsRng.gen_range(100_000..=999_999u32).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_is_six_decimal_digits() {
        for _ in 0..1000 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 6);
            assert!(otp.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn otp_stays_in_range() {
        for _ in 0..1000 {
            let n: u32 = generate_otp().parse().expect("numeric otp");
            assert!((100_000..=999_999).contains(&n));
        }
    }
}
