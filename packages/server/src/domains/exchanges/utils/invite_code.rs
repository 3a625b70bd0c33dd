//! Invite codes: six random characters from `A-Z0-9`, shown as `XXX-XXX`.
//!
//! Uniqueness is checked against the store by `create_exchange`; this module
//! only generates and normalizes.

use fastrand::Rng;

pub const INVITE_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random characters per code (the separator is not counted)
pub const INVITE_CODE_LENGTH: usize = 6;

const GROUP_SIZE: usize = INVITE_CODE_LENGTH / 2;

pub fn generate_invite_code(rng: &mut Rng) -> String {
    let mut code = String::with_capacity(INVITE_CODE_LENGTH + 1);
    for i in 0..INVITE_CODE_LENGTH {
        if i == GROUP_SIZE {
            code.push('-');
        }
        let idx = rng.usize(..INVITE_CODE_CHARSET.len());
        code.push(INVITE_CODE_CHARSET[idx] as char);
    }
    code
}

/// Codes are typed by people: ignore surrounding whitespace and case.
pub fn normalize_invite_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

/// True for a normalized code of the generated shape.
pub fn is_well_formed_invite_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == INVITE_CODE_LENGTH + 1
        && bytes.iter().enumerate().all(|(i, b)| {
            if i == GROUP_SIZE {
                *b == b'-'
            } else {
                INVITE_CODE_CHARSET.contains(b)
            }
        })
}
