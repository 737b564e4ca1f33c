//! Class-covering password generator

use heapless::Vec;
use shakepass_protocol::{Password, MAX_PASSWORD_LEN};

use super::alphabet::{ALL, CLASSES};
use crate::config::MIN_LENGTH;
use crate::entropy::EntropyPool;
use crate::traits::SensorSource;

/// Draw one byte from `set`
fn pick<S: SensorSource + ?Sized>(pool: &mut EntropyPool, source: &mut S, set: &[u8]) -> u8 {
    set[pool.randbelow(set.len() as u32, source) as usize]
}

/// Generate a password of `length` characters
///
/// One character from each class is placed first, the rest are drawn from
/// the union, then the whole buffer is Fisher-Yates shuffled so the seeded
/// characters can land anywhere. The length is forced into
/// `MIN_LENGTH..=MAX_PASSWORD_LEN`. Every draw samples the sensors once.
pub fn generate<S: SensorSource + ?Sized>(
    pool: &mut EntropyPool,
    source: &mut S,
    length: usize,
) -> Password {
    let length = length.clamp(MIN_LENGTH as usize, MAX_PASSWORD_LEN);

    let mut chars: Vec<u8, MAX_PASSWORD_LEN> = Vec::new();
    for class in CLASSES {
        let _ = chars.push(pick(pool, source, class));
    }
    while chars.len() < length {
        let _ = chars.push(pick(pool, source, ALL));
    }

    let mut i = chars.len() - 1;
    while i > 0 {
        let j = pool.randbelow(i as u32 + 1, source) as usize;
        chars.swap(i, j);
        i -= 1;
    }

    let mut password = Password::new();
    for &c in chars.iter() {
        if password.push(char::from(c)).is_err() {
            break;
        }
    }
    password
}
