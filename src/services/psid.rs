use std::sync::Mutex;

use rand::Rng;

pub const PSID_PREFIX: &str = "VICS-";
pub const PSID_MAX: u32 = 999_999;

/// Source of the random number behind a PSID. Issued PSIDs are not
/// checked for collisions here.
pub trait PsidSource: Send + Sync {
    fn next_number(&self) -> u32;
}

pub struct ThreadRngSource;

impl PsidSource for ThreadRngSource {
    fn next_number(&self) -> u32 {
        rand::thread_rng().gen_range(0..=PSID_MAX)
    }
}

/// Replays a fixed sequence, then repeats its last value.
pub struct SequenceSource {
    numbers: Mutex<Vec<u32>>,
}

impl SequenceSource {
    pub fn new(mut numbers: Vec<u32>) -> Self {
        numbers.reverse();
        Self {
            numbers: Mutex::new(numbers),
        }
    }
}

impl PsidSource for SequenceSource {
    fn next_number(&self) -> u32 {
        let mut numbers = self.numbers.lock().unwrap_or_else(|e| e.into_inner());
        if numbers.len() > 1 {
            numbers.pop().unwrap_or(0)
        } else {
            numbers.last().copied().unwrap_or(0)
        }
    }
}

pub fn format_psid(number: u32) -> String {
    format!("{PSID_PREFIX}{:06}", number % (PSID_MAX + 1))
}

pub fn generate_psid(source: &dyn PsidSource) -> String {
    format_psid(source.next_number())
}

pub fn is_valid_psid(s: &str) -> bool {
    s.strip_prefix(PSID_PREFIX)
        .is_some_and(|digits| digits.len() == 6 && digits.bytes().all(|b| b.is_ascii_digit()))
}
