//! Student ID generation.

use rand::Rng;
use std::ops::Range;

/// Student IDs are 7-digit decimal strings drawn from this range
pub const STUDENT_ID_RANGE: Range<u32> = 1_000_000..9_000_000;

/// Source of candidate student IDs. Uniqueness is checked by the caller.
pub trait StudentIdGenerator: Send + Sync {
    fn next_candidate(&self) -> String;
}

/// Uniformly random IDs from [`STUDENT_ID_RANGE`]
#[derive(Debug, Clone, Default)]
pub struct RandomStudentIdGenerator;

impl StudentIdGenerator for RandomStudentIdGenerator {
    fn next_candidate(&self) -> String {
        rand::thread_rng().gen_range(STUDENT_ID_RANGE).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_are_seven_digits_in_range() {
        let generator = RandomStudentIdGenerator;
        for _ in 0..1000 {
            let id = generator.next_candidate();
            assert_eq!(id.len(), 7);
            let value: u32 = id.parse().unwrap();
            assert!(STUDENT_ID_RANGE.contains(&value));
        }
    }
}
