use crate::core::Transaction;
use crate::utils::{canonical_json_bytes, sha256_hex};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// The hash guess covers the prospective block contents that are fixed at
// mining time: nonce, previous hash, and the transaction list. Index and
// timestamp stay out so a proof can be checked without them. Field order is
// canonical, as everywhere.
#[derive(Serialize)]
struct ProofPayload<'a> {
    nonce: u64,
    previous_hash: &'a str,
    transactions: &'a [Transaction],
}

/// Check the leading-zero puzzle: the hex digest of the canonical guess must
/// start with `difficulty` zero characters. Total function; a difficulty
/// longer than the digest can never be satisfied.
pub fn is_valid_proof(
    transactions: &[Transaction],
    previous_hash: &str,
    nonce: u64,
    difficulty: usize,
) -> bool {
    let payload = ProofPayload {
        nonce,
        previous_hash,
        transactions,
    };
    let bytes = match canonical_json_bytes(&payload) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let digest = sha256_hex(bytes.as_slice());
    if difficulty > digest.len() {
        return false;
    }
    digest.as_bytes()[..difficulty].iter().all(|&b| b == b'0')
}

/// Nonce search for the leading-zero puzzle. The default configuration runs
/// until a proof is found; a nonce cap and a shared cancellation flag bound
/// the search when a caller needs to stop it.
pub struct ProofOfWork {
    difficulty: usize,
    max_nonce: u64,
    cancelled: Arc<AtomicBool>,
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> ProofOfWork {
        Self::with_max_nonce(difficulty, u64::MAX)
    }

    pub fn with_max_nonce(difficulty: usize, max_nonce: u64) -> ProofOfWork {
        ProofOfWork {
            difficulty,
            max_nonce,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn get_difficulty(&self) -> usize {
        self.difficulty
    }

    /// Shared flag that aborts an in-flight search when set.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Replace the cancellation flag with one the caller already shares.
    pub fn set_cancel_flag(&mut self, flag: Arc<AtomicBool>) {
        self.cancelled = flag;
    }

    /// Search nonces from zero upward and return the smallest one whose
    /// guess digest satisfies the difficulty. Returns None only when the
    /// search is cancelled or the nonce cap is exhausted.
    pub fn find_proof(&self, transactions: &[Transaction], previous_hash: &str) -> Option<u64> {
        let mut nonce: u64 = 0;
        loop {
            if self.cancelled.load(Ordering::Relaxed) {
                return None;
            }
            if is_valid_proof(transactions, previous_hash, nonce, self.difficulty) {
                return Some(nonce);
            }
            if nonce == self.max_nonce {
                return None;
            }
            nonce += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_transactions() -> Vec<Transaction> {
        vec![Transaction::new("alice", "bob", 1.0)]
    }

    #[test]
    fn test_find_proof_returns_smallest_valid_nonce() {
        let transactions = sample_transactions();
        let pow = ProofOfWork::new(1);

        let nonce = pow.find_proof(&transactions, "abc").unwrap();
        assert!(is_valid_proof(&transactions, "abc", nonce, 1));
        for earlier in 0..nonce {
            assert!(!is_valid_proof(&transactions, "abc", earlier, 1));
        }
    }

    #[test]
    fn test_zero_difficulty_accepts_first_nonce() {
        let transactions = sample_transactions();
        let pow = ProofOfWork::new(0);
        assert_eq!(pow.find_proof(&transactions, "abc"), Some(0));
    }

    #[test]
    fn test_guess_digest_depends_on_previous_hash() {
        let transactions = sample_transactions();
        let guess = |previous_hash| {
            let payload = ProofPayload {
                nonce: 5,
                previous_hash,
                transactions: &transactions,
            };
            sha256_hex(canonical_json_bytes(&payload).unwrap().as_slice())
        };

        // The anchor is part of the hashed guess, so a proof cannot be
        // reused in front of a different block.
        assert_ne!(guess("abc"), guess("abd"));
    }

    #[test]
    fn test_impossible_difficulty_exhausts_cap() {
        let transactions = sample_transactions();
        // 65 leading zeros can never fit in a 64-character digest.
        let pow = ProofOfWork::with_max_nonce(65, 100);
        assert_eq!(pow.find_proof(&transactions, "abc"), None);
    }

    #[test]
    fn test_cancelled_search_returns_none() {
        let transactions = sample_transactions();
        let pow = ProofOfWork::new(0);
        pow.cancel_flag().store(true, Ordering::Relaxed);

        // Difficulty zero would otherwise succeed on the first nonce.
        assert_eq!(pow.find_proof(&transactions, "abc"), None);
    }

    #[test]
    fn test_is_valid_proof_rejects_oversized_difficulty() {
        let transactions = sample_transactions();
        assert!(!is_valid_proof(&transactions, "abc", 0, 65));
    }
}
