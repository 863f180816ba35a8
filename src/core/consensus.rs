use crate::core::{is_valid_proof, Block};
use log::warn;

/// Full validation of a candidate chain: every block must link to the digest
/// of its predecessor and carry a valid proof for its own contents. The
/// first block is the anchor and is not checked against anything. An empty
/// chain is invalid; a chain cannot lose its genesis.
pub fn is_valid_chain(chain: &[Block], difficulty: usize) -> bool {
    if chain.is_empty() {
        return false;
    }

    for window in chain.windows(2) {
        let previous = &window[0];
        let block = &window[1];

        let previous_digest = match previous.hash() {
            Ok(digest) => digest,
            Err(_) => return false,
        };
        if block.get_previous_hash() != previous_digest {
            warn!(
                "Chain validation failed: block {} does not link to its predecessor",
                block.get_index()
            );
            return false;
        }

        if !is_valid_proof(
            block.get_transactions(),
            block.get_previous_hash(),
            block.get_nonce(),
            difficulty,
        ) {
            warn!(
                "Chain validation failed: block {} carries an invalid proof",
                block.get_index()
            );
            return false;
        }
    }

    true
}

/// Pick the longest fully valid candidate that is strictly longer than the
/// local chain. Candidates that merely tie the current best are skipped, so
/// the first candidate of maximal length wins.
pub fn select_longest_valid(
    local_len: usize,
    candidates: impl IntoIterator<Item = Vec<Block>>,
    difficulty: usize,
) -> Option<Vec<Block>> {
    let mut best: Option<Vec<Block>> = None;
    let mut max_length = local_len;

    for candidate in candidates {
        if candidate.len() > max_length && is_valid_chain(candidate.as_slice(), difficulty) {
            max_length = candidate.len();
            best = Some(candidate);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Transaction;
    use crate::testkit::{mined_chain, mined_chain_paying};

    #[test]
    fn test_empty_chain_is_invalid() {
        assert!(!is_valid_chain(&[], 1));
    }

    #[test]
    fn test_genesis_only_chain_is_valid() {
        let chain = mined_chain(1, 1);
        assert!(is_valid_chain(&chain, 1));
    }

    #[test]
    fn test_mined_chain_is_valid() {
        let chain = mined_chain(4, 1);
        assert!(is_valid_chain(&chain, 1));
    }

    #[test]
    fn test_tampered_transaction_invalidates_chain() {
        let mut chain = mined_chain(3, 1);
        let target = &chain[1];
        let forged = Block::new_test_block(
            target.get_index(),
            target.get_nonce(),
            target.get_previous_hash().to_string(),
            target.get_timestamp(),
            vec![Transaction::new("alice", "mallory", 1000.0)],
        );
        chain[1] = forged;

        assert!(!is_valid_chain(&chain, 1));
    }

    #[test]
    fn test_broken_linkage_invalidates_chain() {
        let mut chain = mined_chain(3, 1);
        let target = &chain[2];
        let unlinked = Block::new_test_block(
            target.get_index(),
            target.get_nonce(),
            "0000definitely-not-the-predecessor".to_string(),
            target.get_timestamp(),
            target.get_transactions().to_vec(),
        );
        chain[2] = unlinked;

        assert!(!is_valid_chain(&chain, 1));
    }

    #[test]
    fn test_select_prefers_strictly_longer_valid_chain() {
        let local = mined_chain(2, 1);
        let longer = mined_chain(4, 1);

        let chosen = select_longest_valid(local.len(), vec![longer.clone()], 1);
        assert_eq!(chosen, Some(longer));
    }

    #[test]
    fn test_select_ignores_equal_length_chains() {
        let local = mined_chain(3, 1);
        let rival = mined_chain_paying(3, 1, "carol");

        assert_eq!(select_longest_valid(local.len(), vec![rival], 1), None);
    }

    #[test]
    fn test_select_ignores_longer_invalid_chain() {
        let local = mined_chain(2, 1);
        let mut corrupt = mined_chain(5, 1);
        corrupt[3] = Block::new_test_block(4, 0, "garbage".to_string(), 0, vec![]);

        assert_eq!(select_longest_valid(local.len(), vec![corrupt], 1), None);
    }

    #[test]
    fn test_select_first_of_maximal_length_wins() {
        let local = mined_chain(1, 1);
        let first = mined_chain(3, 1);
        let second = mined_chain_paying(3, 1, "carol");
        assert_ne!(first, second);

        let chosen = select_longest_valid(local.len(), vec![first.clone(), second], 1);
        assert_eq!(chosen, Some(first));
    }

    #[test]
    fn test_select_takes_longest_among_multiple() {
        let local = mined_chain(1, 1);
        let short = mined_chain(2, 1);
        let long = mined_chain(4, 1);

        let chosen = select_longest_valid(local.len(), vec![short, long.clone()], 1);
        assert_eq!(chosen, Some(long));
    }
}
