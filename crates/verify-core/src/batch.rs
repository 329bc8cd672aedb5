//! Partitioning of the reference key sequence into query batches.

use crate::types::Batch;

/// Slice the first `min(max_to_process, keys.len())` keys into batches of
/// `batch_size`, preserving order. The last batch holds the remainder.
///
/// `batch_size` and `max_to_process` are validated by the caller; a zero
/// `batch_size` is treated as 1 so the function never panics.
pub fn build_batches(keys: &[String], batch_size: usize, max_to_process: usize) -> Vec<Batch> {
    let take = max_to_process.min(keys.len());
    keys[..take]
        .chunks(batch_size.max(1))
        .enumerate()
        .map(|(id, chunk)| Batch {
            id,
            keys: chunk.to_vec(),
        })
        .collect()
}

/// Describe the batching plan for logging.
pub fn describe_batches(batches: &[Batch], batch_size: usize) -> String {
    let accounts: usize = batches.iter().map(Batch::len).sum();
    match batches.last() {
        Some(last) if last.len() < batch_size => format!(
            "{} accounts in {} batches of {} (last batch {})",
            accounts,
            batches.len(),
            batch_size,
            last.len()
        ),
        _ => format!(
            "{} accounts in {} batches of {}",
            accounts,
            batches.len(),
            batch_size
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("k{i}")).collect()
    }

    #[test]
    fn test_exact_multiple() {
        let batches = build_batches(&keys(6), 2, 100);
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.len() == 2));
        assert_eq!(batches[2].keys, vec!["k4", "k5"]);
    }

    #[test]
    fn test_remainder_in_last_batch() {
        let batches = build_batches(&keys(7), 3, 100);
        assert_eq!(batches.len(), 3);
        assert_eq!(batches[0].len(), 3);
        assert_eq!(batches[1].len(), 3);
        assert_eq!(batches[2].keys, vec!["k6"]);
    }

    #[test]
    fn test_max_to_process_caps_keys() {
        let batches = build_batches(&keys(10), 4, 5);
        let flat: Vec<String> = batches.into_iter().flat_map(|b| b.keys).collect();
        assert_eq!(flat, keys(5));
    }

    #[test]
    fn test_empty_input() {
        assert!(build_batches(&[], 25, 5000).is_empty());
    }

    #[test]
    fn test_ids_follow_order() {
        let batches = build_batches(&keys(5), 2, 100);
        let ids: Vec<usize> = batches.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_concatenation_reproduces_prefix() {
        for len in 0..20 {
            for batch_size in 1..7 {
                for max in [1, 3, 10, 50] {
                    let input = keys(len);
                    let batches = build_batches(&input, batch_size, max);
                    let flat: Vec<String> =
                        batches.iter().flat_map(|b| b.keys.clone()).collect();
                    assert_eq!(flat, input[..max.min(len)].to_vec());
                    if let Some((last, rest)) = batches.split_last() {
                        assert!(rest.iter().all(|b| b.len() == batch_size));
                        assert!(!last.is_empty() && last.len() <= batch_size);
                    }
                }
            }
        }
    }

    #[test]
    fn test_describe_batches() {
        let batches = build_batches(&keys(7), 3, 100);
        let description = describe_batches(&batches, 3);
        assert!(description.contains("7 accounts"));
        assert!(description.contains("last batch 1"));
    }
}
