//! Native script evaluation
//!
//! Decides whether a native script would pass phase-1 validation given the
//! keys that will sign the transaction and its validity interval. Hashing
//! does not need any of this; spending checks do.

use thetis_primitives::{AddrKeyhash, NativeScript};

/// The slot window a transaction is valid in
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotInterval {
    pub lower: u64,
    pub upper: u64,
}

pub fn is_satisfied(
    script: &NativeScript,
    signed_by: &[AddrKeyhash],
    interval: &SlotInterval,
) -> bool {
    match script {
        NativeScript::ScriptPubkey(key) => signed_by.contains(key),
        NativeScript::ScriptAll(scripts) => scripts
            .iter()
            .all(|x| is_satisfied(x, signed_by, interval)),
        NativeScript::ScriptAny(scripts) => scripts
            .iter()
            .any(|x| is_satisfied(x, signed_by, interval)),
        NativeScript::ScriptNOfK(n, scripts) => {
            let satisfied = scripts
                .iter()
                .filter(|x| is_satisfied(x, signed_by, interval))
                .count();

            satisfied >= *n as usize
        }
        NativeScript::InvalidBefore(slot) => interval.lower >= *slot,
        NativeScript::InvalidHereafter(slot) => interval.upper < *slot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thetis_crypto::hash::Hash;

    fn key(n: u8) -> AddrKeyhash {
        Hash::from([n; 28])
    }

    fn window(lower: u64, upper: u64) -> SlotInterval {
        SlotInterval { lower, upper }
    }

    #[test]
    fn signature_leaf_checks_membership() {
        let script = NativeScript::ScriptPubkey(key(1));

        assert!(is_satisfied(&script, &[key(1), key(2)], &window(0, 0)));
        assert!(!is_satisfied(&script, &[key(2)], &window(0, 0)));
    }

    #[test]
    fn all_and_any_combinators() {
        let both = NativeScript::ScriptAll(vec![
            NativeScript::ScriptPubkey(key(1)),
            NativeScript::ScriptPubkey(key(2)),
        ]);

        let either = NativeScript::ScriptAny(vec![
            NativeScript::ScriptPubkey(key(1)),
            NativeScript::ScriptPubkey(key(2)),
        ]);

        let signers = [key(1)];

        assert!(!is_satisfied(&both, &signers, &window(0, 0)));
        assert!(is_satisfied(&either, &signers, &window(0, 0)));
    }

    #[test]
    fn n_of_k_counts_satisfied_branches() {
        let script = NativeScript::ScriptNOfK(
            2,
            vec![
                NativeScript::ScriptPubkey(key(1)),
                NativeScript::ScriptPubkey(key(2)),
                NativeScript::ScriptPubkey(key(3)),
            ],
        );

        assert!(is_satisfied(&script, &[key(1), key(3)], &window(0, 0)));
        assert!(!is_satisfied(&script, &[key(3)], &window(0, 0)));
    }

    #[test]
    fn time_locks_check_the_validity_interval() {
        let not_before = NativeScript::InvalidBefore(100);
        let not_after = NativeScript::InvalidHereafter(200);

        assert!(is_satisfied(&not_before, &[], &window(100, 150)));
        assert!(!is_satisfied(&not_before, &[], &window(99, 150)));

        assert!(is_satisfied(&not_after, &[], &window(100, 199)));
        assert!(!is_satisfied(&not_after, &[], &window(100, 200)));
    }
}
