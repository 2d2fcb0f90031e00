//! Property-based invariant tests for the editing session.
//!
//! 1. A written byte reads back unchanged
//! 2. Undo restores the content before a mutation, redo the content after it,
//!    also past the history capacity
//! 3. Repeated copies yield the same clipboard
//! 4. `find_all` reports exactly the offsets where the pattern occurs

#![allow(clippy::expect_used)]

use bytelib::{ByteBuffer, EditSession, EngineConfig, Pattern, SearchMode, find_all};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

/// Mutations applied through the session
#[derive(Debug, Clone)]
enum Op {
    SetByte(usize, u8),
    Fill(usize, usize, u8),
    Paste(usize, Vec<u8>),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (any::<usize>(), any::<u8>()).prop_map(|(o, v)| Op::SetByte(o, v)),
        (any::<usize>(), any::<usize>(), any::<u8>()).prop_map(|(s, e, v)| Op::Fill(s, e, v)),
        (any::<usize>(), prop::collection::vec(any::<u8>(), 1..8))
            .prop_map(|(o, bytes)| Op::Paste(o, bytes)),
    ]
}

fn session_with(bytes: Vec<u8>, capacity: usize) -> EditSession {
    let config = EngineConfig {
        history_capacity: capacity,
        ..EngineConfig::default()
    };
    let mut session = EditSession::new(config).expect("valid config");
    session.load(bytes);
    session
}

/// Apply a mutation at offsets wrapped into the buffer
fn apply(session: &mut EditSession, op: &Op) {
    let len = session.len();
    match op {
        Op::SetByte(o, v) => {
            session.set_byte(o % len, *v).expect("offset in range");
        }
        Op::Fill(s, e, v) => {
            session.fill_range(s % len, e % len, *v).expect("range in bounds");
        }
        Op::Paste(o, bytes) => {
            session.set_clipboard(bytes.clone());
            session.set_active(o % len, false).expect("offset in range");
            session.paste().expect("cursor in range");
        }
    }
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn set_then_get_round_trips(
        data in prop::collection::vec(any::<u8>(), 1..256),
        offset in any::<usize>(),
        value in any::<u8>(),
    ) {
        let mut session = session_with(data, 100);
        let offset = offset % session.len();

        session.set_byte(offset, value).expect("offset in range");

        prop_assert_eq!(session.get_byte(offset), Ok(value));
    }

    #[test]
    fn undo_redo_are_inverse_past_capacity(
        data in prop::collection::vec(any::<u8>(), 1..64),
        capacity in 1usize..6,
        ops in prop::collection::vec(op_strategy(), 1..20),
    ) {
        let mut session = session_with(data, capacity);
        let mut states = vec![session.export().to_vec()];
        for op in &ops {
            apply(&mut session, op);
            states.push(session.export().to_vec());
        }

        // Only the newest `capacity` mutations can be reverted
        let reachable = ops.len().min(capacity);
        prop_assert_eq!(session.undo_depth(), reachable);

        for step in 1..=reachable {
            session.undo().expect("snapshot available");
            prop_assert_eq!(session.export(), states[states.len() - 1 - step].as_slice());
        }
        prop_assert!(!session.can_undo());

        for step in (0..reachable).rev() {
            session.redo().expect("snapshot available");
            prop_assert_eq!(session.export(), states[states.len() - 1 - step].as_slice());
        }
        prop_assert!(!session.can_redo());
    }

    #[test]
    fn copy_is_idempotent(
        data in prop::collection::vec(any::<u8>(), 1..128),
        start in any::<usize>(),
        end in any::<usize>(),
    ) {
        let mut session = session_with(data, 100);
        let len = session.len();
        session.select_range(start % len, end % len).expect("range in bounds");

        let first_len = session.copy();
        let first = session.clipboard().to_vec();
        let second_len = session.copy();

        prop_assert_eq!(first_len, second_len);
        prop_assert_eq!(session.clipboard(), first.as_slice());
    }

    #[test]
    fn find_all_is_exact(
        data in prop::collection::vec(0u8..4, 0..200),
        needle in prop::collection::vec(0u8..4, 1..4),
    ) {
        let buf = ByteBuffer::from(data.clone());
        let query: String = needle.iter().map(|b| format!("{b:02X}")).collect();
        let pattern = Pattern::parse(&query, SearchMode::Hex, true).expect("valid hex");

        let expected: Vec<usize> = data
            .windows(needle.len())
            .enumerate()
            .filter(|(_, w)| *w == needle.as_slice())
            .map(|(idx, _)| idx)
            .collect();

        prop_assert_eq!(find_all(&buf, &pattern), expected);
    }
}
