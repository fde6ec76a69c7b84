//! Property-based invariant tests for the markup protocol parser.
//!
//! 1. Arbitrary bytes never panic and the iterator always terminates.
//! 2. Every emitted text span lies inside the input and holds no newline.
//! 3. Well-formed frames decode to exactly the operations they encode,
//!    in both the compact and the line-per-token form.
//! 4. A stream either ends in `EndFrame` or in exactly one error.
//! 5. Out-of-range selectors always fail.

use bevelbar_core::protocol::{
    LayoutOp, ParseError, ProtocolLimits, ProtocolParser, Target, parse_frame,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Item {
    Empty,
    Segment { style: usize, text: String },
}

#[derive(Debug, Clone)]
struct Block {
    target: Target,
    items: Vec<Item>,
}

const MONITORS: usize = 3;
const STYLES: usize = 4;

fn limits() -> ProtocolLimits {
    ProtocolLimits::new(MONITORS, STYLES)
}

fn item_strategy() -> impl Strategy<Value = Item> {
    prop_oneof![
        Just(Item::Empty),
        (0..STYLES, "[a-z0-9 %:/.-]{0,12}").prop_map(|(style, text)| Item::Segment { style, text }),
    ]
}

fn block_strategy() -> impl Strategy<Value = Block> {
    let target = prop_oneof![Just(Target::All), (0..MONITORS).prop_map(Target::Monitor)];
    (target, prop::collection::vec(item_strategy(), 0..6))
        .prop_map(|(target, items)| Block { target, items })
}

fn encode(blocks: &[Block], line_form: bool) -> Vec<u8> {
    let mut out = Vec::new();
    let token = |out: &mut Vec<u8>, byte: u8| {
        out.push(byte);
        if line_form {
            out.push(b'\n');
        }
    };
    for block in blocks {
        match block.target {
            Target::All => token(&mut out, b'a'),
            Target::Monitor(i) => token(&mut out, b'0' + i as u8),
        }
        for item in &block.items {
            match item {
                Item::Empty => token(&mut out, b'-'),
                Item::Segment { style, text } => {
                    out.push(b'0' + *style as u8);
                    out.extend_from_slice(text.as_bytes());
                    out.push(b'\n');
                }
            }
        }
        token(&mut out, b'e');
    }
    out.extend_from_slice(b"f\n");
    out
}

// ═════════════════════════════════════════════════════════════════════════
// 1. No panics, always terminates
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn arbitrary_bytes_terminate(input in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut parser = ProtocolParser::new(&input, limits());
        let mut steps = 0usize;
        while parser.next().is_some() {
            steps += 1;
            prop_assert!(steps <= input.len() + 1, "parser did not terminate on {:?}", input);
        }
        prop_assert!(parser.next().is_none());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Spans stay inside the input
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn spans_are_in_bounds(input in prop::collection::vec(any::<u8>(), 0..256)) {
        for op in ProtocolParser::new(&input, limits()).flatten() {
            if let LayoutOp::DrawText { span, .. } = &op {
                prop_assert!(span.start <= span.end);
                prop_assert!(span.end <= input.len());
                let text = op.text(&input).unwrap_or_default();
                prop_assert!(!text.contains(&b'\n'));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Well-formed frames decode to what they encode
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn well_formed_frames_roundtrip(
        blocks in prop::collection::vec(block_strategy(), 0..5),
        line_form in any::<bool>(),
    ) {
        let input = encode(&blocks, line_form);
        let ops = parse_frame(&input, limits());
        prop_assert!(ops.is_ok(), "{:?} failed: {:?}", String::from_utf8_lossy(&input), ops);
        let ops = ops.unwrap_or_default();

        let mut expected = Vec::new();
        for block in &blocks {
            expected.push(LayoutOp::SelectMonitor(block.target));
            for item in &block.items {
                match item {
                    Item::Empty => expected.push(LayoutOp::DrawEmpty(block.target)),
                    Item::Segment { style, .. } => expected.push(LayoutOp::DrawText {
                        target: block.target,
                        style: *style,
                        span: 0..0,
                    }),
                }
            }
            expected.push(LayoutOp::EndMonitor);
        }
        expected.push(LayoutOp::EndFrame);

        prop_assert_eq!(ops.len(), expected.len());
        let texts = blocks.iter().flat_map(|b| b.items.iter()).filter_map(|item| match item {
            Item::Segment { text, .. } => Some(text.as_bytes()),
            Item::Empty => None,
        });
        let decoded: Vec<&[u8]> = ops.iter().filter_map(|op| op.text(&input)).collect();
        prop_assert_eq!(decoded, texts.collect::<Vec<_>>());

        for (got, want) in ops.iter().zip(&expected) {
            match (got, want) {
                (
                    LayoutOp::DrawText { target: t1, style: s1, .. },
                    LayoutOp::DrawText { target: t2, style: s2, .. },
                ) => {
                    prop_assert_eq!(t1, t2);
                    prop_assert_eq!(s1, s2);
                }
                _ => prop_assert_eq!(got, want),
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Exactly one terminal outcome
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn stream_ends_in_end_frame_or_single_error(
        input in prop::collection::vec(prop::sample::select(b"a0123456789:e-f\nxyz".to_vec()), 0..64),
    ) {
        let items: Vec<_> = ProtocolParser::new(&input, limits()).collect();
        let errors = items.iter().filter(|r| r.is_err()).count();
        prop_assert!(errors <= 1);
        match items.last() {
            Some(Ok(op)) => {
                prop_assert_eq!(op, &LayoutOp::EndFrame);
                prop_assert_eq!(errors, 0);
            }
            Some(Err(_)) => prop_assert_eq!(errors, 1),
            None => prop_assert!(false, "parser yielded nothing"),
        }
        let end_frames = items
            .iter()
            .filter(|r| matches!(r, Ok(LayoutOp::EndFrame)))
            .count();
        prop_assert!(end_frames <= 1);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Out-of-range selectors fail
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn out_of_range_monitor_fails(index in MONITORS..40usize) {
        let byte = b'0' + index as u8;
        prop_assume!(byte != b'a' && byte != b'f');
        let input = [byte, b'\n', b'e', b'\n', b'f', b'\n'];
        let result = parse_frame(&input, limits());
        let is_invalid_monitor = matches!(
            result,
            Err(ParseError::InvalidMonitorIndex { offset: 0, .. })
        );
        prop_assert!(is_invalid_monitor);
    }

    #[test]
    fn out_of_range_style_fails(index in STYLES..40usize) {
        let byte = b'0' + index as u8;
        prop_assume!(byte != b'e' && byte != b'-');
        let input = [b'a', b'\n', byte, b'x', b'\n', b'e', b'\n', b'f', b'\n'];
        let result = parse_frame(&input, limits());
        let is_invalid_style = matches!(
            result,
            Err(ParseError::InvalidStyleIndex { offset: 2, .. })
        );
        prop_assert!(is_invalid_style);
    }
}
