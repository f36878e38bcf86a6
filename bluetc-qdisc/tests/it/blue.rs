use bluetc_qdisc::blue::{self, QdiscOptions};
use bluetc_qdisc::{registry, ParseError, QdiscError};
use bluetc_wire::tc::blue::{ExtendedStats, MAX_PROB};
use bluetc_wire::tc::fifo::{FifoQopt, TCA_FIFO_PARMS};
use bluetc_wire::tc::TCA_OPTIONS;
use bluetc_wire::{BuilderOptions, MessageBuilder, NlAttr};
use rand::Rng;

use crate::encode;

#[test]
fn limit_round_trip() {
    let _ = tracing_subscriber::fmt::try_init();
    let mut rng = rand::thread_rng();

    for _ in 0..64 {
        let limit: u32 = rng.gen();
        let arg = limit.to_string();
        let bytes = encode(blue::ID, &["limit", arg.as_str()]).unwrap();

        assert_eq!(bytes.len(), 12);
        assert_eq!(blue::decode(Some(&bytes)).unwrap(), Some(FifoQopt { limit }));
    }
}

#[test]
fn defaults_on_empty_command_line() {
    let bytes = encode(blue::ID, &[]).unwrap();
    assert_eq!(blue::decode(Some(&bytes)).unwrap(), Some(FifoQopt { limit: 5_000_000 }));
}

#[test]
fn nested_structure() {
    let bytes = encode(blue::ID, &["limit", "100000", "rehash", "600"]).unwrap();

    let (outer, consumed) = NlAttr::parse(&bytes).unwrap();
    assert_eq!(consumed, 12);
    assert_eq!(outer.kind(), TCA_OPTIONS);

    let inner: Vec<_> = outer.nested().collect::<Result<_, _>>().unwrap();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].kind(), TCA_FIFO_PARMS);
    assert_eq!(inner[0].read_u32(), Some(100_000));
}

#[test]
fn appends_after_existing_attributes() {
    let mut builder = MessageBuilder::with_prefix(&[0xaa; 16], BuilderOptions::default()).unwrap();
    QdiscOptions::default().with_limit(7).encode(&mut builder).unwrap();

    let bytes = builder.freeze();
    assert_eq!(bytes.len(), 28);
    assert_eq!(blue::decode(Some(&bytes[16..])).unwrap(), Some(FifoQopt { limit: 7 }));
}

#[test]
fn parse_failure_appends_nothing() {
    let mut builder = MessageBuilder::default();
    let err = registry()
        .lookup(blue::ID)
        .unwrap()
        .parse_opt(&["limit", "10", "bogus"], &mut builder)
        .unwrap_err();

    assert!(matches!(err, QdiscError::ParseFailed(ParseError::UnknownKeyword(ref t)) if t == "bogus"));
    assert!(builder.is_empty());
}

#[test]
fn small_builder_overflows() {
    let mut builder = MessageBuilder::new(BuilderOptions::default().with_max_len(4));
    let err = registry().lookup(blue::ID).unwrap().parse_opt(&[], &mut builder).unwrap_err();

    assert!(err.is_overflow());
    assert!(builder.is_empty());
}

#[test]
fn xstats_through_registry() {
    let stats = ExtendedStats {
        earlydrop: 1,
        penaltydrop: 2,
        bucketdrop: 3,
        queuedrop: 4,
        childdrop: 5,
        marked: 6,
        maxqlen: 7,
        maxprob: MAX_PROB / 2,
        avgprob: 0,
    };

    let mut out = Vec::new();
    registry().lookup(blue::ID).unwrap().print_xstats(&mut out, Some(&stats.to_bytes())).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "  earlydrop 1 penaltydrop 2 bucketdrop 3 queuedrop 4 childdrop 5 marked 6\n  \
         maxqlen 7 maxprob 0.49999 avgprob 0.00000 "
    );
}
