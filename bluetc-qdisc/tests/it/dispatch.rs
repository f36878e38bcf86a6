use bluetc_qdisc::{registry, QdiscError};
use rand::Rng;

use crate::encode;

#[test]
fn every_module_round_trips_its_limit() {
    let _ = tracing_subscriber::fmt::try_init();
    let limit = rand::thread_rng().gen_range(1..1_000_000u32).to_string();

    for id in registry().ids() {
        let util = registry().lookup(id).unwrap();
        let bytes = encode(id, &["limit", limit.as_str()]).unwrap();

        let mut out = Vec::new();
        util.print_opt(&mut out, Some(&bytes)).unwrap();
        let shown = String::from_utf8(out).unwrap();
        assert!(shown.starts_with("limit "), "{id}: {shown}");

        let mut out = Vec::new();
        util.print_opt(&mut out, None).unwrap();
        assert!(out.is_empty(), "{id} printed without options");
    }
}

#[test]
fn every_module_rejects_unknown_keywords() {
    for id in registry().ids() {
        let err = encode(id, &["bogus"]).unwrap_err();
        assert!(matches!(err, QdiscError::ParseFailed(_)), "{id}: {err}");
        assert!(registry().lookup(id).unwrap().usage().contains(id));
    }
}

#[test]
fn fifo_has_no_xstats() {
    let mut out = Vec::new();
    registry().lookup("pfifo").unwrap().print_xstats(&mut out, Some(&[0; 64])).unwrap();
    assert!(out.is_empty());
}

#[test]
fn unknown_qdisc() {
    assert!(matches!(encode("sfb", &[]), Err(QdiscError::UnknownQdisc(_))));
}
