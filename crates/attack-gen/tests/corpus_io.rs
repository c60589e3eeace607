use std::fs;

use attack_core::Record;
use attack_gen::{load_corpus, parse_corpus, render_corpus, write_corpus};
use tempfile::tempdir;

#[test]
fn crlf_terminators_do_not_leak_into_alignment() {
    let dataset = parse_corpus("w1 w2 w3\tv1 v2 v3\t0 1 2 3\r\nw1 w3 w2\tv1 v4 v5\t0 1 2 3\r\n")
        .unwrap();
    assert_eq!(dataset.len(), 2);
    assert_eq!(dataset[0].alignment.last().unwrap(), "3");
    assert_eq!(dataset[1].input, vec!["w1", "w3", "w2"]);
}

#[test]
fn missing_fields_are_fatal() {
    let err = parse_corpus("a b c\tx y z\t0 1 2\na b c\tx y z\n").unwrap_err();
    assert_eq!(err.info().code, "malformed-record");
    assert_eq!(err.info().context.get("line").unwrap(), "2");
}

#[test]
fn extra_fields_are_ignored() {
    let dataset = parse_corpus("a b c\tx y\t0 1 2\tnote").unwrap();
    assert_eq!(dataset[0].alignment, vec!["0", "1", "2"]);
}

#[test]
fn rendering_has_no_trailing_newline() {
    let dataset = vec![
        Record::from_fields("a b c", "x y", "0 1 2"),
        Record::from_fields("a c b", "x z", "0 2 1"),
    ];
    assert_eq!(render_corpus(&dataset), "a b c\tx y\t0 1 2\na c b\tx z\t0 2 1");
    assert_eq!(render_corpus(&Vec::new()), "");
}

#[test]
fn written_corpus_reloads_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("out.tsv");
    let dataset = vec![
        Record::from_fields("w0 t1 t2 w3", "a b c", "0 2 1 3"),
        Record::from_fields("w0 t2 t1 w3", "a c d", "0 1 2 3"),
    ];
    write_corpus(&path, &dataset).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), render_corpus(&dataset));
    assert_eq!(load_corpus(&path).unwrap(), dataset);
}
