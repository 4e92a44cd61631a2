//! Integration test suite for `jsonmatch` CLI
use assert_cmd::Command;

/// Helper function to run the `main` binary with the given arguments and return a
/// [`assert_cmd::assert::Assert`].
fn run_main(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("jm").expect("Failed to find main binary");
    cmd.args(args);
    cmd.assert()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Write;

    const MATH_FILTER: &str =
        r#"{"filterType":"containsField","field":"tags","value":"math"}"#;

    #[test]
    fn no_matches_prints_nothing() {
        let filter =
            r#"{"filterType":"present","field":"does_not_exist"}"#;
        let output = run_main(&[filter, "tests/data/people.json"])
            .success()
            .code(0)
            .get_output()
            .stdout
            .clone();
        let output_str =
            String::from_utf8(output).expect("Invalid UTF-8 output");

        assert!(
            output_str.trim().is_empty(),
            "Expected no output when nothing matches, got: {output_str:?}"
        );
    }

    #[test]
    fn nonexistent_file() {
        let assert = run_main(&[MATH_FILTER, "no/such/file.json"]);
        assert.failure();
    }

    #[test]
    fn invalid_filter_json() {
        let assert = run_main(&["{unclosed", "tests/data/people.json"]);
        assert.failure().code(1);
    }

    #[test]
    fn rejected_filter_fails() {
        // Well-formed JSON, but an unknown filterType.
        let assert = run_main(&[
            r#"{"filterType":"bogus"}"#,
            "tests/data/people.json",
        ]);
        assert.failure().code(1);
    }

    #[test]
    fn count_flag_reports_matches() {
        let assert = run_main(&[
            MATH_FILTER,
            "tests/data/people.json",
            "--count",
            "--no-display",
        ])
        .success()
        .code(0);
        let output_str = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        assert_eq!(output_str.trim(), "Matched documents: 2");
    }

    #[test]
    fn compact_output_is_parseable_json() {
        // Two of the three fixture documents carry the "math" tag; each
        // match is printed as an index header line followed by the value.
        let assert = run_main(&[
            MATH_FILTER,
            "tests/data/people.json",
            "--compact",
        ])
        .success()
        .code(0);
        let output_str = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");

        let mut names = Vec::new();
        let mut lines = output_str.lines();
        while let Some(header) = lines.next() {
            assert!(
                header.ends_with(':'),
                "expected index header, got: {header:?}"
            );
            let doc_line = lines.next().expect("document after header");
            let doc: Value = serde_json::from_str(doc_line)
                .expect("Failed to parse output JSON");
            names.push(doc["name"].as_str().expect("name field").to_owned());
        }
        assert_eq!(names, ["Ada Lovelace", "Alan Turing"]);
    }

    #[test]
    fn filter_can_come_from_a_file() {
        let assert = run_main(&[
            "tests/data/filter.json",
            "tests/data/people.json",
            "--count",
            "--no-display",
        ])
        .success()
        .code(0);
        let output_str = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        assert_eq!(output_str.trim(), "Matched documents: 2");
    }

    #[test]
    fn single_document_from_stdin() {
        let mut file =
            tempfile::NamedTempFile::new().expect("create temp filter file");
        write!(file, r#"{{"filterType":"equals","field":"x","value":1}}"#)
            .expect("write temp filter file");

        let mut cmd =
            Command::cargo_bin("jm").expect("Failed to find main binary");
        cmd.arg(file.path())
            .args(["--count", "--no-display"])
            .write_stdin(r#"{"x": 1}"#);
        let assert = cmd.assert().success().code(0);
        let output_str = String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output");
        assert_eq!(output_str.trim(), "Matched documents: 1");
    }
}
