//! Property-based tests for the preview parser and the materializer.

use proptest::prelude::*;

use ingot::{PREVIEW_ROW_LIMIT, materialize, parse_preview};

/// Cell text that cannot collide with the comma or line structure.
fn cell_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.]{1,10}"
}

/// Distinct header tokens, made unique by an index suffix.
fn distinct_headers() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z][a-z0-9_]{0,6}", 1..6).prop_map(|headers| {
        headers
            .into_iter()
            .enumerate()
            .map(|(i, header)| format!("{}_{}", header, i))
            .collect()
    })
}

/// A well-formed document: headers plus rows of matching width.
fn document() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    distinct_headers().prop_flat_map(|headers| {
        let width = headers.len();
        let rows = prop::collection::vec(prop::collection::vec(cell_text(), width), 0..12);
        (Just(headers), rows)
    })
}

/// Like [`document`], but rows may be narrower or wider than the header.
/// Rows keep at least one cell so no line collapses to blank.
fn ragged_document() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    distinct_headers().prop_flat_map(|headers| {
        let width = headers.len();
        let rows = prop::collection::vec(
            prop::collection::vec(cell_text(), 1..width + 3),
            0..8,
        );
        (Just(headers), rows)
    })
}

fn render(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut text = headers.join(",");
    for row in rows {
        text.push('\n');
        text.push_str(&row.join(","));
    }
    text
}

/// Arbitrary JSON values, for materializer round trips.
fn arb_json() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::from),
        any::<i64>().prop_map(serde_json::Value::from),
        any::<f64>().prop_map(serde_json::Value::from),
        "[a-zA-Z0-9 ]{0,12}".prop_map(serde_json::Value::from),
    ];
    leaf.prop_recursive(4, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
            prop::collection::vec(("[a-z]{1,6}", inner), 0..6).prop_map(|entries| {
                let mut object = serde_json::Map::new();
                for (key, value) in entries {
                    object.insert(key, value);
                }
                serde_json::Value::Object(object)
            }),
        ]
    })
}

mod parser_properties {
    use super::*;

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_text(input in ".*") {
            let _ = parse_preview(&input);
        }

        #[test]
        fn never_panics_on_arbitrary_bytes_that_decode(
            bytes in prop::collection::vec(any::<u8>(), 0..256)
        ) {
            if let Ok(text) = String::from_utf8(bytes) {
                let _ = parse_preview(&text);
            }
        }

        #[test]
        fn row_count_is_bounded_by_the_limit((headers, rows) in document()) {
            let table = parse_preview(&render(&headers, &rows)).unwrap();
            prop_assert_eq!(table.len(), rows.len().min(PREVIEW_ROW_LIMIT));
        }

        #[test]
        fn every_row_carries_every_header((headers, rows) in document()) {
            let table = parse_preview(&render(&headers, &rows)).unwrap();
            for row in &table.rows {
                let keys: Vec<&String> = row.keys().collect();
                prop_assert_eq!(&keys, &headers.iter().collect::<Vec<_>>());
            }
        }

        #[test]
        fn cells_survive_the_round_trip((headers, rows) in document()) {
            let table = parse_preview(&render(&headers, &rows)).unwrap();
            for (row, expected) in table.rows.iter().zip(&rows) {
                for (value, original) in row.values().zip(expected) {
                    prop_assert_eq!(value, original);
                }
            }
        }

        #[test]
        fn ragged_rows_are_padded_or_truncated_to_the_header(
            (headers, rows) in ragged_document()
        ) {
            let table = parse_preview(&render(&headers, &rows)).unwrap();
            for (row, original) in table.rows.iter().zip(&rows) {
                prop_assert_eq!(row.len(), headers.len());
                for (i, header) in headers.iter().enumerate() {
                    let expected = original.get(i).map(String::as_str).unwrap_or("");
                    prop_assert_eq!(row.get(header).unwrap(), expected);
                }
            }
        }

        #[test]
        fn surrounding_whitespace_never_changes_the_parse(
            (headers, rows) in document()
        ) {
            let clean = render(&headers, &rows);
            let padded_headers: Vec<String> =
                headers.iter().map(|h| format!("  {}\t", h)).collect();
            let padded_rows: Vec<Vec<String>> = rows
                .iter()
                .map(|row| row.iter().map(|c| format!(" {} ", c)).collect())
                .collect();
            let padded = render(&padded_headers, &padded_rows);

            prop_assert_eq!(
                parse_preview(&clean).unwrap(),
                parse_preview(&padded).unwrap()
            );
        }

        #[test]
        fn parsing_is_deterministic(input in ".*") {
            prop_assert_eq!(parse_preview(&input).unwrap(), parse_preview(&input).unwrap());
        }
    }
}

mod materializer_properties {
    use super::*;

    proptest! {
        #[test]
        fn never_panics_on_arbitrary_text(input in ".*") {
            let _ = materialize(&input);
        }

        #[test]
        fn materialization_is_idempotent(value in arb_json()) {
            let first = materialize(&value.to_string()).unwrap();
            let second = materialize(first.text()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn canonical_text_stays_parseable(value in arb_json()) {
            let result = materialize(&value.to_string()).unwrap();
            let reparsed: serde_json::Value = serde_json::from_str(result.text()).unwrap();
            prop_assert_eq!(reparsed, value);
        }

        #[test]
        fn sinks_always_agree(value in arb_json()) {
            let result = materialize(&value.to_string()).unwrap();
            let download = result.download();
            prop_assert_eq!(result.clipboard_bytes(), download.bytes.as_slice());
        }
    }
}
