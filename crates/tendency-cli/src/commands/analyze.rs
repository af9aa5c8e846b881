//! `tendency analyze` — information-content report for an existing batch.

use std::io::Read;
use std::path::Path;

use tendency_core::analyze;

use super::EXIT_CONFIG;

pub fn run(input: Option<&str>, json: bool) {
    let text = match read_input(input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            std::process::exit(1);
        }
    };
    let values = match parse_values(&text) {
        Ok(values) => values,
        Err(e) => {
            eprintln!("Invalid input: {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let report = analyze(&values);
    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to serialize report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("Analyzed {} value(s)\n", values.len());
        println!("{report}");
    }
}

fn read_input(input: Option<&str>) -> std::io::Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(Path::new(path)),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Integers separated by whitespace and/or commas. Empty input is an empty
/// batch, not an error.
fn parse_values(text: &str) -> Result<Vec<i64>, String> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|tok| !tok.is_empty())
        .map(|tok| {
            tok.parse::<i64>()
                .map_err(|_| format!("'{tok}' is not an integer"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_separators() {
        assert_eq!(parse_values("1, 2\n-3\t4,,5").unwrap(), vec![1, 2, -3, 4, 5]);
    }

    #[test]
    fn test_parse_empty_is_empty_batch() {
        assert!(parse_values("  \n ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_floats() {
        let err = parse_values("1 2.5").unwrap_err();
        assert!(err.contains("2.5"));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.txt");
        std::fs::write(&path, "4 -2 4\n").unwrap();
        let text = read_input(path.to_str()).unwrap();
        let report = analyze(&parse_values(&text).unwrap());
        assert_eq!(report.samples, 3);
        assert_eq!(report.distinct_values, 2);
        assert_eq!(report.total, 6);
    }
}
