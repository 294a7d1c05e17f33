use log::{info, warn};

use cef_parsing::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Read;

use serde::Serialize;
use serde_json::json;
use serde_json::Value as JSValue;

#[derive(Debug, Snafu)]
pub enum CliError {
    #[snafu(display("Error reading input file {path}"))]
    ReadingInput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading the standard input"))]
    ReadingStdin { source: std::io::Error },
    #[snafu(display("Error writing output file {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingSummary { source: serde_json::Error },
}

type CliResult<T> = Result<T, CliError>;

/// Headline counts of a parsing run, included in the JSON summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize)]
pub struct RunStats {
    #[serde(rename = "parsedBallots")]
    pub parsed_ballots: usize,
    #[serde(rename = "rejectedLines")]
    pub rejected_lines: usize,
}

/// One pass over a whole source: ballots and line errors, each still carrying
/// the source line number.
pub struct ParseOutcome {
    pub ballots: Vec<(usize, Ballot)>,
    pub errors: Vec<LineError>,
}

pub fn parse_source(text: &str) -> ParseOutcome {
    let mut ballots: Vec<(usize, Ballot)> = Vec::new();
    let mut errors: Vec<LineError> = Vec::new();
    let mut reader = parse_lines(text.lines().map(|s| s.to_string()));
    while let Some(res) = reader.next() {
        match res {
            Ok(ballot) => ballots.push((reader.lineno(), ballot)),
            Err(e) => {
                warn!("{}", e);
                errors.push(e);
            }
        }
    }
    ParseOutcome { ballots, errors }
}

fn ballot_to_json(lineno: usize, ballot: &Ballot) -> JSValue {
    let groups: Vec<JSValue> = ballot
        .ranked_groups
        .iter()
        .map(|g| json!(g.iter().collect::<Vec<_>>()))
        .collect();
    json!({
        "line": lineno,
        "tags": ballot.tags,
        "ranking": groups,
        "count": ballot.count,
        "weight": ballot.weight,
    })
}

fn line_error_to_json(e: &LineError) -> JSValue {
    json!({
        "line": e.lineno,
        "text": e.line,
        "error": e.cause.to_string(),
    })
}

pub fn build_summary_js(outcome: &ParseOutcome) -> JSValue {
    let stats = RunStats {
        parsed_ballots: outcome.ballots.len(),
        rejected_lines: outcome.errors.len(),
    };
    let ballots: Vec<JSValue> = outcome
        .ballots
        .iter()
        .map(|(lineno, b)| ballot_to_json(*lineno, b))
        .collect();
    let errors: Vec<JSValue> = outcome.errors.iter().map(line_error_to_json).collect();
    json!({
        "stats": stats,
        "ballots": ballots,
        "errors": errors,
    })
}

/// Reads the input, runs the pipeline and writes the JSON summary.
///
/// Returns the number of rejected lines; the exit-code policy lives in main.
pub fn run_parse(input: Option<String>, out: Option<String>) -> CliResult<usize> {
    let text = match &input {
        Some(path) => {
            fs::read_to_string(path).context(ReadingInputSnafu { path: path.clone() })?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context(ReadingStdinSnafu {})?;
            buf
        }
    };

    let outcome = parse_source(&text);
    info!(
        "parsed {} ballots, rejected {} lines",
        outcome.ballots.len(),
        outcome.errors.len()
    );

    let summary = build_summary_js(&outcome);
    let pretty = serde_json::to_string_pretty(&summary).context(SerializingSummarySnafu {})?;
    match out.as_deref() {
        None | Some("stdout") => println!("{}", pretty),
        Some(path) => fs::write(path, pretty).context(WritingOutputSnafu {
            path: path.to_string(),
        })?,
    }

    for e in &outcome.errors {
        eprintln!("{}", e);
    }
    Ok(outcome.errors.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# sample election\n\
        Alice=Bob>Carol*3\n\
        \n\
        A>>B\n\
        t1,t2||/EMPTY_RANKING/\n";

    #[test]
    fn parse_source_keeps_line_numbers() {
        let outcome = parse_source(SAMPLE);
        assert_eq!(outcome.ballots.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.ballots[0].0, 2);
        assert_eq!(outcome.ballots[1].0, 5);
        assert_eq!(outcome.errors[0].lineno, 4);
    }

    #[test]
    fn summary_reports_counts_and_errors() {
        let summary = build_summary_js(&parse_source(SAMPLE));
        assert_eq!(summary["stats"]["parsedBallots"], json!(2));
        assert_eq!(summary["stats"]["rejectedLines"], json!(1));
        assert_eq!(summary["ballots"][0]["count"], json!(3));
        assert_eq!(summary["ballots"][1]["ranking"], json!([]));
        assert_eq!(summary["errors"][0]["line"], json!(4));
    }
}
