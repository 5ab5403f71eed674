//! ASCII rawfile reading.
//!
//! Parses the simulator's `Plotname:`/`Variables:`/`Values:` stanzas into
//! plots. Only the real-valued ASCII variant is supported; binary and
//! complex artifacts are rejected with a distinct error.

use std::path::PathBuf;

use cf_results::{Plot, ResultReader, ResultsError, ResultsResult, Vector};
use tracing::debug;

/// Reads plots back from a rawfile on disk.
pub struct RawfileReader {
    path: PathBuf,
}

impl RawfileReader {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ResultReader for RawfileReader {
    fn read_plots(&mut self) -> ResultsResult<Vec<Plot>> {
        let bytes = std::fs::read(&self.path)?;
        let text = String::from_utf8(bytes).map_err(|_| ResultsError::UnsupportedFormat {
            what: "binary rawfile".to_string(),
        })?;
        parse_rawfile(&text)
    }
}

fn syntax(line: usize, what: impl Into<String>) -> ResultsError {
    ResultsError::ArtifactSyntax {
        line: line + 1,
        what: what.into(),
    }
}

/// The simulator's rawfile naming differs from the `kind(token)` names the
/// decoder classifies: the swept scale vector is a bare `v-sweep`, and
/// source branch currents are `<device>#branch`. Re-wrap both quirks at the
/// boundary.
fn normalize_name(name: &str) -> String {
    if name == "v-sweep" {
        return "v(v-sweep)".to_string();
    }
    if let Some(device) = name.strip_suffix("#branch") {
        return format!("i({device})");
    }
    name.to_string()
}

/// Parse ASCII rawfile text into plots. Multiple stanzas (one per analysis)
/// are supported; the first variable of each stanza is its scale vector.
pub fn parse_rawfile(text: &str) -> ResultsResult<Vec<Plot>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut plots = Vec::new();
    let mut pos = 0;

    while pos < lines.len() {
        // skip blank space between stanzas
        while pos < lines.len() && lines[pos].trim().is_empty() {
            pos += 1;
        }
        if pos >= lines.len() {
            break;
        }

        let mut plotname = String::new();
        let mut flags = String::new();
        let mut nvars: Option<usize> = None;
        let mut npoints: Option<usize> = None;

        // header fields up to the Variables: section
        loop {
            let line = *lines
                .get(pos)
                .ok_or_else(|| syntax(pos, "unexpected end of header"))?;
            let trimmed = line.trim();
            pos += 1;

            if trimmed == "Variables:" {
                break;
            }
            if trimmed == "Binary:" {
                return Err(ResultsError::UnsupportedFormat {
                    what: "binary rawfile".to_string(),
                });
            }
            match trimmed.split_once(':') {
                Some(("Plotname", v)) => plotname = v.trim().to_string(),
                Some(("Flags", v)) => flags = v.trim().to_string(),
                Some(("No. Variables", v)) => {
                    nvars = Some(
                        v.trim()
                            .parse()
                            .map_err(|_| syntax(pos - 1, "bad variable count"))?,
                    );
                }
                Some(("No. Points", v)) => {
                    npoints = Some(
                        v.trim()
                            .parse()
                            .map_err(|_| syntax(pos - 1, "bad point count"))?,
                    );
                }
                Some(_) => {} // Title, Date, Command, Options...
                None => return Err(syntax(pos - 1, format!("unexpected line '{trimmed}'"))),
            }
        }

        let nvars = nvars.ok_or_else(|| syntax(pos, "missing 'No. Variables'"))?;
        let npoints = npoints.ok_or_else(|| syntax(pos, "missing 'No. Points'"))?;
        if nvars == 0 {
            return Err(syntax(pos, "stanza declares zero variables"));
        }
        if flags.split_whitespace().any(|f| f == "complex") {
            return Err(ResultsError::UnsupportedFormat {
                what: format!("complex-valued plot '{plotname}'"),
            });
        }

        // variable table: index, name, type
        let mut names = Vec::with_capacity(nvars);
        for _ in 0..nvars {
            let line = *lines
                .get(pos)
                .ok_or_else(|| syntax(pos, "unexpected end of variable table"))?;
            let mut fields = line.split_whitespace();
            let _index = fields
                .next()
                .ok_or_else(|| syntax(pos, "empty variable line"))?;
            let name = fields
                .next()
                .ok_or_else(|| syntax(pos, "variable line missing name"))?;
            names.push(normalize_name(name));
            pos += 1;
        }

        let line = *lines
            .get(pos)
            .ok_or_else(|| syntax(pos, "missing 'Values:'"))?;
        if line.trim() != "Values:" {
            return Err(syntax(pos, format!("expected 'Values:', got '{}'", line.trim())));
        }
        pos += 1;

        // value rows: each point is its running index followed by one value
        // per variable, wrapped across lines
        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(npoints); nvars];
        let mut point = 0;
        let mut slot = 0; // 0 = expecting the point index
        while point < npoints {
            let line = *lines
                .get(pos)
                .ok_or_else(|| syntax(pos, "unexpected end of values"))?;
            for token in line.split_whitespace() {
                if point == npoints {
                    break;
                }
                if slot == 0 {
                    token
                        .parse::<usize>()
                        .map_err(|_| syntax(pos, format!("bad point index '{token}'")))?;
                    slot = 1;
                } else {
                    let value: f64 = token
                        .parse()
                        .map_err(|_| syntax(pos, format!("bad value '{token}'")))?;
                    columns[slot - 1].push(value);
                    slot += 1;
                    if slot == nvars + 1 {
                        slot = 0;
                        point += 1;
                    }
                }
            }
            pos += 1;
        }

        let mut vectors: Vec<Vector> = names
            .into_iter()
            .zip(columns)
            .map(|(name, data)| Vector::new(name, data))
            .collect();
        let scale = vectors.remove(0);

        debug!(plot = %plotname, vectors = vectors.len() + 1, points = npoints, "parsed rawfile stanza");
        plots.push(Plot {
            name: plotname,
            scale,
            data: vectors,
        });
    }

    Ok(plots)
}
