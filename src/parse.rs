//! TetGen-style text parsing for volumetric geometry.
//!
//! `.node` files carry one rest position per row; `.ele` files carry one
//! tetrahedron index 4-tuple per row. Both start with a count header and
//! prefix every row with a running index, which may be 0- or 1-based
//! depending on how the mesh was generated. Only string content is
//! consumed here; file access stays with the host.

use crate::Error;

struct Rows<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Rows<'a> {
    fn new(text: &'a str) -> Rows<'a> {
        Rows {
            lines: text.lines().enumerate(),
        }
    }

    /// Next non-empty, non-comment row with its 1-based line number.
    fn next_row(&mut self) -> Option<(usize, Vec<&'a str>)> {
        for (i, line) in self.lines.by_ref() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            return Some((i + 1, line.split_whitespace().collect()));
        }
        None
    }
}

fn parse_error(line: usize, reason: impl Into<String>) -> Error {
    Error::ParseGeometry {
        line,
        reason: reason.into(),
    }
}

fn field<T: std::str::FromStr>(tokens: &[&str], idx: usize, line: usize) -> Result<T, Error> {
    tokens
        .get(idx)
        .ok_or_else(|| parse_error(line, format!("expected at least {} fields", idx + 1)))?
        .parse()
        .map_err(|_| parse_error(line, format!("malformed field {:?}", tokens[idx])))
}

/// Parses `.node` text into rest positions.
///
/// Returns the positions in row order together with the file's index base
/// (the leading index of the first row, typically 0 or 1), which callers
/// pass on to [`parse_ele`].
pub fn parse_node(text: &str) -> Result<(Vec<[f64; 3]>, usize), Error> {
    let mut rows = Rows::new(text);
    let (line, header) = rows
        .next_row()
        .ok_or_else(|| parse_error(0, "empty node file"))?;
    let count: usize = field(&header, 0, line)?;
    let dim: usize = field(&header, 1, line)?;
    if dim != 3 {
        return Err(parse_error(line, format!("expected dimension 3, got {}", dim)));
    }

    let mut positions = Vec::with_capacity(count);
    let mut base = 0;
    for row in 0..count {
        let (line, tokens) = rows
            .next_row()
            .ok_or_else(|| parse_error(0, format!("expected {} node rows, got {}", count, row)))?;
        if row == 0 {
            base = field(&tokens, 0, line)?;
        }
        positions.push([
            field(&tokens, 1, line)?,
            field(&tokens, 2, line)?,
            field(&tokens, 3, line)?,
        ]);
    }
    Ok((positions, base))
}

/// Parses `.ele` text into tetrahedron index 4-tuples.
///
/// `index_base` is the node-file index base returned by [`parse_node`];
/// node references are shifted down by it so the result always indexes
/// from zero.
pub fn parse_ele(text: &str, index_base: usize) -> Result<Vec<[usize; 4]>, Error> {
    let mut rows = Rows::new(text);
    let (line, header) = rows
        .next_row()
        .ok_or_else(|| parse_error(0, "empty element file"))?;
    let count: usize = field(&header, 0, line)?;
    let nodes_per_cell: usize = field(&header, 1, line)?;
    if nodes_per_cell != 4 {
        return Err(parse_error(
            line,
            format!("expected 4 nodes per tetrahedron, got {}", nodes_per_cell),
        ));
    }

    let mut cells = Vec::with_capacity(count);
    for row in 0..count {
        let (line, tokens) = rows.next_row().ok_or_else(|| {
            parse_error(0, format!("expected {} element rows, got {}", count, row))
        })?;
        let mut cell = [0usize; 4];
        for (k, slot) in cell.iter_mut().enumerate() {
            let raw: usize = field(&tokens, k + 1, line)?;
            *slot = raw.checked_sub(index_base).ok_or_else(|| {
                parse_error(line, format!("node index {} below index base {}", raw, index_base))
            })?;
        }
        cells.push(cell);
    }
    Ok(cells)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NODE_FILE: &str = "\
# unit tetrahedron
4 3 0 0
1  0.0 0.0 0.0
2  1.0 0.0 0.0
3  0.0 1.0 0.0
4  0.0 0.0 1.0
";

    const ELE_FILE: &str = "\
1 4 0
1  1 2 3 4
";

    #[test]
    fn node_rows_and_base() {
        let (positions, base) = parse_node(NODE_FILE).unwrap();
        assert_eq!(base, 1);
        assert_eq!(positions.len(), 4);
        assert_eq!(positions[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn ele_rows_rebased_to_zero() {
        let cells = parse_ele(ELE_FILE, 1).unwrap();
        assert_eq!(cells, vec![[0, 1, 2, 3]]);
    }

    #[test]
    fn trailing_comments_and_blank_lines_are_skipped() {
        let text = "2 3 0 0\n\n0 1 2 3 # first\n# interlude\n1 4 5 6\n";
        let (positions, base) = parse_node(text).unwrap();
        assert_eq!(base, 0);
        assert_eq!(positions, vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn short_file_is_an_error() {
        let err = parse_node("4 3 0 0\n0 0.0 0.0 0.0\n").unwrap_err();
        assert!(matches!(err, Error::ParseGeometry { .. }));
    }

    #[test]
    fn malformed_float_reports_line() {
        let err = parse_node("1 3 0 0\n0 0.0 oops 0.0\n").unwrap_err();
        match err {
            Error::ParseGeometry { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn underflowing_index_is_an_error() {
        let err = parse_ele("1 4 0\n1 0 1 2 3\n", 1).unwrap_err();
        assert!(matches!(err, Error::ParseGeometry { .. }));
    }
}
