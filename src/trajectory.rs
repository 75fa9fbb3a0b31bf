//! Plain-text trajectory log.
//!
//! One line per sampled step: `time PE KE TE x0 y0 x1 y1 ...`, separated by
//! single spaces. Lines starting with `#` are comments. Floats are written
//! with Rust's shortest round-trip formatting, so reading a log back gives
//! bit-identical values.

use crate::error::{MdError, Result};
use crate::pbc::wrap_position;
use crate::run_md::EnergyRecord;
use crate::simulation::Frame;
use nalgebra::Vector2;
use std::io::{BufRead, Write};

/// One parsed line of a trajectory log.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryFrame {
    pub record: EnergyRecord,
    pub positions: Vec<Vector2<f64>>,
}

pub struct TrajectoryWriter<W: Write> {
    writer: W,
    box_length: Option<f64>,
}

impl<W: Write> TrajectoryWriter<W> {
    pub fn new(writer: W) -> Self {
        TrajectoryWriter {
            writer,
            box_length: None,
        }
    }

    /// Fold positions into `[0, box_length)` before writing them.
    pub fn wrapped(mut self, box_length: f64) -> Self {
        self.box_length = Some(box_length);
        self
    }

    pub fn write_header(&mut self, n_atoms: usize) -> Result<()> {
        write!(self.writer, "# time potential kinetic total")?;
        for i in 0..n_atoms {
            write!(self.writer, " x{} y{}", i, i)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn write_record(&mut self, record: &EnergyRecord, positions: &[Vector2<f64>]) -> Result<()> {
        write!(
            self.writer,
            "{} {} {} {}",
            record.time, record.potential, record.kinetic, record.total
        )?;
        for &p in positions {
            let p = match self.box_length {
                Some(l) => wrap_position(p, l),
                None => p,
            };
            write!(self.writer, " {} {}", p.x, p.y)?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    pub fn write_frame(&mut self, frame: &Frame<'_>) -> Result<()> {
        self.write_record(frame.record, frame.positions)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

fn parse_line(line: &str, line_no: usize) -> Result<TrajectoryFrame> {
    let bad = |message: String| MdError::Parse {
        what: format!("trajectory line {}", line_no),
        message,
    };

    let values = line
        .split_whitespace()
        .map(|tok| tok.parse::<f64>().map_err(|e| bad(format!("'{}': {}", tok, e))))
        .collect::<Result<Vec<f64>>>()?;

    if values.len() < 4 || (values.len() - 4) % 2 != 0 {
        return Err(bad(format!(
            "expected 4 energies followed by coordinate pairs, got {} values",
            values.len()
        )));
    }

    let record = EnergyRecord {
        time: values[0],
        potential: values[1],
        kinetic: values[2],
        total: values[3],
    };
    let positions = values[4..]
        .chunks_exact(2)
        .map(|xy| Vector2::new(xy[0], xy[1]))
        .collect();
    Ok(TrajectoryFrame { record, positions })
}

/// Read every frame of a trajectory log.
pub fn read_trajectory<R: BufRead>(reader: R) -> Result<Vec<TrajectoryFrame>> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        frames.push(parse_line(trimmed, idx + 1)?);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_write_and_read_back() {
        let mut writer = TrajectoryWriter::new(Vec::new());
        writer.write_header(2).unwrap();
        let record = EnergyRecord::new(0.005, 13.714829002, 61.25);
        let positions = vec![Vector2::new(0.1, 2.9), Vector2::new(1.0 / 3.0, -0.25)];
        writer.write_record(&record, &positions).unwrap();
        let bytes = writer.into_inner();

        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(text.starts_with("# time potential kinetic total x0 y0 x1 y1\n"));

        let frames = read_trajectory(Cursor::new(bytes)).unwrap();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].record, record);
        assert_eq!(frames[0].positions, positions);
    }

    #[test]
    fn test_wrapped_output() {
        let mut writer = TrajectoryWriter::new(Vec::new()).wrapped(3.0);
        let record = EnergyRecord::new(0.0, 0.0, 0.0);
        writer
            .write_record(&record, &[Vector2::new(-0.5, 3.5)])
            .unwrap();
        let frames = read_trajectory(Cursor::new(writer.into_inner())).unwrap();
        assert_eq!(frames[0].positions[0], Vector2::new(2.5, 0.5));
    }

    #[test]
    fn test_non_finite_values_survive() {
        let mut writer = TrajectoryWriter::new(Vec::new());
        let record = EnergyRecord::new(1.0, f64::INFINITY, 2.0);
        writer.write_record(&record, &[Vector2::new(f64::NAN, 0.0)]).unwrap();
        let frames = read_trajectory(Cursor::new(writer.into_inner())).unwrap();
        assert!(frames[0].record.potential.is_infinite());
        assert!(frames[0].positions[0].x.is_nan());
    }

    #[test]
    fn test_rejects_malformed_lines() {
        let odd = "0.0 1.0 2.0 3.0 0.5\n";
        assert!(matches!(
            read_trajectory(Cursor::new(odd)),
            Err(MdError::Parse { .. })
        ));
        let junk = "# header\n0.0 abc 2.0 3.0\n";
        match read_trajectory(Cursor::new(junk)) {
            Err(MdError::Parse { what, .. }) => assert_eq!(what, "trajectory line 2"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
