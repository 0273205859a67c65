//! Rendering of predictions and replay reports.

use std::io::Write;

use serde::Serialize;
use traction::{Marker, Parameters, Phase, Prediction, Series};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::session::{Frame, SessionReport};

/// Parameters together with their closed-form totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionReport {
    /// Input parameters.
    pub parameters: Parameters,
    /// Closed-form totals.
    pub prediction: Prediction,
}

/// One CSV row of `predict` output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct PredictionRow {
    mass: f64,
    friction_coefficient: f64,
    applied_force: f64,
    force_duration: f64,
    friction_force: f64,
    force_net: f64,
    force_acceleration: f64,
    cutoff_velocity: f64,
    force_distance: f64,
    deceleration: f64,
    friction_time: f64,
    friction_distance: f64,
    total_distance: f64,
    total_time: f64,
}

impl From<&PredictionReport> for PredictionRow {
    fn from(report: &PredictionReport) -> Self {
        let p = &report.parameters;
        let r = &report.prediction;
        Self {
            mass: p.mass,
            friction_coefficient: p.friction_coefficient,
            applied_force: p.applied_force,
            force_duration: p.force_duration,
            friction_force: r.friction_force,
            force_net: r.force_net,
            force_acceleration: r.force_acceleration,
            cutoff_velocity: r.cutoff_velocity,
            force_distance: r.force_distance,
            deceleration: r.deceleration,
            friction_time: r.friction_time,
            friction_distance: r.friction_distance,
            total_distance: r.total_distance,
            total_time: r.total_time,
        }
    }
}

/// One CSV row of `run` output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct FrameRow {
    frame: u64,
    wall: f64,
    time: f64,
    position: f64,
    velocity: f64,
    acceleration: f64,
    net_force: f64,
    phase: Phase,
}

impl From<&Frame> for FrameRow {
    fn from(frame: &Frame) -> Self {
        let s = &frame.snapshot.state;
        Self {
            frame: frame.index,
            wall: frame.wall,
            time: s.time,
            position: s.position,
            velocity: s.velocity,
            acceleration: s.acceleration,
            net_force: s.net_force,
            phase: s.phase,
        }
    }
}

/// Writes a prediction in `format`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_prediction<W: Write>(
    out: &mut W,
    report: &PredictionReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, [PredictionRow::from(report)]),
        OutputFormat::Table => {
            write_parameters(out, &report.parameters)?;
            writeln!(out)?;
            write_prediction_rows(out, &report.prediction)
        }
    }
}

/// Writes a replay report in `format`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_report<W: Write>(
    out: &mut W,
    report: &SessionReport,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, report.frames.iter().map(FrameRow::from)),
        OutputFormat::Table => write_report_table(out, report),
    }
}

fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Header row comes from the field names of `R`.
fn write_csv<W, R, I>(out: &mut W, rows: I) -> Result<()>
where
    W: Write,
    R: Serialize,
    I: IntoIterator<Item = R>,
{
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parameters<W: Write>(out: &mut W, p: &Parameters) -> Result<()> {
    writeln!(
        out,
        "m = {:.3} kg   μ = {:.3}   F = {:.3} N   d = {:.3} s",
        p.mass, p.friction_coefficient, p.applied_force, p.force_duration
    )?;
    Ok(())
}

fn write_prediction_rows<W: Write>(out: &mut W, r: &Prediction) -> Result<()> {
    let rows = [
        ("friction force", r.friction_force, "N"),
        ("net force", r.force_net, "N"),
        ("acceleration", r.force_acceleration, "m/s²"),
        ("cutoff velocity", r.cutoff_velocity, "m/s"),
        ("force distance", r.force_distance, "m"),
        ("deceleration", r.deceleration, "m/s²"),
        ("friction time", r.friction_time, "s"),
        ("friction distance", r.friction_distance, "m"),
        ("total distance", r.total_distance, "m"),
        ("total time", r.total_time, "s"),
    ];
    for (label, value, unit) in rows {
        writeln!(out, "{label:<18} {value:>10.3} {unit}")?;
    }
    Ok(())
}

fn write_frame_row<W: Write>(out: &mut W, frame: &Frame) -> Result<()> {
    let s = &frame.snapshot.state;
    writeln!(
        out,
        "{:>6} {:>9.3} {:>8.3} {:>9.3} {:>9.3} {:>9.3} {:>8.3}  {}",
        frame.index,
        frame.wall,
        s.time,
        s.position,
        s.velocity,
        s.acceleration,
        s.net_force,
        s.phase
    )?;
    Ok(())
}

fn write_marker<W: Write>(out: &mut W, label: &str, marker: Option<Marker>) -> Result<()> {
    match marker {
        Some(m) => writeln!(
            out,
            "  {label:<10} x = {:.3} m   t = {:.3} s   v = {:.3} m/s",
            m.position, m.time, m.velocity
        )?,
        None => writeln!(out, "  {label:<10} not reached")?,
    }
    Ok(())
}

fn write_report_table<W: Write>(out: &mut W, report: &SessionReport) -> Result<()> {
    write_parameters(out, &report.parameters)?;
    writeln!(out)?;
    writeln!(
        out,
        "{:>6} {:>9} {:>8} {:>9} {:>9} {:>9} {:>8}  phase",
        "frame", "wall (s)", "t (s)", "x (m)", "v (m/s)", "a (m/s²)", "ΣF (N)"
    )?;
    for frame in &report.frames {
        write_frame_row(out, frame)?;
    }

    writeln!(out)?;
    writeln!(out, "markers")?;
    write_marker(out, "start", Some(report.markers.start))?;
    write_marker(out, "force off", report.markers.force_off())?;
    write_marker(out, "stop", report.markers.stop())?;

    writeln!(out)?;
    writeln!(
        out,
        "s1 = {:.3} m   s2 = {:.3} m   track = {:.3} m",
        report.displacements.force, report.displacements.friction, report.track_extent
    )?;

    let view = &report.view;
    let series: Series = view.series;
    writeln!(
        out,
        "{}: axis {:.3} .. {:.3}, time axis 0 .. {:.3} s",
        series.label(),
        view.y_min,
        view.y_max,
        view.t_max
    )?;
    if let Some(peak) = report.peak {
        writeln!(
            out,
            "peak {} = {:.3} {} at t = {:.3} s",
            series.key(),
            series.value(&peak),
            series.unit(),
            peak.time
        )?;
    }

    let status = if report.motion.has_ceased() {
        "came to rest"
    } else {
        "still moving at wall-time limit"
    };
    writeln!(out, "{status} after {:.3} s of wall time", report.wall_time)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::session::Session;
    use traction::predict;

    fn render_prediction(format: OutputFormat) -> String {
        let parameters = Parameters::default();
        let report = PredictionReport {
            parameters,
            prediction: predict(&parameters),
        };
        let mut buf = Vec::new();
        write_prediction(&mut buf, &report, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn render_report(format: OutputFormat, series: Series) -> String {
        let report = Session::new(&Config::default()).unwrap().run(series);
        let mut buf = Vec::new();
        write_report(&mut buf, &report, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_prediction_table() {
        let text = render_prediction(OutputFormat::Table);
        assert!(text.contains("m = 2.000 kg"));
        assert!(text.contains("total distance"));
        assert!(text.contains("3.750 m"));
        assert!(text.contains("2.500 s"));
    }

    #[test]
    fn test_prediction_csv_has_header_and_row() {
        let text = render_prediction(OutputFormat::Csv);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(',').count(), lines[1].split(',').count());
        assert!(lines[0].starts_with("mass,friction_coefficient,applied_force"));
        assert!(lines[0].ends_with(",total_distance,total_time"));
        assert!(lines[1].ends_with(",3.75,2.5"));
    }

    #[test]
    fn test_report_csv_parses_back() {
        let report = Session::new(&Config::default()).unwrap().run(Series::Velocity);
        let mut buf = Vec::new();
        write_report(&mut buf, &report, OutputFormat::Csv).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let headers = reader.headers().unwrap().clone();
        let phase_col = headers.iter().position(|h| h == "phase").unwrap();
        let position_col = headers.iter().position(|h| h == "position").unwrap();

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), report.frames.len());
        assert_eq!(&records[0][phase_col], "force");
        let last = records.last().unwrap();
        assert_eq!(&last[phase_col], "stopped");
        let x: f64 = last[position_col].parse().unwrap();
        assert!((x - 3.75).abs() < 1e-9);
    }

    #[test]
    fn test_prediction_json() {
        let text = render_prediction(OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["parameters"]["mass"], 2.0);
        assert_eq!(value["prediction"]["total_distance"], 3.75);
    }

    #[test]
    fn test_report_table_lists_markers() {
        let text = render_report(OutputFormat::Table, Series::Velocity);
        assert!(text.contains("force off  x = 1.500 m   t = 1.000 s   v = 3.000 m/s"));
        assert!(text.contains("stop       x = 3.750 m"));
        assert!(text.contains("s1 = 1.500 m   s2 = 2.250 m   track = 8.000 m"));
        assert!(text.contains("peak v = 3.000 m/s at t = 1.000 s"));
        assert!(text.contains("came to rest"));
    }

    #[test]
    fn test_report_csv_rows_match_frames() {
        let report = Session::new(&Config::default()).unwrap().run(Series::Velocity);
        let mut buf = Vec::new();
        write_report(&mut buf, &report, OutputFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("frame,wall,time,position,velocity,acceleration,net_force,phase")
        );
        assert_eq!(lines.count(), report.frames.len());
        assert!(text.trim_end().ends_with(",stopped"));
    }

    #[test]
    fn test_report_json_round_trips_markers() {
        let text = render_report(OutputFormat::Json, Series::Acceleration);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["motion"], "ceased");
        assert_eq!(value["view"]["series"], "acceleration");
        assert_eq!(value["markers"]["force_off"]["time"], 1.0);
        let stop_time = value["markers"]["stop"]["time"].as_f64().unwrap();
        assert!((stop_time - 2.5).abs() < 1e-9);
    }
}
