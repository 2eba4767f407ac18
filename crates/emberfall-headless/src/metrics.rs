use std::fs::File;
use std::path::Path;
use std::time::Duration;

use csv::Writer;
use emberfall_core::FrameReport;

/// Per-frame CSV metrics
pub struct MetricsWriter {
    csv_writer: Writer<File>,
    frame_count: u32,
    fx_frames: u32,
}

impl MetricsWriter {
    pub fn new(output_dir: &Path) -> Result<Self, anyhow::Error> {
        let csv_path = output_dir.join("metrics.csv");
        let file = File::create(&csv_path)?;

        let mut csv_writer = Writer::from_writer(file);
        csv_writer.write_record([
            "frame",
            "timestamp_ms",
            "delta_ms",
            "diamonds",
            "embers",
            "fx_active",
            "fx_rendered",
            "wall_time_us",
        ])?;

        Ok(Self {
            csv_writer,
            frame_count: 0,
            fx_frames: 0,
        })
    }

    /// Write one row for a completed frame
    pub fn write_frame(
        &mut self,
        frame: u32,
        timestamp_ms: f64,
        report: &FrameReport,
        frame_time: Duration,
    ) -> Result<(), anyhow::Error> {
        self.csv_writer.write_record([
            frame.to_string(),
            format!("{:.3}", timestamp_ms),
            format!("{:.3}", report.delta_ms),
            report.diamonds.to_string(),
            report.embers.to_string(),
            (report.fx_active as u8).to_string(),
            (report.fx_rendered as u8).to_string(),
            frame_time.as_micros().to_string(),
        ])?;

        self.frame_count += 1;
        if report.fx_rendered {
            self.fx_frames += 1;
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<(u32, u32), anyhow::Error> {
        self.csv_writer.flush()?;
        Ok((self.frame_count, self.fx_frames))
    }
}
