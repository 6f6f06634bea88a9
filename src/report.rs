use std::fmt;

use crate::stats::{StatsError, Summary, BUCKET_LABELS};

/// One engine's statistics laid out for the console.
pub struct Report<'a> {
    pub title: &'a str,
    pub summary: &'a Result<Summary, StatsError>,
    pub total: usize,
}

pub fn render(title: &str, summary: &Result<Summary, StatsError>, total: usize) -> String {
    Report { title, summary, total }.to_string()
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "{}", self.title)?;
        let s = match self.summary {
            Ok(s) => s,
            Err(err) => {
                writeln!(out, "Requests processed: 0 of {}", self.total)?;
                return writeln!(out, "No data: {}", err);
            }
        };

        writeln!(out, "Requests processed: {} of {}", s.processed, s.total)?;
        writeln!(out, "Min request time (ms): {:.6}", s.min)?;
        writeln!(out, "Max request time (ms): {:.6}", s.max)?;
        writeln!(out, "Mean request time (ms): {:.6}", s.mean)?;
        writeln!(out, "Std deviation of request time (ms): {:.6}", s.std_dev)?;
        writeln!(out, "Max queue length: {}", s.max_queue_len)?;
        writeln!(out, "Idle time (ms): {:.6}", s.idle_time)?;
        writeln!(out, "Utilization: {:.4}", s.utilization)?;
        writeln!(out, "Head movement (tracks): {}", s.head_movement)?;

        writeln!(out, "Service time histogram:")?;
        for label in BUCKET_LABELS {
            write!(out, "|>{:5}ms", label)?;
        }
        writeln!(out)?;
        for count in s.histogram.counts {
            write!(out, "|{:<8}", count)?;
        }
        writeln!(out)
    }
}
