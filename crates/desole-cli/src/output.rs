use desole_agent::TrackOutcome;
use serde_json::{json, Value};

/// Output format selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Renders command results
pub trait OutputFormatter {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
    fn info(&self, message: &str);
    fn print_json(&self, value: &Value);

    /// What happened to a report handed to the agent.
    fn outcome(&self, outcome: TrackOutcome, url: &str);

    /// Whether text matched the noise filter.
    fn noise_check(&self, text: &str, suppressed: bool);
}

/// Human-readable output with check marks
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn success(&self, message: &str) {
        println!("\u{2713} {message}");
    }
    fn error(&self, message: &str) {
        eprintln!("\u{2717} Error: {message}");
    }
    fn info(&self, message: &str) {
        println!("  {message}");
    }
    fn print_json(&self, _value: &Value) {}

    fn outcome(&self, outcome: TrackOutcome, url: &str) {
        match outcome {
            TrackOutcome::Sent => self.success(&format!("Report sent to {url}")),
            TrackOutcome::Filtered => {
                eprintln!("\u{26a0} Report matched a noise pattern and was not sent")
            }
            TrackOutcome::Dropped => self.error("Report could not be encoded"),
        }
    }

    fn noise_check(&self, _text: &str, suppressed: bool) {
        if suppressed {
            eprintln!("\u{26a0} Matches a noise pattern; reports with this text are not sent");
        } else {
            self.success("Not noise; reports with this text are sent");
        }
    }
}

/// One JSON document per command
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn success(&self, message: &str) {
        println!("{}", json!({"success": true, "message": message}));
    }
    fn error(&self, message: &str) {
        eprintln!("{}", json!({"success": false, "error": message}));
    }
    fn info(&self, _message: &str) {}
    fn print_json(&self, value: &Value) {
        println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
    }

    fn outcome(&self, outcome: TrackOutcome, url: &str) {
        self.print_json(&outcome_json(outcome, url));
    }

    fn noise_check(&self, text: &str, suppressed: bool) {
        self.print_json(&json!({"text": text, "suppressed": suppressed}));
    }
}

pub fn get_formatter(format: OutputFormat) -> Box<dyn OutputFormatter> {
    if format.is_json() {
        Box::new(JsonFormatter)
    } else {
        Box::new(HumanFormatter)
    }
}

fn outcome_json(outcome: TrackOutcome, url: &str) -> Value {
    let label = match outcome {
        TrackOutcome::Sent => "sent",
        TrackOutcome::Filtered => "filtered",
        TrackOutcome::Dropped => "dropped",
    };
    json!({"outcome": label, "url": url, "success": outcome == TrackOutcome::Sent})
}
