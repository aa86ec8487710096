use super::{DisplaySurface, Field, Panel, Section, StatusColor};
use console::Style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

const SPINNER_TICK: Duration = Duration::from_millis(120);

/// Terminal rendering of the dashboard on top of an indicatif [`MultiProgress`].
///
/// Text fields are drawn as one multi-line block that is redrawn in place on
/// every render. Errors are printed above the live area so they scroll away.
pub struct ConsoleSurface {
    multi: Option<Arc<MultiProgress>>,
    spinner: Option<ProgressBar>,
    details: ProgressBar,
    fields: BTreeMap<Field, String>,
    status_color: StatusColor,
}

impl ConsoleSurface {
    pub fn new(multi: Option<Arc<MultiProgress>>) -> Self {
        let details = ProgressBar::hidden();
        let details = match &multi {
            Some(multi) => multi.add(details),
            None => details,
        };
        details.set_style(ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));

        Self {
            multi,
            spinner: None,
            details,
            fields: BTreeMap::new(),
            status_color: StatusColor::Default,
        }
    }

    fn println(&self, line: &str) {
        match &self.multi {
            Some(multi) => {
                if let Err(e) = multi.println(line) {
                    log::debug!("Failed to print to terminal: {}", e);
                }
            }
            None => println!("{}", line),
        }
    }

    fn status_text(&self) -> String {
        let status = self
            .fields
            .get(&Field::CurrentStatus)
            .map(String::as_str)
            .unwrap_or("Unknown");
        status_style(self.status_color).apply_to(status).to_string()
    }

    fn block(&self) -> String {
        let mut out = String::new();
        let mut section = None;
        for (field, value) in &self.fields {
            match field {
                Field::DurationCaption => continue,
                Field::CurrentStatus => {
                    out.push_str(&format!("{}: {}\n", field.label(), self.status_text()));
                    continue;
                }
                _ => {}
            }
            if section != Some(field.section()) {
                section = Some(field.section());
                if field.section() != Section::General {
                    out.push_str(&format!("\n{}\n", field.section().title()));
                }
            }
            let label = match field {
                Field::Duration => self
                    .fields
                    .get(&Field::DurationCaption)
                    .map(|caption| caption.trim_end_matches(':').to_string())
                    .unwrap_or_else(|| field.label().to_string()),
                _ => field.label().to_string(),
            };
            out.push_str(&format!("  {:<36}{}\n", label, value));
        }
        out.trim_end().to_string()
    }
}

/// Colours are dropped automatically when the output is not a terminal.
fn status_style(color: StatusColor) -> Style {
    match color {
        StatusColor::Green => Style::new().green(),
        StatusColor::Red => Style::new().red(),
        StatusColor::Default => Style::new(),
    }
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DisplaySurface for ConsoleSurface {
    fn set_text(&mut self, field: Field, text: String) {
        self.fields.insert(field, text);
    }

    fn set_color(&mut self, field: Field, color: StatusColor) {
        if field == Field::CurrentStatus {
            self.status_color = color;
        }
    }

    fn show_error(&mut self, message: &str) {
        self.println(&format!("❌ {}", message));
    }

    fn present(&mut self) {
        let block = self.block();
        if self.multi.is_some() {
            self.details.set_message(block);
            self.details.tick();
        } else {
            println!("{}\n", block);
        }
    }

    fn start_spinner(&mut self) {
        if self.spinner.is_some() {
            return;
        }
        let pb = ProgressBar::new_spinner();
        let pb = match &self.multi {
            Some(multi) => multi.insert(0, pb),
            None => pb,
        };
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
            pb.set_style(style);
        }
        pb.set_message("Import in progress");
        pb.enable_steady_tick(SPINNER_TICK);
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn toggle_panels(&mut self, _hide: Panel, show: Panel) {
        if show == Panel::Completed {
            self.details.finish();
            self.println("✅ Import completed");
        }
    }
}
