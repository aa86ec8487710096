use super::{DisplaySurface, Field, Panel, StatusColor};
use std::collections::BTreeMap;

/// Keeps everything written to it, for one-shot output and inspection.
#[derive(Debug, Default)]
pub struct MemorySurface {
    fields: BTreeMap<Field, String>,
    colors: BTreeMap<Field, StatusColor>,
    errors: Vec<String>,
    renders: usize,
    spinner_running: bool,
    visible_panel: Option<Panel>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn color(&self, field: Field) -> StatusColor {
        self.colors.get(&field).copied().unwrap_or_default()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn last_error(&self) -> Option<&str> {
        self.errors.last().map(String::as_str)
    }

    /// Number of completed renders.
    pub fn render_count(&self) -> usize {
        self.renders
    }

    pub fn spinner_running(&self) -> bool {
        self.spinner_running
    }

    pub fn visible_panel(&self) -> Option<Panel> {
        self.visible_panel
    }

    /// `label: value` lines in field order.
    pub fn lines(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(field, _)| **field != Field::DurationCaption)
            .map(|(field, value)| match field {
                Field::Duration => format!(
                    "{} {}",
                    self.text(Field::DurationCaption).unwrap_or("Duration:"),
                    value
                ),
                _ => format!("{}: {}", field.label(), value),
            })
            .collect()
    }
}

impl DisplaySurface for MemorySurface {
    fn set_text(&mut self, field: Field, text: String) {
        self.fields.insert(field, text);
    }

    fn set_color(&mut self, field: Field, color: StatusColor) {
        self.colors.insert(field, color);
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn present(&mut self) {
        self.renders += 1;
    }

    fn start_spinner(&mut self) {
        self.spinner_running = true;
    }

    fn stop_spinner(&mut self) {
        self.spinner_running = false;
    }

    fn toggle_panels(&mut self, _hide: Panel, show: Panel) {
        self.visible_panel = Some(show);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_merge_duration_caption() {
        let mut surface = MemorySurface::new();
        surface.set_text(Field::CurrentStatus, "Running".into());
        surface.set_text(Field::DurationCaption, "Elapsed Time:".into());
        surface.set_text(Field::Duration, "0d 0h 0m 5s ".into());
        surface.present();

        assert_eq!(
            surface.lines(),
            vec![
                "Current status: Running".to_string(),
                "Elapsed Time: 0d 0h 0m 5s ".to_string(),
            ]
        );
        assert_eq!(surface.render_count(), 1);
    }

    #[test]
    fn tracks_errors_and_panels() {
        let mut surface = MemorySurface::new();
        surface.show_error("boom");
        surface.start_spinner();
        surface.toggle_panels(Panel::InProgress, Panel::Completed);
        assert_eq!(surface.last_error(), Some("boom"));
        assert!(surface.spinner_running());
        assert_eq!(surface.visible_panel(), Some(Panel::Completed));
        assert_eq!(surface.color(Field::CurrentStatus), StatusColor::Default);
    }
}
