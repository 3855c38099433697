//! Patient data entry form: state manager and rendering.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{FieldErrors, FieldId, FieldKind, PatientInput};
use crate::tui::styles::ClinicTheme;

/// Form state: raw field values, per-field validation errors, cursor.
///
/// Purely in-memory; mutation of a field eagerly clears that field's
/// recorded error without revalidating the others.
pub struct FormState {
    pub input: PatientInput,
    pub errors: FieldErrors,
    pub selected: usize,
    /// Transient status line (e.g. submission already in flight).
    pub notice: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            input: PatientInput::default(),
            errors: FieldErrors::default(),
            selected: 0,
            notice: None,
        }
    }
}

impl FormState {
    /// Field under the cursor.
    #[must_use]
    pub fn current_field(&self) -> FieldId {
        FieldId::ALL[self.selected]
    }

    pub fn next_field(&mut self) {
        self.selected = (self.selected + 1) % FieldId::ALL.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected == 0 {
            self.selected = FieldId::ALL.len() - 1;
        } else {
            self.selected -= 1;
        }
    }

    /// Store a raw value for a field, clearing only that field's error.
    pub fn set_field(&mut self, field: FieldId, raw: impl Into<String>) {
        self.input.set(field, raw);
        self.errors.clear(field);
        self.notice = None;
    }

    /// Append a character to the current field (numeric fields only;
    /// choice fields are edited by cycling).
    pub fn input_char(&mut self, c: char) {
        let field = self.current_field();
        let allowed = match field.kind() {
            FieldKind::Int { .. } => c.is_ascii_digit() || c == '-',
            FieldKind::Decimal { .. } => c.is_ascii_digit() || c == '.' || c == '-',
            FieldKind::Choice { .. } => false,
        };
        if allowed {
            self.input.value_mut(field).push(c);
            self.errors.clear(field);
            self.notice = None;
        }
    }

    /// Delete the last character of the current field.
    pub fn delete_char(&mut self) {
        let field = self.current_field();
        if self.input.value_mut(field).pop().is_some() {
            self.errors.clear(field);
            self.notice = None;
        }
    }

    /// Clear the current field back to empty (numeric) or its first code.
    pub fn clear_field(&mut self) {
        let field = self.current_field();
        match field.kind() {
            FieldKind::Choice { codes } => self.set_field(field, codes[0]),
            _ => self.set_field(field, ""),
        }
    }

    /// Cycle a choice field forward or backward through its codes.
    pub fn cycle_choice(&mut self, forward: bool) {
        let field = self.current_field();
        let FieldKind::Choice { codes } = field.kind() else {
            return;
        };
        let current = codes
            .iter()
            .position(|&c| c == self.input.get(field))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % codes.len()
        } else {
            (current + codes.len() - 1) % codes.len()
        };
        self.set_field(field, codes[next]);
    }

    /// Restore the exact initial defaults and drop all error state.
    pub fn reset(&mut self) {
        self.input = PatientInput::default();
        self.errors = FieldErrors::default();
        self.selected = 0;
        self.notice = None;
    }

    /// Wipe field buffers and return to defaults.
    ///
    /// Called once a submission starts so raw patient values do not linger
    /// in UI state.
    pub fn clear_sensitive(&mut self) {
        for field in FieldId::ALL {
            self.input.value_mut(field).zeroize();
        }
        self.reset();
    }

    /// Fill the form with a plausible screening example.
    pub fn load_sample(&mut self) {
        let sample: [(FieldId, &str); 13] = [
            (FieldId::Age, "57"),
            (FieldId::Sex, "1"),
            (FieldId::Cp, "2"),
            (FieldId::Trestbps, "130"),
            (FieldId::Chol, "236"),
            (FieldId::Fbs, "0"),
            (FieldId::Restecg, "1"),
            (FieldId::Thalach, "174"),
            (FieldId::Exang, "0"),
            (FieldId::Oldpeak, "1.4"),
            (FieldId::Slope, "1"),
            (FieldId::Ca, "0"),
            (FieldId::Thal, "2"),
        ];
        for (field, value) in sample {
            self.set_field(field, value);
        }
    }
}

/// Render the patient data entry form.
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Fields
            Constraint::Length(3), // Footer / errors
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_fields(f, chunks[1], state);
    render_footer(f, chunks[2], state);
}

fn render_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", ClinicTheme::text()),
        Span::styled("Patient Data Entry", ClinicTheme::title()),
        Span::styled(" │ Heart Disease Risk Factors", ClinicTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (FieldId::ALL.len() + 1) / 2;

    render_field_column(f, columns[0], &FieldId::ALL[..mid], 0, state);
    render_field_column(f, columns[1], &FieldId::ALL[mid..], mid, state);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FieldId],
    offset: usize,
    state: &FormState,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, &field) in fields.iter().enumerate() {
        let is_selected = offset + i == state.selected;
        let error = state.errors.get(field);

        let border_style = if error.is_some() {
            ClinicTheme::danger()
        } else if is_selected {
            ClinicTheme::border_focused()
        } else {
            ClinicTheme::border()
        };
        let title_style = if is_selected {
            ClinicTheme::focused()
        } else {
            ClinicTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        // Inline error takes the value row; otherwise value or hint.
        let value = state.input.get(field);
        let content_span = if let Some(msg) = error {
            Span::styled(msg.to_string(), ClinicTheme::danger())
        } else if value.is_empty() {
            Span::styled(field.hint(), ClinicTheme::text_muted())
        } else {
            Span::styled(value.to_string(), ClinicTheme::text())
        };

        let cursor = if is_selected && error.is_none() {
            Span::styled("▌", ClinicTheme::cursor())
        } else {
            Span::raw("")
        };

        let content =
            Paragraph::new(Line::from(vec![Span::raw(" "), content_span, cursor])).block(block);
        f.render_widget(content, chunks[i]);
    }
}

fn render_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(notice) = &state.notice {
        Line::from(vec![
            Span::styled("! ", ClinicTheme::danger()),
            Span::styled(notice.clone(), ClinicTheme::danger()),
        ])
    } else if !state.errors.is_empty() {
        let first = state
            .errors
            .iter()
            .next()
            .map(|(_, msg)| msg.to_string())
            .unwrap_or_default();
        Line::from(vec![
            Span::styled(
                format!("! {} field(s) need attention: ", state.errors.len()),
                ClinicTheme::danger(),
            ),
            Span::styled(first, ClinicTheme::text_secondary()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", ClinicTheme::key_hint()),
            Span::styled("Navigate ", ClinicTheme::key_desc()),
            Span::styled("[←→] ", ClinicTheme::key_hint()),
            Span::styled("Choice ", ClinicTheme::key_desc()),
            Span::styled("[Enter] ", ClinicTheme::key_hint()),
            Span::styled("Submit ", ClinicTheme::key_desc()),
            Span::styled("[S] ", ClinicTheme::key_hint()),
            Span::styled("Sample ", ClinicTheme::key_desc()),
            Span::styled("[R] ", ClinicTheme::key_hint()),
            Span::styled("Reset ", ClinicTheme::key_desc()),
            Span::styled("[Esc] ", ClinicTheme::key_hint()),
            Span::styled("Back", ClinicTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(ClinicTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_a_field_clears_only_its_own_error() {
        let mut form = FormState::default();
        form.errors.record(FieldId::Age, "bad age".into());
        form.errors.record(FieldId::Chol, "bad chol".into());

        form.set_field(FieldId::Age, "44");

        assert!(form.errors.get(FieldId::Age).is_none());
        assert_eq!(form.errors.get(FieldId::Chol), Some("bad chol"));
    }

    #[test]
    fn typing_into_selected_field_clears_its_error() {
        let mut form = FormState::default();
        form.selected = FieldId::Age as usize;
        form.errors.record(FieldId::Age, "bad age".into());
        form.errors.record(FieldId::Thalach, "bad rate".into());

        form.input_char('4');

        assert_eq!(form.input.get(FieldId::Age), "4");
        assert!(form.errors.get(FieldId::Age).is_none());
        assert_eq!(form.errors.get(FieldId::Thalach), Some("bad rate"));
    }

    #[test]
    fn choice_fields_ignore_typed_characters() {
        let mut form = FormState::default();
        form.selected = FieldId::Sex as usize;
        form.input_char('7');
        assert_eq!(form.input.get(FieldId::Sex), "0");
    }

    #[test]
    fn cycle_choice_walks_codes_in_both_directions() {
        let mut form = FormState::default();
        form.selected = FieldId::Cp as usize;

        form.cycle_choice(true);
        assert_eq!(form.input.get(FieldId::Cp), "1");
        form.cycle_choice(true);
        form.cycle_choice(true);
        assert_eq!(form.input.get(FieldId::Cp), "3");
        form.cycle_choice(true);
        assert_eq!(form.input.get(FieldId::Cp), "0");
        form.cycle_choice(false);
        assert_eq!(form.input.get(FieldId::Cp), "3");
    }

    #[test]
    fn reset_restores_exact_initial_state() {
        let mut form = FormState::default();
        form.load_sample();
        form.errors.record(FieldId::Age, "stale".into());
        form.selected = 5;
        form.notice = Some("stale notice".into());

        form.reset();

        assert_eq!(form.input, PatientInput::default());
        assert!(form.errors.is_empty());
        assert_eq!(form.selected, 0);
        assert!(form.notice.is_none());
    }

    #[test]
    fn sample_data_validates_cleanly() {
        let mut form = FormState::default();
        form.load_sample();
        assert!(form.input.validate().is_ok());
    }

    #[test]
    fn clear_sensitive_leaves_defaults() {
        let mut form = FormState::default();
        form.load_sample();
        form.clear_sensitive();
        assert_eq!(form.input, PatientInput::default());
    }
}
