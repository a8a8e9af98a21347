//! Patient data input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::ops::RangeInclusive;
use zeroize::Zeroize;

use crate::domain::{ranges, Gender, PatientRecord};
use crate::tui::styles::MedicalTheme;

/// Longest numeric entry accepted by a text field.
const MAX_INPUT_LEN: usize = 6;

/// Form field identifiers, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Age,
    Gender,
    Height,
    Weight,
    SystolicBp,
    DiastolicBp,
    Cholesterol,
    Glucose,
    Smoking,
    Alcohol,
    PhysicalActivity,
    FamilyHistory,
}

/// Current content of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Whole number entry
    Integer(String),
    /// Entry that accepts one decimal point
    Decimal(String),
    Choice(Gender),
    Flag(bool),
}

/// Form field definition. Fields are stored in `FieldId` order.
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: FieldValue,
    pub min: f64,
    pub max: f64,
}

impl FormField {
    fn integer(
        label: &'static str,
        hint: &'static str,
        value: i32,
        range: RangeInclusive<i32>,
    ) -> Self {
        Self {
            label,
            hint,
            value: FieldValue::Integer(value.to_string()),
            min: f64::from(*range.start()),
            max: f64::from(*range.end()),
        }
    }

    fn decimal(
        label: &'static str,
        hint: &'static str,
        value: f64,
        range: RangeInclusive<f64>,
    ) -> Self {
        Self {
            label,
            hint,
            value: FieldValue::Decimal(value.to_string()),
            min: *range.start(),
            max: *range.end(),
        }
    }

    fn flag(label: &'static str, hint: &'static str, value: bool) -> Self {
        Self {
            label,
            hint,
            value: FieldValue::Flag(value),
            min: 0.0,
            max: 1.0,
        }
    }

    /// Parse a numeric entry and check it against the field range.
    fn number(&self) -> Result<f64, String> {
        let text = match &self.value {
            FieldValue::Integer(text) | FieldValue::Decimal(text) => text,
            _ => return Err(format!("{}: Not a numeric field", self.label)),
        };

        let value: f64 = text
            .parse()
            .map_err(|_| format!("{}: Invalid number", self.label))?;

        if !value.is_finite() || value < self.min || value > self.max {
            return Err(format!(
                "{}: Value must be between {} and {}",
                self.label, self.min, self.max
            ));
        }
        Ok(value)
    }
}

/// Patient form state
pub struct PatientFormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for PatientFormState {
    fn default() -> Self {
        Self::from_record(&PatientRecord::default())
    }
}

impl Drop for PatientFormState {
    fn drop(&mut self) {
        self.clear_sensitive();
    }
}

impl PatientFormState {
    /// Build a form pre-filled with `record`.
    #[must_use]
    pub fn from_record(record: &PatientRecord) -> Self {
        Self {
            fields: vec![
                FormField::integer("Age", "years (18-100)", record.age, ranges::AGE),
                FormField {
                    label: "Gender",
                    hint: "[Space] toggle",
                    value: FieldValue::Choice(record.gender),
                    min: 0.0,
                    max: 1.0,
                },
                FormField::decimal("Height", "cm (100-250)", record.height, ranges::HEIGHT),
                FormField::decimal("Weight", "kg (30-200)", record.weight, ranges::WEIGHT),
                FormField::integer(
                    "Systolic BP",
                    "mmHg (80-250)",
                    record.systolic_bp,
                    ranges::SYSTOLIC_BP,
                ),
                FormField::integer(
                    "Diastolic BP",
                    "mmHg (40-150)",
                    record.diastolic_bp,
                    ranges::DIASTOLIC_BP,
                ),
                FormField::integer(
                    "Cholesterol",
                    "mg/dL (100-400)",
                    record.cholesterol,
                    ranges::CHOLESTEROL,
                ),
                FormField::integer("Glucose", "mg/dL (60-300)", record.glucose, ranges::GLUCOSE),
                FormField::flag("Current smoker", "[Space] toggle", record.smoking),
                FormField::flag("Regular alcohol", "[Space] toggle", record.alcohol),
                FormField::flag("Physical activity", "[Space] toggle", record.physical_activity),
                FormField::flag("Family history of CVD", "[Space] toggle", record.family_history),
            ],
            selected_field: 0,
            error_message: None,
        }
    }

    fn field(&self, id: FieldId) -> &FormField {
        &self.fields[id as usize]
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        let accepted = match &mut field.value {
            FieldValue::Integer(text) if c.is_ascii_digit() && text.len() < MAX_INPUT_LEN => {
                text.push(c);
                true
            }
            FieldValue::Decimal(text)
                if text.len() < MAX_INPUT_LEN
                    && (c.is_ascii_digit() || (c == '.' && !text.contains('.'))) =>
            {
                text.push(c);
                true
            }
            _ => false,
        };
        if accepted {
            self.error_message = None;
        }
    }

    /// Toggle the current choice or flag field
    pub fn toggle(&mut self) {
        match &mut self.fields[self.selected_field].value {
            FieldValue::Choice(gender) => *gender = gender.toggled(),
            FieldValue::Flag(flag) => *flag = !*flag,
            _ => return,
        }
        self.error_message = None;
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        if let FieldValue::Integer(text) | FieldValue::Decimal(text) =
            &mut self.fields[self.selected_field].value
        {
            text.pop();
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        if let FieldValue::Integer(text) | FieldValue::Decimal(text) =
            &mut self.fields[self.selected_field].value
        {
            text.zeroize();
        }
    }

    /// Wipe all text buffers from memory.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            if let FieldValue::Integer(text) | FieldValue::Decimal(text) = &mut field.value {
                text.zeroize();
            }
        }
        self.error_message = None;
        self.selected_field = 0;
    }

    /// Replace every field with `record`'s values, keeping the selection.
    pub fn load_record(&mut self, record: &PatientRecord) {
        let selected = self.selected_field;
        self.clear_sensitive();
        let fresh = Self::from_record(record);
        self.fields.clone_from(&fresh.fields);
        self.selected_field = selected;
    }

    /// Restore the default values
    pub fn reset(&mut self) {
        self.load_record(&PatientRecord::default());
    }

    /// Load sample data for testing (high-risk patient)
    pub fn load_sample_data(&mut self) {
        // 62yo male smoker, hypertensive, high cholesterol, prediabetic, obese, sedentary
        self.load_record(&PatientRecord {
            age: 62,
            gender: Gender::Male,
            height: 175.0,
            weight: 95.0,
            systolic_bp: 148,
            diastolic_bp: 94,
            cholesterol: 245,
            glucose: 110,
            smoking: true,
            alcohol: true,
            physical_activity: false,
            family_history: true,
        });
    }

    /// BMI from the current height and weight entries, if both parse.
    #[must_use]
    pub fn live_bmi(&self) -> Option<f64> {
        let height = self.field(FieldId::Height).number().ok()?;
        let weight = self.field(FieldId::Weight).number().ok()?;
        let meters = height / 100.0;
        Some(weight / (meters * meters))
    }

    fn integer(&self, id: FieldId) -> Result<i32, String> {
        // integer fields only hold digits and are range-checked
        self.field(id).number().map(|v| v as i32)
    }

    fn flag(&self, id: FieldId) -> bool {
        matches!(self.field(id).value, FieldValue::Flag(true))
    }

    /// Validate and convert to a PatientRecord
    pub fn to_patient_record(&self) -> Result<PatientRecord, String> {
        let gender = match self.field(FieldId::Gender).value {
            FieldValue::Choice(gender) => gender,
            _ => Gender::default(),
        };

        Ok(PatientRecord {
            age: self.integer(FieldId::Age)?,
            gender,
            height: self.field(FieldId::Height).number()?,
            weight: self.field(FieldId::Weight).number()?,
            systolic_bp: self.integer(FieldId::SystolicBp)?,
            diastolic_bp: self.integer(FieldId::DiastolicBp)?,
            cholesterol: self.integer(FieldId::Cholesterol)?,
            glucose: self.integer(FieldId::Glucose)?,
            smoking: self.flag(FieldId::Smoking),
            alcohol: self.flag(FieldId::Alcohol),
            physical_activity: self.flag(FieldId::PhysicalActivity),
            family_history: self.flag(FieldId::FamilyHistory),
        })
    }
}

/// Render the patient data input form
pub fn render_patient_form(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0], state);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let bmi = match state.live_bmi() {
        Some(bmi) => format!("{bmi:.1}"),
        None => "--".to_string(),
    };

    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Patient Information", MedicalTheme::title()),
        Span::styled(" │ BMI ", MedicalTheme::text_secondary()),
        Span::styled(bmi, MedicalTheme::focused()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
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

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.value {
            FieldValue::Integer(text) | FieldValue::Decimal(text) => {
                if text.is_empty() {
                    spans.push(Span::styled(field.hint, MedicalTheme::text_muted()));
                } else {
                    spans.push(Span::styled(text.as_str(), MedicalTheme::text()));
                    spans.push(Span::styled(format!("  {}", field.hint), MedicalTheme::text_muted()));
                }
                if is_selected {
                    spans.insert(2, Span::styled("▌", MedicalTheme::cursor()));
                }
            }
            FieldValue::Choice(gender) => {
                spans.push(Span::styled(format!("‹ {gender} ›"), MedicalTheme::text()));
            }
            FieldValue::Flag(on) => {
                let (mark, style) = if *on {
                    ("[x] Yes", MedicalTheme::text())
                } else {
                    ("[ ] No", MedicalTheme::text_secondary())
                };
                spans.push(Span::styled(mark, style));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &PatientFormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[Space] ", MedicalTheme::key_hint()),
            Span::styled("Toggle ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Calculate ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select(state: &mut PatientFormState, id: FieldId) {
        state.selected_field = id as usize;
    }

    #[test]
    fn test_defaults_round_trip_to_record() {
        let state = PatientFormState::default();
        let record = state.to_patient_record().expect("Defaults should parse");
        assert_eq!(record, PatientRecord::default());
    }

    #[test]
    fn test_field_lookup_follows_id_order() {
        let state = PatientFormState::default();
        assert_eq!(state.fields.len(), FieldId::FamilyHistory as usize + 1);
        assert_eq!(state.field(FieldId::Age).label, "Age");
        assert_eq!(state.field(FieldId::Gender).label, "Gender");
        assert_eq!(state.field(FieldId::SystolicBp).label, "Systolic BP");
        assert_eq!(state.field(FieldId::Glucose).label, "Glucose");
        assert_eq!(state.field(FieldId::FamilyHistory).label, "Family history of CVD");
    }

    #[test]
    fn test_integer_input_rejects_non_digits() {
        let mut state = PatientFormState::default();
        select(&mut state, FieldId::Age);
        state.clear_field();
        for c in "5x.2".chars() {
            state.input_char(c);
        }
        assert_eq!(state.fields[0].value, FieldValue::Integer("52".into()));
    }

    #[test]
    fn test_decimal_input_accepts_single_point() {
        let mut state = PatientFormState::default();
        select(&mut state, FieldId::Weight);
        state.clear_field();
        for c in "72.5.1".chars() {
            state.input_char(c);
        }
        assert_eq!(
            state.field(FieldId::Weight).value,
            FieldValue::Decimal("72.51".into())
        );
    }

    #[test]
    fn test_toggle_choice_and_flag() {
        let mut state = PatientFormState::default();
        select(&mut state, FieldId::Gender);
        state.toggle();
        select(&mut state, FieldId::Smoking);
        state.toggle();

        let record = state.to_patient_record().expect("Should parse");
        assert_eq!(record.gender, Gender::Female);
        assert!(record.smoking);
    }

    #[test]
    fn test_out_of_range_is_reported() {
        let mut state = PatientFormState::default();
        select(&mut state, FieldId::Glucose);
        state.clear_field();
        for c in "999".chars() {
            state.input_char(c);
        }
        let err = state.to_patient_record().expect_err("Should reject");
        assert!(err.starts_with("Glucose"));
    }

    #[test]
    fn test_empty_field_is_invalid() {
        let mut state = PatientFormState::default();
        select(&mut state, FieldId::Height);
        state.clear_field();
        assert!(state.to_patient_record().is_err());
        assert!(state.live_bmi().is_none());
    }

    #[test]
    fn test_live_bmi() {
        let state = PatientFormState::default();
        let bmi = state.live_bmi().expect("Should compute");
        assert!((bmi - 24.22).abs() < 0.01);
    }

    #[test]
    fn test_sample_and_reset() {
        let mut state = PatientFormState::default();
        state.load_sample_data();
        let sample = state.to_patient_record().expect("Sample should parse");
        assert!(sample.smoking);
        assert_eq!(sample.systolic_bp, 148);

        state.reset();
        assert_eq!(
            state.to_patient_record().expect("Should parse"),
            PatientRecord::default()
        );
    }

    #[test]
    fn test_navigation_wraps() {
        let mut state = PatientFormState::default();
        state.prev_field();
        assert_eq!(state.selected_field, state.fields.len() - 1);
        state.next_field();
        assert_eq!(state.selected_field, 0);
    }
}
