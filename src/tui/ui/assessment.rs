//! Risk assessment result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{RiskAssessment, RiskLevel};
use crate::tui::styles::MedicalTheme;

/// A finished assessment plus the comparison point score.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentView {
    pub assessment: RiskAssessment,
    /// Simplified point score, as a fraction
    pub comparison: f64,
}

/// Assessment screen state
#[derive(Debug, Clone, PartialEq)]
pub enum AssessmentState {
    /// Result computed, reveal pending
    Analyzing { progress: f64 },
    /// Result on display
    Complete(Box<AssessmentView>),
}

/// Render the assessment screen
pub fn render_assessment(f: &mut Frame, area: Rect, state: &AssessmentState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_assessment_header(f, chunks[0]);
    match state {
        AssessmentState::Analyzing { progress } => render_analyzing(f, chunks[1], *progress),
        AssessmentState::Complete(view) => render_result(f, chunks[1], view),
    }
    render_assessment_footer(f, chunks[2], state);
}

fn render_assessment_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Risk Assessment", MedicalTheme::title()),
        Span::styled(
            " │ Cardiovascular Disease Risk",
            MedicalTheme::text_secondary(),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_analyzing(f: &mut Frame, area: Rect, progress: f64) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .margin(2)
        .split(area);

    let stage = Paragraph::new(Line::from(Span::styled(
        "Analyzing patient data...",
        MedicalTheme::focused(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(stage, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(MedicalTheme::info())
        .ratio(progress.clamp(0.0, 1.0));
    f.render_widget(gauge, chunks[1]);

    let desc = Paragraph::new(Line::from(Span::styled(
        "Processing cardiovascular risk factors",
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center);
    f.render_widget(desc, chunks[2]);
}

fn render_result(f: &mut Frame, area: Rect, view: &AssessmentView) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // Score summary
            Constraint::Min(0),    // Factors and recommendations
        ])
        .split(area);

    render_summary(f, chunks[0], view);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);

    render_factors(f, columns[0], &view.assessment);
    render_recommendations(f, columns[1], &view.assessment);
}

fn render_summary(f: &mut Frame, area: Rect, view: &AssessmentView) {
    let assessment = &view.assessment;
    let risk_style = MedicalTheme::risk_level(assessment.risk_level);

    let block = Block::default()
        .title(Span::styled(
            " Cardiovascular Risk Assessment ",
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(risk_style);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Level
            Constraint::Length(1), // Gauge
            Constraint::Min(0),    // Comparison
        ])
        .margin(1)
        .split(inner);

    let risk_icon = match assessment.risk_level {
        RiskLevel::Low => "OK",
        RiskLevel::Moderate | RiskLevel::High => "!",
    };

    let level = Paragraph::new(vec![
        Line::from(vec![
            Span::styled(
                format!("{risk_icon} {} RISK ", assessment.risk_level),
                risk_style.add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}%", assessment.risk_percentage),
                MedicalTheme::title(),
            ),
        ]),
        Line::from(Span::styled(
            assessment.risk_level.description(),
            MedicalTheme::text_secondary(),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(level, chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(risk_style)
        .percent(u16::from(assessment.risk_percentage.min(100)))
        .label(format!("{}%", assessment.risk_percentage));
    f.render_widget(gauge, chunks[1]);

    let comparison = Paragraph::new(Line::from(vec![
        Span::styled("Point score (age, cholesterol, smoking): ", MedicalTheme::text_muted()),
        Span::styled(
            format!("{:.0}%", view.comparison * 100.0),
            MedicalTheme::text_secondary(),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(comparison, chunks[2]);
}

fn render_factors(f: &mut Frame, area: Rect, assessment: &RiskAssessment) {
    let block = Block::default()
        .title(Span::styled(" Risk Factor Analysis ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let lines: Vec<Line> = assessment
        .factors
        .iter()
        .flat_map(|factor| {
            [
                Line::from(vec![
                    Span::styled(
                        format!(" {} ", MedicalTheme::impact_marker(factor.impact)),
                        MedicalTheme::impact(factor.impact),
                    ),
                    Span::styled(factor.name.as_str(), MedicalTheme::text()),
                    Span::styled(format!("  {}", factor.value), MedicalTheme::focused()),
                ]),
                Line::from(Span::styled(
                    format!("   {}", factor.description),
                    MedicalTheme::text_muted(),
                )),
            ]
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_recommendations(f: &mut Frame, area: Rect, assessment: &RiskAssessment) {
    let block = Block::default()
        .title(Span::styled(
            " Clinical Recommendations ",
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let lines: Vec<Line> = assessment
        .recommendations
        .iter()
        .map(|text| {
            Line::from(vec![
                Span::styled(" • ", MedicalTheme::info()),
                Span::styled(text.as_str(), MedicalTheme::text()),
            ])
        })
        .collect();

    let p = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(p, area);
}

fn render_assessment_footer(f: &mut Frame, area: Rect, state: &AssessmentState) {
    let content = match state {
        AssessmentState::Complete(_) => Line::from(vec![
            Span::styled("[N] ", MedicalTheme::key_hint()),
            Span::styled("New Patient ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Edit Data ", MedicalTheme::key_desc()),
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ]),
        AssessmentState::Analyzing { .. } => Line::from(vec![
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Cancel", MedicalTheme::key_desc()),
        ]),
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
