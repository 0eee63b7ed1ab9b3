use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use medsub_cli::pipeline::BatchReport;
use medsub_cli::timing::millis;
use medsub_model::{
    CandidateStatus, RecommendationResult, ResolvedMedication, ScoredCandidate, Tone,
};

pub fn print_resolved(resolved: &ResolvedMedication) {
    let mut table = Table::new();
    apply_table_style(&mut table);
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    table.add_row(vec![Cell::new("Name"), name_cell(&resolved.name)]);
    table.add_row(vec![Cell::new("Local name"), Cell::new(&resolved.local_name)]);
    table.add_row(vec![Cell::new("Composition"), Cell::new(&resolved.composition)]);
    table.add_row(vec![
        Cell::new("Principal component"),
        text_cell(&resolved.principal_component),
    ]);
    table.add_row(vec![
        Cell::new("Therapeutic class"),
        optional_cell(resolved.therapeutic_class.as_deref()),
    ]);
    table.add_row(vec![
        Cell::new("Chemical class"),
        optional_cell(resolved.chemical_class.as_deref()),
    ]);
    table.add_row(vec![
        Cell::new("Review (excellent %)"),
        Cell::new(format!("{:.0}", resolved.review_excellent)),
    ]);
    table.add_row(vec![
        Cell::new("Matched by"),
        Cell::new(resolved.stage.label()).fg(Color::Cyan),
    ]);
    println!("{table}");
}

pub fn print_recommendation(result: &RecommendationResult, detailed: bool, side_effects: &str) {
    let current = &result.current;
    println!(
        "Current: {} ({}) - {}",
        current.name, current.local_name, current.composition
    );
    println!("Matched by: {}", current.stage);
    println!("Reason: {}", result.reason);

    let listed: Vec<&ScoredCandidate> = if detailed {
        result.substitutes.iter().collect()
    } else {
        result.valid.iter().collect()
    };
    if listed.is_empty() {
        println!("No valid direct substitute.");
    } else {
        println!();
        println!("Substitutes:");
        println!("{}", candidate_table(&listed, detailed));
    }
    if !detailed {
        let rejected = result.rejected().count();
        if rejected > 0 {
            println!("{rejected} substitute(s) rejected (use --detailed to list them).");
        }
    }

    if !result.alternatives.is_empty() {
        let alternatives: Vec<&ScoredCandidate> = result.alternatives.iter().collect();
        println!();
        println!("Therapeutic alternatives:");
        println!("{}", candidate_table(&alternatives, true));
    }

    println!();
    match result.best() {
        Some(best) => {
            println!(
                "Recommended: {} ({}, score {:.2})",
                best.candidate.display_name(),
                best.source.label(),
                best.candidate.score
            );
            println!("Why: {}", best.candidate.justification_text());
            println!("Side effects: {side_effects}");
        }
        None => println!("No options found."),
    }
}

fn candidate_table(candidates: &[&ScoredCandidate], with_origin: bool) -> Table {
    let mut table = Table::new();
    let mut header = vec![
        header_cell("#"),
        header_cell("Medication"),
        header_cell("Score"),
        header_cell("Status"),
    ];
    if with_origin {
        header.push(header_cell("Origin"));
    }
    header.push(header_cell("Justification"));
    table.set_header(header);
    apply_candidate_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for (rank, candidate) in candidates.iter().enumerate() {
        let mut row = vec![
            dim_cell(rank + 1),
            name_cell(candidate.display_name()),
            score_cell(candidate),
            status_cell(candidate.status()),
        ];
        if with_origin {
            row.push(Cell::new(candidate.origin.label()));
        }
        row.push(justification_cell(candidate));
        table.add_row(row);
    }
    table
}

pub fn print_batch(report: &BatchReport) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Medication"),
        header_cell("Diagnosis"),
        header_cell("Resolved"),
        header_cell("Recommendation"),
        header_cell("Score"),
        header_cell("Time (ms)"),
    ]);
    apply_candidate_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);
    for (idx, outcome) in report.outcomes.iter().enumerate() {
        let (recommendation, score) = match (&outcome.recommendation, &outcome.error) {
            (Some(best), _) => (
                name_cell(best.candidate.display_name()),
                Cell::new(format!("{:.2}", best.candidate.score)),
            ),
            (None, Some(error)) => (Cell::new(error).fg(Color::Red), dim_cell("-")),
            (None, None) => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            dim_cell(idx + 1),
            Cell::new(&outcome.medication),
            Cell::new(&outcome.diagnosis),
            optional_cell(outcome.resolved.as_deref()),
            recommendation,
            score,
            Cell::new(format!("{:.3}", millis(outcome.elapsed))),
        ]);
    }
    println!("{table}");
    println!(
        "Recommended: {}/{}",
        report.success_count(),
        report.outcomes.len()
    );
    if let Some(stats) = report.stats() {
        println!(
            "Response time over {} case(s): mean {:.3} ms, min {:.3} ms, max {:.3} ms",
            stats.count,
            millis(stats.mean),
            millis(stats.min),
            millis(stats.max)
        );
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_candidate_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 5 {
        let mut constraints = vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(4)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
        ];
        constraints.resize(
            table.column_count(),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        );
        table.set_constraints(constraints);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(status: CandidateStatus) -> Cell {
    match status {
        CandidateStatus::Valid => Cell::new("VALID")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        CandidateStatus::AllergyRejected => Cell::new("ALLERGY")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        CandidateStatus::DataMissing => dim_cell("NO DATA"),
    }
}

fn score_cell(candidate: &ScoredCandidate) -> Cell {
    let text = format!("{:.2}", candidate.score);
    match candidate.status() {
        CandidateStatus::Valid if candidate.score >= 7.0 => Cell::new(text)
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        CandidateStatus::Valid => Cell::new(text),
        CandidateStatus::AllergyRejected => Cell::new(text).fg(Color::Red),
        CandidateStatus::DataMissing => dim_cell(text),
    }
}

fn justification_cell(candidate: &ScoredCandidate) -> Cell {
    let text = candidate.justification_text();
    let cautions = candidate
        .justifications
        .iter()
        .filter(|justification| justification.tone() == Tone::Caution)
        .count();
    if cautions > 0 {
        Cell::new(text).fg(Color::Yellow)
    } else {
        Cell::new(text)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn name_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn text_cell(value: &str) -> Cell {
    if value.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(value)
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    text_cell(value.unwrap_or_default())
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
