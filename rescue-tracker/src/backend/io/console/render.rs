//! Plain-text tables for the console

use shared::{AnimalDetails, AnimalKind, AnimalRecord};

use crate::backend::domain::QueuedAnimal;
use crate::backend::storage::schema::DATE_FORMAT;

const BASE_HEADERS: [&str; 8] = [
    "Gender",
    "Age",
    "Weight",
    "Acquired",
    "From",
    "Training",
    "Reserved",
    "In Service",
];

fn kind_headers(kind: AnimalKind) -> &'static [&'static str] {
    match kind {
        AnimalKind::Dog => &["Breed"],
        AnimalKind::Monkey => &["Species", "Tail", "Height", "Body"],
    }
}

fn record_cells(record: &AnimalRecord) -> Vec<String> {
    let mut cells = vec![
        record.id.map(|id| id.to_string()).unwrap_or_default(),
        record.name.clone(),
    ];

    match &record.details {
        AnimalDetails::Dog(dog) => cells.push(dog.breed.clone()),
        AnimalDetails::Monkey(monkey) => {
            cells.push(monkey.species.clone());
            cells.push(monkey.tail_length.to_string());
            cells.push(monkey.height.to_string());
            cells.push(monkey.body_length.to_string());
        }
    }

    cells.extend([
        record.gender.to_string(),
        record.age.to_string(),
        record.weight.to_string(),
        record.acquisition_date.format(DATE_FORMAT).to_string(),
        record.acquisition_country.clone(),
        record.training_status.to_string(),
        if record.reserved { "yes" } else { "no" }.to_string(),
        record.in_service_country.clone(),
    ]);
    cells
}

/// Render records of one kind as an aligned table with a header row
pub fn render_records(kind: AnimalKind, records: &[AnimalRecord]) -> String {
    let headers: Vec<&str> = ["ID", "Name"]
        .into_iter()
        .chain(kind_headers(kind).iter().copied())
        .chain(BASE_HEADERS)
        .collect();
    let rows: Vec<Vec<String>> = records.iter().map(record_cells).collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, headers.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, rule.iter().map(String::as_str), &widths);
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Numbered list of animals waiting for training
pub fn render_queue<'a>(pending: impl Iterator<Item = &'a QueuedAnimal>) -> String {
    pending
        .enumerate()
        .map(|(i, queued)| format!("{:>3}. {} ({})\n", i + 1, queued.name, queued.kind))
        .collect()
}
