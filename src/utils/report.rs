use crate::domain::model::{Pair, Roster};

const UNSET: &str = "Unset";

/// Console table of the pairing. Only shown in debug mode since it reveals
/// every assignment.
pub fn pair_table(pairs: &[Pair]) -> String {
    let headers = ["Gifter", "Giftee", "Last Giftee"];
    let rows: Vec<[String; 3]> = pairs
        .iter()
        .map(|pair| {
            [
                pair.gifter.full_name(),
                pair.giftee.full_name(),
                pair.gifter.previous_recipient().unwrap_or(UNSET).to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &headers.map(String::from), &widths);
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 3], widths: &[usize; 3]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Addresses that will receive a message, in roster order.
pub fn recipient_list(roster: &Roster) -> String {
    roster
        .iter()
        .map(|p| format!("  {} <{}>", p.full_name(), p.email))
        .collect::<Vec<_>>()
        .join("\n")
}
