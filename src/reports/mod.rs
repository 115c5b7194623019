use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keymetry::ergonomics::FingerUsageReport;
use keymetry::optimizer::KeyAssignment;
use keymetry::patterns::MacroSuggestion;
use keymetry::simulator::{layer_name, EfficiencyReport, LayoutComparison, ThumbCandidate};
use keymetry::snapshot::SummaryStats;
use keymetry::timing::{
    AwkwardTransition, Hesitation, LatencyClass, LatencyStats, SlowTransition, TransitionSummary,
};
use std::collections::BTreeMap;

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align(table: &mut Table, columns: std::ops::RangeInclusive<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_summary(stats: &SummaryStats) {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Total keystrokes"),
        Cell::new(stats.total_keystrokes).fg(Color::Cyan),
    ]);
    table.add_row(vec![Cell::new("Sessions"), Cell::new(stats.total_sessions)]);
    table.add_row(vec![Cell::new("Unique keys"), Cell::new(stats.unique_keys)]);
    table.add_row(vec![
        Cell::new("Unique bigrams"),
        Cell::new(stats.unique_bigrams),
    ]);
    table.add_row(vec![
        Cell::new("Unique combos"),
        Cell::new(stats.unique_combos),
    ]);
    right_align(&mut table, 1..=1);
    println!("\n{}", table);

    let mut keys = base_table();
    keys.add_row(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);
    for (key, count) in &stats.top_keys {
        keys.add_row(vec![Cell::new(key), Cell::new(count).fg(Color::Cyan)]);
    }
    right_align(&mut keys, 1..=1);
    println!("\nTop keys:\n{}", keys);

    let mut bigrams = base_table();
    bigrams.add_row(vec![
        Cell::new("Bigram").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);
    for (bigram, count) in &stats.top_bigrams {
        bigrams.add_row(vec![Cell::new(bigram), Cell::new(count).fg(Color::Cyan)]);
    }
    right_align(&mut bigrams, 1..=1);
    println!("\nTop bigrams:\n{}", bigrams);
}

pub fn print_finger_usage(report: &FingerUsageReport) {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Finger").add_attribute(Attribute::Bold),
        Cell::new("Load %").add_attribute(Attribute::Bold),
    ]);
    for (finger, share) in &report.finger_load {
        let cell = Cell::new(format!("{:.2}", share));
        let cell = if *share > 20.0 {
            cell.fg(Color::Red)
        } else {
            cell
        };
        table.add_row(vec![Cell::new(finger), cell]);
    }
    right_align(&mut table, 1..=1);
    println!("\n{}", table);

    println!(
        "\n🖐️  SFB rate: {:.2}%   Hand alternation: {:.2}%   Ergonomic score: {:.1}/100",
        report.sfb_rate, report.hand_alternation_rate, report.assessment.overall_score
    );
    for issue in &report.assessment.issues {
        println!("⚠️  {}", issue);
    }
    for rec in &report.assessment.recommendations {
        println!("💡 {}", rec);
    }
}

pub fn print_top_transitions(top: &[TransitionSummary]) {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("From").add_attribute(Attribute::Bold),
        Cell::new("To").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Avg ms"),
        Cell::new("Comfort").fg(Color::Cyan),
    ]);
    for t in top {
        table.add_row(vec![
            Cell::new(&t.from),
            Cell::new(&t.to),
            Cell::new(t.count),
            Cell::new(format!("{:.0}", t.avg_ms)),
            Cell::new(format!("{:.0}", t.comfort)).fg(Color::Cyan),
        ]);
    }
    right_align(&mut table, 2..=4);
    println!("\n{}", table);
}

pub fn print_awkward_transitions(awkward: &[AwkwardTransition]) {
    if awkward.is_empty() {
        println!("\n✅ No awkward transitions above the count floor.");
        return;
    }
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("From").add_attribute(Attribute::Bold),
        Cell::new("To").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Comfort").fg(Color::Red),
        Cell::new("Reason"),
    ]);
    for t in awkward {
        table.add_row(vec![
            Cell::new(&t.from),
            Cell::new(&t.to),
            Cell::new(t.count),
            Cell::new(format!("{:.0}", t.comfort)).fg(Color::Red),
            Cell::new(&t.reason),
        ]);
    }
    right_align(&mut table, 2..=3);
    println!("\n{}", table);
}

pub fn print_slow_transitions(slow: &[SlowTransition]) {
    if slow.is_empty() {
        println!("\n✅ No consistently slow transitions.");
        return;
    }
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("From").add_attribute(Attribute::Bold),
        Cell::new("To").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Avg ms").fg(Color::Red),
    ]);
    for t in slow {
        table.add_row(vec![
            Cell::new(&t.from),
            Cell::new(&t.to),
            Cell::new(t.count),
            Cell::new(format!("{:.0}", t.avg_ms)).fg(Color::Red),
        ]);
    }
    right_align(&mut table, 2..=3);
    println!("\n{}", table);
}

pub fn print_latency(stats: &LatencyStats, classes: &BTreeMap<LatencyClass, u64>) {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Latency").add_attribute(Attribute::Bold),
        Cell::new("ms").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Average"),
        Cell::new(format!("{:.1}", stats.avg_ms)),
    ]);
    table.add_row(vec![
        Cell::new("Median"),
        Cell::new(format!("{:.1}", stats.median_ms)),
    ]);
    table.add_row(vec![
        Cell::new("Min"),
        Cell::new(format!("{:.1}", stats.min_ms)),
    ]);
    table.add_row(vec![
        Cell::new("Max"),
        Cell::new(format!("{:.1}", stats.max_ms)),
    ]);
    table.add_row(vec![
        Cell::new("p95"),
        Cell::new(format!("{:.1}", stats.p95_ms)).fg(Color::Cyan),
    ]);
    right_align(&mut table, 1..=1);
    println!("\n{}", table);

    let mut counts = base_table();
    counts.add_row(vec![
        Cell::new("Class").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);
    for (class, count) in classes {
        let cell = Cell::new(count);
        let cell = match class {
            LatencyClass::Normal => cell,
            LatencyClass::Hesitation => cell.fg(Color::Yellow),
            LatencyClass::Pause => cell.fg(Color::Red),
        };
        counts.add_row(vec![Cell::new(class), cell]);
    }
    right_align(&mut counts, 1..=1);
    println!("\n{}", counts);
}

pub fn print_hesitations(hesitations: &[Hesitation], limit: usize) {
    if hesitations.is_empty() {
        println!("\n✅ No hesitations detected.");
        return;
    }
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Delay ms").add_attribute(Attribute::Bold),
        Cell::new("From"),
        Cell::new("To"),
        Cell::new("Before"),
        Cell::new("After"),
    ]);
    for h in hesitations.iter().take(limit) {
        table.add_row(vec![
            Cell::new(format!("{:.0}", h.delay_ms)).fg(Color::Yellow),
            Cell::new(&h.prev_symbol),
            Cell::new(&h.next_symbol),
            Cell::new(h.context_before.join(" ")),
            Cell::new(h.context_after.join(" ")),
        ]);
    }
    right_align(&mut table, 0..=0);
    println!("\n{} hesitations (showing {}):", hesitations.len(), hesitations.len().min(limit));
    println!("{}", table);
}

pub fn print_sequences(sequences: &[(String, usize)], limit: usize) {
    if sequences.is_empty() {
        println!("\nNo repeated sequences above the frequency floor.");
        return;
    }
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Sequence").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);
    for (sequence, count) in sequences.iter().take(limit) {
        table.add_row(vec![
            Cell::new(sequence),
            Cell::new(count).fg(Color::Cyan),
        ]);
    }
    right_align(&mut table, 1..=1);
    println!("\n{}", table);
}

pub fn print_macros(macros: &[MacroSuggestion]) {
    if macros.is_empty() {
        println!("\nNo macro-worthy patterns at the current threshold.");
        return;
    }
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Pattern").add_attribute(Attribute::Bold),
        Cell::new("Count"),
        Cell::new("Keys"),
        Cell::new("Saved").fg(Color::Green),
        Cell::new("% of stream"),
        Cell::new("Recommended"),
    ]);
    for m in macros {
        let verdict = if m.recommended {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("no")
        };
        table.add_row(vec![
            Cell::new(&m.pattern),
            Cell::new(m.frequency),
            Cell::new(m.keystrokes_current),
            Cell::new(m.keystrokes_saved).fg(Color::Green),
            Cell::new(format!("{:.2}", m.percentage)),
            verdict,
        ]);
    }
    right_align(&mut table, 1..=4);
    println!("\n{}", table);
}

pub fn print_assignments(assignments: &[KeyAssignment]) {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Symbol").add_attribute(Attribute::Bold),
        Cell::new("Layer"),
        Cell::new("Position"),
        Cell::new("Finger"),
        Cell::new("Tier"),
        Cell::new("Frequency").fg(Color::Cyan),
        Cell::new("Reason"),
    ]);
    for a in assignments {
        table.add_row(vec![
            Cell::new(&a.symbol).add_attribute(Attribute::Bold),
            Cell::new(a.layer),
            Cell::new(format!("({},{})", a.slot.row, a.slot.col)),
            Cell::new(a.slot.finger),
            Cell::new(a.tier),
            Cell::new(a.frequency).fg(Color::Cyan),
            Cell::new(&a.reason),
        ]);
    }
    right_align(&mut table, 5..=5);
    println!("\n{}", table);
}

/// Physical sketch of one layer: 4 finger rows plus the thumb row.
pub fn print_layout_grid(name: &str, assignments: &[KeyAssignment]) {
    println!("\nLayer plan: {}", name);
    let mut grid = [[' '; 12]; 5];
    for a in assignments {
        let row = a.slot.row as usize;
        let col = a.slot.col as usize;
        if row < 5 && col < 12 {
            if let Some(ch) = a.symbol.chars().next() {
                grid[row][col] = ch;
            }
        }
    }

    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    for row in &grid {
        let cells: Vec<Cell> = row
            .iter()
            .map(|&ch| Cell::new(ch.to_string()).set_alignment(CellAlignment::Center))
            .collect();
        table.add_row(cells);
    }
    println!("{}", table);
}

pub fn print_efficiency(report: &EfficiencyReport) {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        Cell::new("Chars typed"),
        Cell::new(report.simulation.chars_typed),
    ]);
    table.add_row(vec![
        Cell::new("Layer switches"),
        Cell::new(report.simulation.layer_switches),
    ]);
    table.add_row(vec![
        Cell::new("Switches / 100 chars"),
        Cell::new(format!("{:.2}", report.simulation.switches_per_100)),
    ]);
    table.add_row(vec![
        Cell::new("Overhead ms"),
        Cell::new(format!("{:.0}", report.simulation.overhead_ms)),
    ]);
    table.add_row(vec![
        Cell::new("Overhead / char ms"),
        Cell::new(format!("{:.2}", report.simulation.overhead_per_char_ms)),
    ]);
    table.add_row(vec![
        Cell::new("Efficiency score"),
        Cell::new(format!("{:.1}", report.efficiency_score)).fg(Color::Cyan),
    ]);
    let target = Cell::new(if report.meets_target { "✓" } else { "✗" });
    table.add_row(vec![
        Cell::new(format!(
            "Meets target ({:.0}/100 chars)",
            report.target_switches_per_100
        )),
        if report.meets_target {
            target.fg(Color::Green)
        } else {
            target.fg(Color::Red)
        },
    ]);
    right_align(&mut table, 1..=1);
    println!("\n{}", table);

    if !report.simulation.layer_distribution.is_empty() {
        let mut dist = base_table();
        dist.add_row(vec![
            Cell::new("Layer").add_attribute(Attribute::Bold),
            Cell::new("Name"),
            Cell::new("Share %").add_attribute(Attribute::Bold),
        ]);
        for (layer, share) in &report.simulation.layer_distribution {
            dist.add_row(vec![
                Cell::new(layer),
                Cell::new(layer_name(*layer)),
                Cell::new(format!("{:.1}", share)),
            ]);
        }
        right_align(&mut dist, 2..=2);
        println!("\n{}", dist);
    }

    if !report.simulation.missing_keys.is_empty() {
        println!(
            "\n⚠️  Missing keys: {}",
            report.simulation.missing_keys.join(", ")
        );
    }
    for rec in &report.recommendations {
        println!("💡 {}", rec);
    }
}

pub fn print_comparison(comparison: &LayoutComparison) {
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Current"),
        Cell::new("Optimized"),
        Cell::new("Delta").add_attribute(Attribute::Bold),
    ]);

    let delta_cell = |value: f64, text: String| {
        let cell = Cell::new(text);
        if value > 0.0 {
            cell.fg(Color::Green)
        } else if value < 0.0 {
            cell.fg(Color::Red)
        } else {
            cell
        }
    };

    table.add_row(vec![
        Cell::new("Layer switches"),
        Cell::new(comparison.current.layer_switches),
        Cell::new(comparison.candidate.layer_switches),
        delta_cell(
            comparison.improvement.layer_switches as f64,
            format!("{:+}", comparison.improvement.layer_switches),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Overhead ms"),
        Cell::new(format!("{:.0}", comparison.current.overhead_ms)),
        Cell::new(format!("{:.0}", comparison.candidate.overhead_ms)),
        delta_cell(
            comparison.improvement.overhead_ms,
            format!("{:+.0}", comparison.improvement.overhead_ms),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Switches / 100 chars"),
        Cell::new(format!("{:.2}", comparison.current.switches_per_100)),
        Cell::new(format!("{:.2}", comparison.candidate.switches_per_100)),
        delta_cell(
            comparison.improvement.switches_per_100,
            format!("{:+.2}", comparison.improvement.switches_per_100),
        ),
    ]);
    right_align(&mut table, 1..=3);
    println!("\n{}", table);
}

pub fn print_thumb_candidates(candidates: &[ThumbCandidate]) {
    if candidates.is_empty() {
        println!("\nNo thumb-worthy keys in this snapshot.");
        return;
    }
    let mut table = base_table();
    table.add_row(vec![
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Frequency"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Reason"),
    ]);
    for c in candidates {
        table.add_row(vec![
            Cell::new(&c.key).add_attribute(Attribute::Bold),
            Cell::new(c.frequency),
            Cell::new(format!("{:.0}", c.score)).fg(Color::Cyan),
            Cell::new(&c.reason),
        ]);
    }
    right_align(&mut table, 1..=2);
    println!("\n{}", table);
}
