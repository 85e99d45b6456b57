#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::indexing_slicing)]

use std::{collections::VecDeque, error::Error};

use classic_ds::ProbingHashTable;
use plotters::prelude::*;
use rand::{Rng, distr::Alphanumeric};

// Growth experiment: keys inserted into a fresh table, measured at evenly spaced checkpoints
const MAX_KEYS: usize = 20_000;
const NUM_STEPS: usize = 10;
const KEY_LENGTH: usize = 8;

// Churn experiment: a steady-state table where the oldest keys are replaced every round
const CHURN_TABLE_KEYS: usize = 5_000;
const CHURN_ROUNDS: usize = 10;
const CHURN_BATCH: usize = 1_000;

const FONT_FAMILY: &str = "sans-serif";
const COLORS: [RGBColor; 2] = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: i32 = 4;
const TEXT_SIZE: i32 = 16;
const TITLE_SIZE: i32 = 35;

/// Families of keys with very different behaviour under the character-sum hash
#[derive(Debug, Clone, Copy)]
enum KeySet {
    /// Random alphanumeric strings
    Random,
    /// `key0`, `key1`, ... whose sums crowd into a narrow band of slots
    Sequential,
}

impl KeySet {
    const ALL: [Self; 2] = [Self::Random, Self::Sequential];

    fn label(self) -> &'static str {
        match self {
            Self::Random => "Random keys",
            Self::Sequential => "Sequential keys",
        }
    }

    /// Generates `count` keys; sequential keys are numbered from `offset`
    fn generate(self, count: usize, offset: usize, rng: &mut impl Rng) -> Vec<String> {
        match self {
            Self::Random => (0..count).map(|_| random_key(&mut *rng)).collect(),
            Self::Sequential => (offset..offset + count).map(|i| format!("key{i}")).collect(),
        }
    }
}

fn random_key(rng: &mut impl Rng) -> String {
    (0..KEY_LENGTH).map(|_| char::from(rng.sample(Alphanumeric))).collect()
}

#[derive(Debug, Clone, Copy)]
struct ProbeStats {
    average: f64,
    worst: usize,
}

/// Probe lengths over every live key of the table
fn probe_stats(table: &ProbingHashTable<String, usize>) -> ProbeStats {
    let lengths: Vec<usize> =
        table.iter().filter_map(|(key, _)| table.probe_length(key.as_str())).collect();

    let worst = lengths.iter().copied().max().unwrap_or(0);
    let average = if lengths.is_empty() {
        0.0
    } else {
        lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
    };

    ProbeStats { average, worst }
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    keys: usize,
    capacity: usize,
    stats: ProbeStats,
}

fn growth_profile(keys: &[String]) -> Vec<Checkpoint> {
    let step = MAX_KEYS / NUM_STEPS;
    let mut table = ProbingHashTable::new();
    let mut checkpoints = Vec::with_capacity(NUM_STEPS);

    for (inserted, key) in keys.iter().enumerate() {
        table.set(key.clone(), inserted);

        if (inserted + 1) % step == 0 {
            checkpoints.push(Checkpoint {
                keys: inserted + 1,
                capacity: table.capacity(),
                stats: probe_stats(&table),
            });
        }
    }

    checkpoints
}

#[derive(Debug, Clone, Copy)]
struct ChurnRound {
    round: usize,
    tombstones: usize,
    capacity: usize,
    stats: ProbeStats,
}

fn churn_profile(key_set: KeySet, rng: &mut impl Rng) -> Vec<ChurnRound> {
    let mut live: VecDeque<String> = key_set.generate(CHURN_TABLE_KEYS, 0, rng).into();
    let mut table = ProbingHashTable::new();
    for (value, key) in live.iter().enumerate() {
        table.set(key.clone(), value);
    }

    let mut next = CHURN_TABLE_KEYS;
    let mut rounds = Vec::with_capacity(CHURN_ROUNDS);

    for round in 1..=CHURN_ROUNDS {
        for _ in 0..CHURN_BATCH {
            if let Some(oldest) = live.pop_front() {
                table.delete(oldest.as_str());
            }
        }

        for key in key_set.generate(CHURN_BATCH, next, rng) {
            table.set(key.clone(), next);
            live.push_back(key);
            next += 1;
        }

        rounds.push(ChurnRound {
            round,
            tombstones: table.tombstones(),
            capacity: table.capacity(),
            stats: probe_stats(&table),
        });
    }

    rounds
}

/// Draws one line per series against shared x values
fn draw_chart(
    path: &str,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    x_values: &[usize],
    series: &[(&str, Vec<f64>)],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_x = x_values.iter().copied().max().unwrap_or(1);
    let max_y = series
        .iter()
        .flat_map(|(_, values)| values.iter())
        .fold(0.0_f64, |max, &y| max.max(y)) *
        1.1; // Add 10% margin
    let max_y = if max_y > 0.0 { max_y } else { 1.0 };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0..max_x, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    for (series_idx, (label, values)) in series.iter().enumerate() {
        let color = COLORS[series_idx % COLORS.len()];
        let line_style = ShapeStyle::from(&color).stroke_width(LINE_WIDTH);
        let points: Vec<(usize, f64)> =
            x_values.iter().copied().zip(values.iter().copied()).collect();

        chart
            .draw_series(LineSeries::new(points.clone(), line_style))?
            .label(*label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(
            points.into_iter().map(|point| Circle::new(point, MARKER_SIZE, color.filled())),
        )?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let mut rng = rand::rng();

    let checkpoints_x: Vec<usize> =
        (1..=NUM_STEPS).map(|step| step * (MAX_KEYS / NUM_STEPS)).collect();
    let mut average_probes: Vec<(&str, Vec<f64>)> = Vec::new();
    let mut worst_probes: Vec<(&str, Vec<f64>)> = Vec::new();

    for key_set in KeySet::ALL {
        println!("Growth profile: {}", key_set.label());
        let keys = key_set.generate(MAX_KEYS, 0, &mut rng);
        let checkpoints = growth_profile(&keys);

        for checkpoint in &checkpoints {
            println!(
                "  {} keys: capacity = {}, avg probes = {:.2}, worst = {}",
                checkpoint.keys,
                checkpoint.capacity,
                checkpoint.stats.average,
                checkpoint.stats.worst
            );
        }

        average_probes.push((
            key_set.label(),
            checkpoints.iter().map(|checkpoint| checkpoint.stats.average).collect(),
        ));
        worst_probes.push((
            key_set.label(),
            checkpoints.iter().map(|checkpoint| checkpoint.stats.worst as f64).collect(),
        ));
    }

    let rounds_x: Vec<usize> = (1..=CHURN_ROUNDS).collect();
    let mut tombstones: Vec<(&str, Vec<f64>)> = Vec::new();
    let mut churn_probes: Vec<(&str, Vec<f64>)> = Vec::new();

    for key_set in KeySet::ALL {
        println!("Churn profile: {}", key_set.label());
        let rounds = churn_profile(key_set, &mut rng);

        for round in &rounds {
            println!(
                "  round {}: capacity = {}, tombstones = {}, avg probes = {:.2}, worst = {}",
                round.round, round.capacity, round.tombstones, round.stats.average, round.stats.worst
            );
        }

        tombstones
            .push((key_set.label(), rounds.iter().map(|round| round.tombstones as f64).collect()));
        churn_probes
            .push((key_set.label(), rounds.iter().map(|round| round.stats.average).collect()));
    }

    draw_chart(
        "average_probe_length.png",
        "Average Probe Length While Growing",
        "Number of Keys Inserted",
        "Average Probe Length (slots)",
        &checkpoints_x,
        &average_probes,
    )?;
    draw_chart(
        "worst_probe_length.png",
        "Worst-Case Probe Length While Growing",
        "Number of Keys Inserted",
        "Worst-Case Probe Length (slots)",
        &checkpoints_x,
        &worst_probes,
    )?;
    draw_chart(
        "churn_tombstones.png",
        "Tombstones Under Delete/Insert Churn",
        "Churn Round",
        "Tombstones",
        &rounds_x,
        &tombstones,
    )?;
    draw_chart(
        "churn_probe_length.png",
        "Average Probe Length Under Churn",
        "Churn Round",
        "Average Probe Length (slots)",
        &rounds_x,
        &churn_probes,
    )?;

    println!(
        "Generated plot images: average_probe_length.png, worst_probe_length.png, \
         churn_tombstones.png, churn_probe_length.png"
    );

    Ok(())
}
