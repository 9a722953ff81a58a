use rand::SeedableRng as _;
use rand_pcg::Pcg64Mcg;
use samplingviz_chart::{
    collapsible::ExpansionLevel,
    config::PageConfig,
    interaction::{PointerEvent, Target},
    page::Page,
    session::ChartSession,
    svg,
    table::COLLAPSIBLE_STRUCTURAL_CELLS,
    validate::{BinClass, DEFAULT_FAIL_MESSAGE, FAIL_COLOR, PASS_COLOR, Verdict},
};

const FISH: &str = "sampling-dist-fish";
const HTML: &str = include_str!("fixtures/sampling-distribution.html");

fn page() -> Page {
    Page::load(HTML, &PageConfig::default()).unwrap()
}

/// Indices of the bars lying entirely within `[lo, hi]`.
fn bars_within(chart: &ChartSession, lo: f64, hi: f64) -> Vec<usize> {
    chart
        .bars()
        .iter()
        .filter(|bar| bar.bin.x0() >= lo && bar.bin.x1() <= hi)
        .map(|bar| bar.index)
        .collect()
}

#[test]
fn extracts_every_table() {
    let page = page();
    assert_eq!(page.charts().len(), 4);

    let grades = page.chart("pop-dist-stat-100-grades").unwrap();
    assert_eq!(grades.values().len(), 8);

    let fish = page.chart(FISH).unwrap();
    assert_eq!(fish.values().len(), 10);
    let table = fish.table().unwrap();
    assert_eq!(table.structural_cells(), COLLAPSIBLE_STRUCTURAL_CELLS);
    assert_eq!(table.num_groups(), 2);

    let income = page.chart("pop-dist-activity").unwrap();
    assert_eq!(income.values(), [42000.0, 38500.0, 51000.0]);
}

#[test]
fn fish_bins_have_round_edges() {
    let page = page();
    let fish = page.chart(FISH).unwrap();
    let bars = fish.bars();
    assert_eq!(bars.first().unwrap().bin.x0(), 36.5);
    assert_eq!(bars.last().unwrap().bin.x1(), 51.0);
    assert_eq!(
        bars.iter().map(|b| b.bin.count).sum::<u64>(),
        fish.values().len() as u64
    );
}

#[test]
fn selecting_exactly_the_range_passes() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    let inside = bars_within(fish, 40.0, 46.0);
    assert_eq!(inside.len(), 12);
    assert!(fish.select(&inside));

    let result = fish.check("item-1").unwrap();
    assert!(result.verdict.is_pass());
    assert_eq!(result.status_color, PASS_COLOR);
    assert_eq!(result.alert, None);

    // One extra bar outside the range
    fish.dispatch(Target::Bin(0), PointerEvent::Click);
    let result = fish.check("item-1").unwrap();
    assert!(result.verdict.is_fail());
    assert_eq!(result.status_color, FAIL_COLOR);
    assert_eq!(result.alert.as_deref(), Some(DEFAULT_FAIL_MESSAGE));
}

#[test]
fn empty_selection_fails() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    assert!(fish.check("item-1").unwrap().verdict.is_fail());
    assert!(fish.check("item-2").unwrap().verdict.is_fail());
}

#[test]
fn hovered_bars_count_as_selected() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    let inside = bars_within(fish, 40.0, 46.0);
    let (last, locked) = inside.split_last().unwrap();
    fish.select(locked);
    fish.dispatch(Target::Bin(*last), PointerEvent::Enter);
    assert!(fish.check("item-1").unwrap().verdict.is_pass());
}

/// Indices of the bars starting at or after `lo`.
fn bars_from(chart: &ChartSession, lo: f64) -> Vec<usize> {
    chart
        .bars()
        .iter()
        .filter(|bar| bar.bin.x0() >= lo)
        .map(|bar| bar.index)
        .collect()
}

#[test]
fn bar_starting_at_upper_bound_fails_inside_exercise() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    let mut selection = bars_within(fish, 40.0, 46.0);
    let adjacent = fish
        .bars()
        .iter()
        .position(|bar| bar.bin.x0() == 46.0)
        .unwrap();
    selection.push(adjacent);
    assert!(fish.select(&selection));

    let result = fish.check("item-1").unwrap();
    assert_eq!(
        result.verdict,
        Verdict::Fail {
            bin: adjacent,
            class: BinClass::Outside,
            selected: true
        }
    );
}

#[test]
fn outside_exercise_is_mirrored() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    let beyond = bars_from(fish, 50.0);
    assert_eq!(beyond.len(), 2);
    fish.select(&beyond);
    assert!(fish.check("item-2").unwrap().verdict.is_pass());

    let inside = bars_within(fish, 40.0, 46.0);
    fish.select(&inside[..1]);
    assert!(fish.check("item-2").unwrap().verdict.is_fail());
    assert!(fish.status("item-2").unwrap().verdict.is_fail());
}

#[test]
fn bar_starting_at_upper_bound_must_be_selected_outside() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    let beyond = bars_from(fish, 50.5);
    assert_eq!(beyond.len(), 1);
    fish.select(&beyond);

    let result = fish.check("item-2").unwrap().clone();
    let adjacent = beyond[0] - 1;
    assert_eq!(fish.bars()[adjacent].bin.x0(), 50.0);
    assert_eq!(
        result.verdict,
        Verdict::Fail {
            bin: adjacent,
            class: BinClass::Outside,
            selected: false
        }
    );
}

#[test]
fn bar_ending_at_upper_bound_is_unchecked_outside() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    let mut selection = bars_from(fish, 50.0);
    let ending = selection[0] - 1;
    assert_eq!(fish.bars()[ending].bin.x1(), 50.0);
    selection.push(ending);
    assert!(fish.select(&selection));
    assert!(fish.check("item-2").unwrap().verdict.is_pass());
}

#[test]
fn reset_restores_defaults() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    let around_mean = fish
        .bars()
        .iter()
        .position(|bar| bar.bin.contains(43.45))
        .unwrap();
    fish.select(&[around_mean]);
    fish.dispatch(Target::Bin(around_mean + 4), PointerEvent::Enter);
    assert_eq!(fish.count_labels().len(), 2);
    let highlighted = fish.highlighted_cells();
    assert_eq!(highlighted.len(), 2);
    let table = fish.table().unwrap();
    assert!(
        highlighted
            .iter()
            .any(|&cell| table.cell(cell).unwrap().text == "43.45")
    );

    fish.dispatch(Target::Reset, PointerEvent::Click);
    assert!(fish.bars().iter().all(|bar| bar.state().is_default()));
    assert!(fish.count_labels().is_empty());
    assert!(fish.highlighted_cells().is_empty());
}

#[test]
fn table_button_cycles() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    assert_eq!(fish.collapsible().unwrap().button_label(), "Show more");
    assert_eq!(fish.press_table_button(), Some(ExpansionLevel::PartlyExpanded));
    assert_eq!(fish.collapsible().unwrap().button_label(), "Show all");
    assert_eq!(fish.press_table_button(), Some(ExpansionLevel::FullyExpanded));
    assert_eq!(fish.collapsible().unwrap().button_label(), "Collapse");
    assert_eq!(fish.press_table_button(), Some(ExpansionLevel::Collapsed));

    let income = page.chart("pop-dist-activity").unwrap();
    assert_eq!(
        income.collapsible().unwrap().button_label(),
        "Show more residents"
    );
    assert!(page.chart("pop-dist-stat-100-grades").unwrap().collapsible().is_none());
}

#[test]
fn sample_draws_are_distinct_and_reproducible() {
    let mut page = page();
    let sample = page
        .draw_sample("sample-dist", &mut Pcg64Mcg::seed_from_u64(7))
        .unwrap();
    let mut indices = sample.indices.clone();
    indices.sort_unstable();
    indices.dedup();
    assert_eq!(indices.len(), 8);

    let mut other = self::page();
    let again = other
        .draw_sample("sample-dist", &mut Pcg64Mcg::seed_from_u64(7))
        .unwrap();
    assert_eq!(sample, again);
    assert!(other.chart("sample-dist").unwrap().is_visible());
}

#[test]
fn svg_reflects_state() {
    let mut page = page();
    let fish = page.chart_mut(FISH).unwrap();
    fish.select(&[3]);
    fish.dispatch(Target::MeanToggle, PointerEvent::Click);
    let svg = svg::render(fish).unwrap();
    assert_eq!(svg.matches("class=\"bin\"").count(), fish.bars().len());
    assert!(svg.contains("data-bin=\"3\" data-state=\"Locked\""));
    assert_eq!(svg.matches("class=\"freq\"").count(), 1);
    assert!(svg.contains("Hide true mean"));
    assert!(svg.contains("class=\"mean-line\""));
}
