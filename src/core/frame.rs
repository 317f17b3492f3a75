//! Per-frame ranking and layout.
//!
//! A frame is assembled from scratch whenever anything it depends on
//! changes (year cursor, filter, play state): the year's records are
//! filtered, stable-sorted by population, sliced to the top 12 and laid out
//! with the chart scales. The result is a pure data plan; drawing and
//! tweening happen elsewhere.

use crate::dataset::{Continent, CountryRecord};
use crate::format;
use crate::playback::ContinentFilter;
use crate::scale::{ticks, BandScale, LinearScale};

/// How many countries a frame shows.
pub const TOP_N: usize = 12;

/// Number of axis ticks aimed for.
pub const AXIS_TICKS: usize = 5;

/// Chart box and margins. Height is fixed by the 12 bar slots; width tracks
/// the live window.
#[derive(Debug, Clone, Copy)]
pub struct ChartGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_right: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub bar_height: f32,
}

impl ChartGeometry {
    pub fn with_width(width: f32) -> Self {
        let bar_height = 30.0;
        let (top, right, bottom, left) = (20.0, 120.0, 60.0, 150.0);
        Self {
            width,
            height: (bar_height + 5.0) * TOP_N as f32 + top + bottom,
            margin_top: top,
            margin_right: right,
            margin_bottom: bottom,
            margin_left: left,
            bar_height,
        }
    }

    /// Plotting area, used to clip flag icons.
    pub fn plot_rect(&self) -> (f32, f32, f32, f32) {
        (
            self.margin_left,
            self.margin_top,
            self.width - self.margin_left - self.margin_right,
            self.height - self.margin_top - self.margin_bottom,
        )
    }

    /// Bars may fill at most 80% of the plotting width.
    pub fn bar_max_width(&self) -> f32 {
        0.8 * (self.width - self.margin_left - self.margin_right)
    }

    /// Clamp a value label so it never runs off the right edge.
    pub fn value_label_x(&self, bar_right: f32) -> f32 {
        (bar_right + 5.0).min(self.width - self.margin_right - 50.0)
    }
}

/// Target geometry for one bar and its satellite labels/flag.
#[derive(Debug, Clone, PartialEq)]
pub struct BarPlan {
    pub name: String,
    pub population: u64,
    pub continent: Continent,
    pub flag: String,
    pub rank: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BarPlan {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub x: f32,
    pub label: String,
}

/// Everything one frame draws, in target (post-transition) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub year: String,
    pub bars: Vec<BarPlan>,
    pub axis: Vec<AxisTick>,
    pub axis_y: f32,
    /// Total population of the displayed slice, not the full year.
    pub total_population: u64,
    pub max_population: u64,
}

/// Filter out excluded continents, sort by population descending (stable,
/// so equal populations keep their source order), and keep the top 12.
pub fn rank_year<'a>(
    records: &'a [CountryRecord],
    filter: &ContinentFilter,
) -> Vec<&'a CountryRecord> {
    let mut ranked: Vec<&CountryRecord> = records
        .iter()
        .filter(|r| !filter.is_excluded(r.continent))
        .collect();
    ranked.sort_by(|a, b| b.population.cmp(&a.population));
    ranked.truncate(TOP_N);
    ranked
}

/// Assemble the frame for `year` under the current filter and geometry.
pub fn assemble(
    year: &str,
    records: &[CountryRecord],
    filter: &ContinentFilter,
    geom: &ChartGeometry,
) -> FramePlan {
    let ranked = rank_year(records, filter);

    let max_population = ranked.first().map(|r| r.population).unwrap_or(0);
    let total_population: u64 = ranked.iter().map(|r| r.population).sum();

    let x_scale = LinearScale::new(
        (0.0, max_population as f64),
        (
            geom.margin_left,
            geom.margin_left + geom.bar_max_width(),
        ),
    );
    let y_scale = BandScale::new(
        ranked.len(),
        (geom.margin_top, geom.height - geom.margin_bottom),
        0.1,
    );

    let bars = ranked
        .iter()
        .enumerate()
        .map(|(rank, r)| BarPlan {
            name: r.name.clone(),
            population: r.population,
            continent: r.continent,
            flag: r.flag.clone(),
            rank,
            x: geom.margin_left,
            y: y_scale.position(rank),
            width: x_scale.map(r.population as f64) - geom.margin_left,
            height: y_scale.bandwidth(),
        })
        .collect();

    let axis = ticks(max_population as f64, AXIS_TICKS)
        .into_iter()
        .map(|v| AxisTick {
            x: x_scale.map(v),
            label: format::si(v),
        })
        .collect();

    FramePlan {
        year: year.to_string(),
        bars,
        axis,
        axis_y: geom.height - geom.margin_bottom,
        total_population,
        max_population,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::YearlyDataset;

    fn rec(name: &str, population: u64, continent: Continent) -> CountryRecord {
        CountryRecord {
            name: name.to_string(),
            population,
            continent,
            flag: name.to_lowercase(),
        }
    }

    fn geom() -> ChartGeometry {
        ChartGeometry::with_width(1000.0)
    }

    #[test]
    fn bar_count_is_min_of_twelve_and_survivors() {
        let records: Vec<CountryRecord> = (0..20)
            .map(|i| rec(&format!("c{i}"), 100 + i, Continent::Asia))
            .collect();
        let filter = ContinentFilter::new();
        assert_eq!(rank_year(&records, &filter).len(), TOP_N);

        let few: Vec<CountryRecord> = records[..5].to_vec();
        assert_eq!(rank_year(&few, &filter).len(), 5);

        let mut f = ContinentFilter::new();
        f.toggle(Continent::Asia);
        assert_eq!(rank_year(&records, &f).len(), 0);
    }

    #[test]
    fn equal_populations_keep_source_order() {
        let records = vec![
            rec("first", 50, Continent::Asia),
            rec("second", 50, Continent::Europe),
            rec("third", 50, Continent::Africa),
            rec("big", 90, Continent::Asia),
        ];
        let ranked = rank_year(&records, &ContinentFilter::new());
        let names: Vec<&str> = ranked.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["big", "first", "second", "third"]);
    }

    #[test]
    fn excluded_continents_are_hidden() {
        let records = vec![
            rec("a", 10, Continent::Asia),
            rec("b", 20, Continent::Europe),
            rec("c", 30, Continent::Africa),
        ];
        let mut f = ContinentFilter::new();
        f.toggle(Continent::Europe);
        let ranked = rank_year(&records, &f);
        assert!(ranked.iter().all(|r| r.continent != Continent::Europe));
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn widest_bar_spans_eighty_percent_of_plot() {
        let records = vec![rec("x", 1000, Continent::Asia), rec("y", 500, Continent::Asia)];
        let g = geom();
        let plan = assemble("1950", &records, &ContinentFilter::new(), &g);
        let plot_w = g.width - g.margin_left - g.margin_right;
        assert!((plan.bars[0].width - 0.8 * plot_w).abs() < 1e-3);
        assert!((plan.bars[1].width - 0.4 * plot_w).abs() < 1e-3);
    }

    #[test]
    fn reassembly_is_identical() {
        let records: Vec<CountryRecord> = (0..15)
            .map(|i| rec(&format!("c{i}"), 1000 - i, Continent::Europe))
            .collect();
        let mut f = ContinentFilter::new();
        f.toggle(Continent::Asia);
        let g = geom();
        let a = assemble("1999", &records, &f, &g);
        let b = assemble("1999", &records, &f, &g);
        assert_eq!(a, b);
    }

    #[test]
    fn two_country_dataset_end_to_end() {
        let json = r#"{"1950":[
            {"Country_name":"X","Population":100,"Continent":"Asia","Flags":"x"},
            {"Country_name":"Y","Population":200,"Continent":"Europe","Flags":"y"}]}"#;
        let data: YearlyDataset = serde_json::from_str(json).unwrap();
        let g = geom();
        let plan = assemble("1950", data.records("1950"), &ContinentFilter::new(), &g);

        assert_eq!(plan.year, "1950");
        assert_eq!(plan.bars[0].name, "Y");
        assert_eq!(plan.bars[1].name, "X");
        // Y ranks above X and is twice as wide.
        assert!(plan.bars[0].y < plan.bars[1].y);
        assert!(plan.bars[0].width > plan.bars[1].width);
        assert_eq!(plan.total_population, 300);
        assert_eq!(format::group_thousands(plan.total_population), "300");
    }

    #[test]
    fn empty_year_produces_empty_plan() {
        let plan = assemble("1950", &[], &ContinentFilter::new(), &geom());
        assert!(plan.bars.is_empty());
        assert_eq!(plan.total_population, 0);
        assert_eq!(plan.max_population, 0);
    }

    #[test]
    fn value_labels_never_leave_the_chart() {
        let g = geom();
        let records = vec![rec("x", 1_000_000, Continent::Asia)];
        let plan = assemble("1950", &records, &ContinentFilter::new(), &g);
        let x = g.value_label_x(plan.bars[0].right());
        assert!(x <= g.width - g.margin_right - 50.0);
    }
}
