// Interactive terminal dashboard.
//
// Each menu choice reads the control values for one panel, recomputes that
// panel's view from the dataset and prints it. The dataset is borrowed
// immutably for the whole session; only the control values change.
use crate::config::{ChartKind, Controls};
use crate::error::Result;
use crate::filter::{filter_by_society, filter_by_state, filter_by_year_range};
use crate::pipeline::{self, DISTRICT_TOP_N, STATE_TOP_N};
use crate::render;
use crate::types::{Dataset, MonthlySeries};
use crate::util::format_int;
use crate::wordcloud::CloudOptions;
use std::io::{BufRead, Write};
use std::ops::RangeInclusive;
use tracing::debug;

const WORD_CLOUD_ROWS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Profile,
    Sectors,
    TopStates,
    Timeline,
    StateSectors,
    StateTimeline,
    TopDistricts,
    StateBySector,
    WordCloud,
}

impl Panel {
    pub const ALL: [Panel; 9] = [
        Panel::Profile,
        Panel::Sectors,
        Panel::TopStates,
        Panel::Timeline,
        Panel::StateSectors,
        Panel::StateTimeline,
        Panel::TopDistricts,
        Panel::StateBySector,
        Panel::WordCloud,
    ];

    pub fn number(self) -> usize {
        Self::ALL.iter().position(|p| *p == self).map_or(0, |i| i + 1)
    }

    pub fn from_choice(choice: &str) -> Option<Self> {
        let n: usize = choice.parse().ok()?;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn menu_label(self) -> &'static str {
        match self {
            Panel::Profile => "Society information and areas of operation",
            Panel::Sectors => "Societies by sector",
            Panel::TopStates => "Top states by number of societies",
            Panel::Timeline => "Registrations over time",
            Panel::StateSectors => "Sector types for a state",
            Panel::StateTimeline => "Registrations over time for a state",
            Panel::TopDistricts => "Top districts by number of societies",
            Panel::StateBySector => "Societies by state and sector",
            Panel::WordCloud => "Word cloud of society names",
        }
    }
}

pub struct Dashboard<'a, R, W> {
    dataset: &'a Dataset,
    controls: Controls,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Dashboard<'a, R, W> {
    pub fn new(dataset: &'a Dataset, controls: Controls, input: R, out: W) -> Self {
        Self {
            dataset,
            controls,
            input,
            out,
        }
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    /// Menu loop. Returns when the user quits or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.read_line("Enter choice: ")? else {
                break;
            };
            match choice.to_uppercase().as_str() {
                "Q" => break,
                "A" => {
                    for panel in Panel::ALL {
                        let text = self.render_panel(panel);
                        writeln!(self.out, "{text}\n")?;
                    }
                }
                other => match Panel::from_choice(other) {
                    Some(panel) => {
                        if !self.adjust_controls(panel)? {
                            break;
                        }
                        let text = self.render_panel(panel);
                        writeln!(self.out, "{text}\n")?;
                    }
                    None => writeln!(self.out, "Invalid choice. Please enter 1-9, A or Q.\n")?,
                },
            }
        }
        writeln!(self.out, "Exiting the dashboard.")?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "Cooperative Societies Dashboard ({} societies)",
            format_int(self.dataset.len())
        )?;
        for panel in Panel::ALL {
            writeln!(self.out, "[{}] {}", panel.number(), panel.menu_label())?;
        }
        writeln!(self.out, "[A] Show all panels")?;
        writeln!(self.out, "[Q] Quit\n")?;
        Ok(())
    }

    /// Compute and render one panel from the current controls.
    pub fn render_panel(&self, panel: Panel) -> String {
        debug!(panel = panel.number(), "recomputing panel");
        let records = self.dataset.records();
        let c = &self.controls;
        let (title, body) = match panel {
            Panel::Profile => {
                let subset = filter_by_society(records, &c.society);
                let body = match pipeline::society_profile(subset, &c.society) {
                    Ok(view) => render::render_profile(&view),
                    Err(e) => format!("{} {e}", render::no_data()),
                };
                (c.society.clone(), body)
            }
            Panel::Sectors => {
                let counts = pipeline::sector_frequency(records);
                match c.sector_chart {
                    ChartKind::Bar => (
                        "Number of Societies in Different Sectors (Bar Chart)".to_string(),
                        render::render_bar_chart(&counts),
                    ),
                    ChartKind::Pie => (
                        "Number of Societies in Different Sectors (Pie Chart)".to_string(),
                        render::render_pie_chart(&counts),
                    ),
                }
            }
            Panel::TopStates => (
                format!("Top {} States with Highest Number of Societies", c.top_states),
                render::render_bar_chart(&pipeline::top_states(records, c.top_states)),
            ),
            Panel::Timeline => {
                let series = match c.years {
                    Some((start, end)) => {
                        pipeline::monthly_registrations(filter_by_year_range(records, start, end))
                    }
                    None => MonthlySeries::default(),
                };
                let range = c
                    .years
                    .map(|(s, e)| format!(" {s}-{e}"))
                    .unwrap_or_default();
                (
                    format!("Society Registrations Over Time{range}"),
                    render::render_series(&series),
                )
            }
            Panel::StateSectors => (
                format!("Sector Types of Societies for {}", c.sector_state),
                render::render_pie_chart(&pipeline::state_sector_frequency(records, &c.sector_state)),
            ),
            Panel::StateTimeline => (
                format!("Number of Society Registrations Over Time in {}", c.timeline_state),
                render::render_series(&pipeline::monthly_registrations(filter_by_state(
                    records,
                    &c.timeline_state,
                ))),
            ),
            Panel::TopDistricts => (
                format!("Top {} Districts with Highest Number of Societies", c.top_districts),
                render::render_bar_chart(&pipeline::top_districts(records, c.top_districts)),
            ),
            Panel::StateBySector => (
                "Count of Societies by State and Sector Type".to_string(),
                render::render_crosstab(&pipeline::state_sector_crosstab(records)),
            ),
            Panel::WordCloud => (
                format!("Word Cloud: Popular Themes in Society Names ({})", c.cloud_state),
                render::render_word_cloud(
                    &pipeline::name_token_frequency(records, &c.cloud_state, &CloudOptions::default()),
                    WORD_CLOUD_ROWS,
                ),
            ),
        };
        format!("{}) {title}\n\n{body}", panel.number())
    }

    /// Prompt for the controls that drive `panel`. Returns `false` on end of input.
    fn adjust_controls(&mut self, panel: Panel) -> Result<bool> {
        match panel {
            Panel::Profile => {
                let current = self.controls.society.clone();
                let Some(v) = self.prompt_choice("Society name", &current, Choices::Societies)? else {
                    return Ok(false);
                };
                self.controls.society = v;
            }
            Panel::Sectors => {
                let current = match self.controls.sector_chart {
                    ChartKind::Bar => "bar",
                    ChartKind::Pie => "pie",
                };
                let Some(v) = self.read_line(&format!("Chart type (bar/pie) [{current}]: "))? else {
                    return Ok(false);
                };
                match v.to_lowercase().as_str() {
                    "" => {}
                    "bar" => self.controls.sector_chart = ChartKind::Bar,
                    "pie" => self.controls.sector_chart = ChartKind::Pie,
                    other => writeln!(self.out, "Unknown chart type '{other}', keeping {current}.")?,
                }
            }
            Panel::TopStates => {
                let current = self.controls.top_states;
                let Some(n) = self.prompt_number("Number of states", current, &STATE_TOP_N)? else {
                    return Ok(false);
                };
                self.controls.top_states = n;
            }
            Panel::Timeline => {
                let Some((lo, hi)) = self.dataset.year_bounds() else {
                    return Ok(true);
                };
                let (start, end) = self.controls.years.unwrap_or((lo, hi));
                let years = lo as usize..=hi as usize;
                let Some(start) = self.prompt_number("Start year", start as usize, &years)? else {
                    return Ok(false);
                };
                let Some(end) = self.prompt_number("End year", end as usize, &years)? else {
                    return Ok(false);
                };
                self.controls.years = Some((start as i32, end as i32));
            }
            Panel::StateSectors => {
                let current = self.controls.sector_state.clone();
                let Some(v) = self.prompt_choice("State", &current, Choices::States)? else {
                    return Ok(false);
                };
                self.controls.sector_state = v;
            }
            Panel::StateTimeline => {
                let current = self.controls.timeline_state.clone();
                let Some(v) = self.prompt_choice("State", &current, Choices::States)? else {
                    return Ok(false);
                };
                self.controls.timeline_state = v;
            }
            Panel::TopDistricts => {
                let current = self.controls.top_districts;
                let Some(n) = self.prompt_number("Number of districts", current, &DISTRICT_TOP_N)? else {
                    return Ok(false);
                };
                self.controls.top_districts = n;
            }
            Panel::StateBySector => {}
            Panel::WordCloud => {
                let current = self.controls.cloud_state.clone();
                let Some(v) = self.prompt_choice("State", &current, Choices::States)? else {
                    return Ok(false);
                };
                self.controls.cloud_state = v;
            }
        }
        Ok(true)
    }

    /// Read one trimmed line after printing `prompt`. `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    /// Single-select prompt. Blank keeps `current`; `?` lists the options.
    fn prompt_choice(&mut self, label: &str, current: &str, choices: Choices) -> Result<Option<String>> {
        loop {
            let Some(v) = self.read_line(&format!("{label} (? to list) [{current}]: "))? else {
                return Ok(None);
            };
            match v.as_str() {
                "" => return Ok(Some(current.to_string())),
                "?" => {
                    let options = match choices {
                        Choices::Societies => self.dataset.distinct_societies(),
                        Choices::States => self.dataset.distinct_states(),
                    };
                    for option in options {
                        writeln!(self.out, "  {option}")?;
                    }
                }
                _ => return Ok(Some(v)),
            }
        }
    }

    /// Integer prompt limited to `range`. Blank keeps `current`.
    fn prompt_number(
        &mut self,
        label: &str,
        current: usize,
        range: &RangeInclusive<usize>,
    ) -> Result<Option<usize>> {
        loop {
            let prompt = format!("{label} ({}-{}) [{current}]: ", range.start(), range.end());
            let Some(v) = self.read_line(&prompt)? else {
                return Ok(None);
            };
            if v.is_empty() {
                return Ok(Some(current));
            }
            match v.parse::<usize>() {
                Ok(n) if range.contains(&n) => return Ok(Some(n)),
                _ => writeln!(
                    self.out,
                    "Please enter a number between {} and {}.",
                    range.start(),
                    range.end()
                )?,
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Choices {
    Societies,
    States,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SocietyRecord;
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn dataset() -> Dataset {
        let record = |name: &str, state: &str, sector: &str, ymd: (i32, u32, u32)| SocietyRecord {
            name: name.to_string(),
            address: "Main Road".to_string(),
            state: state.to_string(),
            district: Some("Ernakulam".to_string()),
            registration_date: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2),
            sector_type: sector.to_string(),
            area_of_operation: format!("{state}, GOA"),
        };
        Dataset::new(vec![
            record("Kerala Milk Society", "KERALA", "Dairy", (2015, 4, 2)),
            record("Kerala Credit Society", "KERALA", "Credit", (2017, 8, 9)),
            record("Goa Milk Union", "GOA", "Dairy", (2019, 1, 20)),
        ])
    }

    fn controls() -> Controls {
        Controls {
            society: "Kerala Milk Society".to_string(),
            sector_chart: ChartKind::Pie,
            top_states: 8,
            years: Some((2015, 2019)),
            sector_state: "KERALA".to_string(),
            timeline_state: "KERALA".to_string(),
            top_districts: 10,
            cloud_state: "KERALA".to_string(),
        }
    }

    fn run(input: &str) -> (String, Controls) {
        let ds = dataset();
        let mut out = Vec::new();
        let controls = {
            let mut dash = Dashboard::new(&ds, controls(), Cursor::new(input.to_string()), &mut out);
            dash.run().unwrap();
            dash.controls().clone()
        };
        (String::from_utf8(out).unwrap(), controls)
    }

    #[test]
    fn panel_numbers_round_trip_through_menu_choices() {
        for panel in Panel::ALL {
            assert_eq!(Panel::from_choice(&panel.number().to_string()), Some(panel));
        }
        assert_eq!(Panel::from_choice("0"), None);
        assert_eq!(Panel::from_choice("10"), None);
    }

    #[test]
    fn unknown_society_renders_no_data() {
        let (out, controls) = run("1\nNobody\nq\n");
        assert_eq!(controls.society, "Nobody");
        assert!(out.contains("(no data) No society named 'Nobody'"));
    }

    #[test]
    fn blank_input_keeps_current_value() {
        let (out, controls) = run("3\n\nq\n");
        assert_eq!(controls.top_states, 8);
        assert!(out.contains("Top 8 States"));
    }

    #[test]
    fn out_of_range_number_is_asked_again() {
        let (out, controls) = run("7\n25\n2\nq\n");
        assert!(out.contains("Please enter a number between 1 and 20."));
        assert_eq!(controls.top_districts, 2);
    }

    #[test]
    fn year_range_is_applied_to_timeline() {
        let (out, controls) = run("4\n2017\n2019\nq\n");
        assert_eq!(controls.years, Some((2017, 2019)));
        assert!(out.contains("2017-08"));
        assert!(!out.contains("2015-04"));
    }

    #[test]
    fn switching_sector_chart_to_bar() {
        let (out, controls) = run("2\nbar\nq\n");
        assert_eq!(controls.sector_chart, ChartKind::Bar);
        assert!(out.contains("(Bar Chart)"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let (out, _) = run("");
        assert!(out.ends_with("Exiting the dashboard.\n"));
    }

    #[test]
    fn every_panel_renders() {
        let ds = dataset();
        let dash = Dashboard::new(&ds, controls(), Cursor::new(String::new()), Vec::new());
        for panel in Panel::ALL {
            let text = dash.render_panel(panel);
            assert!(text.starts_with(&format!("{})", panel.number())));
        }
        assert!(dash.render_panel(Panel::WordCloud).contains("Kerala"));
    }
}
