//! Interactive menu over a loaded dataset.
//!
//! The session reads one line per answer. Results are framed by
//! `BEGIN OUTPUT` and `END OUTPUT` on the output writer; complaints about
//! unusable answers go to a separate writer so they never mix with results.
//! End of input ends the session the same way choosing `0` does.

use std::io::{BufRead, Write};
use std::ops::ControlFlow;

use zipstats_core::{CalendarDate, RegionId, VaccinationKind};
use zipstats_data::{EventLog, SourceCoverage, SourceKind};
use zipstats_metrics::MetricsEngine;

use crate::CliError;

/// One entry of the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Exit,
    ListActions,
    TotalPopulation,
    VaccinationsPerCapita,
    AverageMarketValue,
    AverageLivableArea,
    MarketValuePerCapita,
    UnvaccinatedPerArea,
}

impl Action {
    pub(crate) const ALL: [Self; 8] = [
        Self::Exit,
        Self::ListActions,
        Self::TotalPopulation,
        Self::VaccinationsPerCapita,
        Self::AverageMarketValue,
        Self::AverageLivableArea,
        Self::MarketValuePerCapita,
        Self::UnvaccinatedPerArea,
    ];

    pub(crate) const fn number(self) -> u8 {
        match self {
            Self::Exit => 0,
            Self::ListActions => 1,
            Self::TotalPopulation => 2,
            Self::VaccinationsPerCapita => 3,
            Self::AverageMarketValue => 4,
            Self::AverageLivableArea => 5,
            Self::MarketValuePerCapita => 6,
            Self::UnvaccinatedPerArea => 7,
        }
    }

    pub(crate) fn from_number(number: i64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|action| i64::from(action.number()) == number)
    }

    const fn description(self) -> &'static str {
        match self {
            Self::Exit => "Exit program",
            Self::ListActions => "Show available actions",
            Self::TotalPopulation => "Show total population for all ZIP Codes",
            Self::VaccinationsPerCapita => {
                "Show total vaccinations per capita for each ZIP Code for the specified date"
            }
            Self::AverageMarketValue => {
                "Show average market value for properties in a specified ZIP Code"
            }
            Self::AverageLivableArea => {
                "Show average total livable area for properties in a specified ZIP Code"
            }
            Self::MarketValuePerCapita => {
                "Show total market value of properties, per capita, for a specified ZIP Code"
            }
            Self::UnvaccinatedPerArea => {
                "Show number of unvaccinated persons per 100 square feet of livable property \
                 area for all ZIP Codes"
            }
        }
    }

    /// Sources that must have been loaded before the action can run.
    pub(crate) const fn required_sources(self) -> &'static [SourceKind] {
        match self {
            Self::Exit | Self::ListActions => &[],
            Self::TotalPopulation => &[SourceKind::Population],
            Self::VaccinationsPerCapita => &[SourceKind::Observations, SourceKind::Population],
            Self::AverageMarketValue | Self::AverageLivableArea => &[SourceKind::Properties],
            Self::MarketValuePerCapita => &[SourceKind::Properties, SourceKind::Population],
            Self::UnvaccinatedPerArea => &[
                SourceKind::Observations,
                SourceKind::Properties,
                SourceKind::Population,
            ],
        }
    }

    pub(crate) fn is_available(self, coverage: &SourceCoverage) -> bool {
        self.required_sources()
            .iter()
            .all(|kind| coverage.contains(*kind))
    }

    const fn unavailable_message(self) -> &'static str {
        match self {
            Self::TotalPopulation | Self::Exit | Self::ListActions => {
                "No population data provided in the runtime arguments."
            }
            Self::VaccinationsPerCapita => {
                "Insufficient data provided in the runtime arguments, requires both covid and \
                 population data."
            }
            Self::AverageMarketValue | Self::AverageLivableArea => {
                "No properties data provided in the runtime arguments."
            }
            Self::MarketValuePerCapita => {
                "Insufficient data provided in the runtime arguments, requires both properties \
                 and population data."
            }
            Self::UnvaccinatedPerArea => {
                "Insufficient data provided in the runtime arguments, requires covid, \
                 properties, and population data."
            }
        }
    }
}

const INVALID_CHOICE: &str = "Invalid choice. Please enter a number between 0 and 7.";
const NOT_AN_INTEGER: &str = "Invalid input. Please enter a valid integer.";
const ZIP_PROMPT: &str = "Please enter a ZIP Code: ";
const ZIP_COMPLAINT: &str = "Invalid ZIP Code. Please enter a 5-digit number.";
const DATE_PROMPT: &str = "Please enter a date in format [YYYY-MM-DD]: ";
const DATE_COMPLAINT: &str = "Invalid date format. Please enter a date in YYYY-MM-DD format.";
const KIND_PROMPT: &str = "Would you like to see the total number of partial or full \
                           vaccinations? Enter 'partial' or 'full': ";
const KIND_COMPLAINT: &str = "Invalid input. Please enter 'partial' or 'full'.";

/// A menu loop bound to one engine and one pair of terminal streams.
pub(crate) struct Session<'log, R, W, E> {
    engine: MetricsEngine,
    coverage: SourceCoverage,
    event_log: &'log mut EventLog,
    input: R,
    output: W,
    complaints: E,
}

impl<'log, R, W, E> Session<'log, R, W, E>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    pub(crate) const fn new(
        engine: MetricsEngine,
        coverage: SourceCoverage,
        event_log: &'log mut EventLog,
        input: R,
        output: W,
        complaints: E,
    ) -> Self {
        Self {
            engine,
            coverage,
            event_log,
            input,
            output,
            complaints,
        }
    }

    /// Show the menu and answer choices until exit or end of input.
    pub(crate) fn run(mut self) -> Result<(), CliError> {
        loop {
            self.show_menu()?;
            let Some(action) = self.read_action()? else {
                break;
            };
            if self.perform(action)?.is_break() {
                break;
            }
        }
        self.output.flush()?;
        Ok(())
    }

    fn show_menu(&mut self) -> Result<(), CliError> {
        writeln!(self.output, "\nPlease enter an action number and hit return.")?;
        for action in Action::ALL {
            writeln!(self.output, "({}) {}", action.number(), action.description())?;
        }
        self.show_cursor()
    }

    fn show_cursor(&mut self) -> Result<(), CliError> {
        write!(self.output, "> ")?;
        self.output.flush()?;
        Ok(())
    }

    fn read_action(&mut self) -> Result<Option<Action>, CliError> {
        loop {
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match line.parse::<i64>() {
                Ok(number) => match Action::from_number(number) {
                    Some(action) => return Ok(Some(action)),
                    None => writeln!(self.complaints, "{INVALID_CHOICE}")?,
                },
                Err(_) => writeln!(self.complaints, "{NOT_AN_INTEGER}")?,
            }
            self.show_cursor()?;
        }
    }

    /// Read one line without its terminator, recording it in the event log.
    fn read_line(&mut self) -> Result<Option<String>, CliError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.event_log
            .record(&line)
            .map_err(|source| CliError::WriteEventLog { source })?;
        Ok(Some(line))
    }

    /// Ask until `parse` accepts an answer. `None` means input ended.
    fn prompt<T>(
        &mut self,
        question: &str,
        complaint: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, CliError> {
        loop {
            write!(self.output, "{question}")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            if let Some(value) = parse(&line) {
                return Ok(Some(value));
            }
            writeln!(self.complaints, "{complaint}")?;
        }
    }

    fn prompt_region(&mut self) -> Result<Option<RegionId>, CliError> {
        self.prompt(ZIP_PROMPT, ZIP_COMPLAINT, |line| {
            RegionId::parse_exact(line).ok()
        })
    }

    fn perform(&mut self, action: Action) -> Result<ControlFlow<()>, CliError> {
        if action == Action::Exit {
            writeln!(self.output, "Exiting the program...")?;
            return Ok(ControlFlow::Break(()));
        }
        if !action.is_available(&self.coverage) {
            writeln!(self.output, "{}", action.unavailable_message())?;
            return Ok(ControlFlow::Continue(()));
        }
        match action {
            Action::Exit | Action::ListActions => self.list_actions(),
            Action::TotalPopulation => {
                let total = self.engine.total_population();
                self.print_block(&[total.to_string()])
            }
            Action::VaccinationsPerCapita => self.vaccinations_per_capita(),
            Action::AverageMarketValue => {
                self.per_region(MetricsEngine::average_market_value)
            }
            Action::AverageLivableArea => {
                self.per_region(MetricsEngine::average_livable_area)
            }
            Action::MarketValuePerCapita => {
                self.per_region(MetricsEngine::market_value_per_capita)
            }
            Action::UnvaccinatedPerArea => {
                let lines: Vec<String> = self
                    .engine
                    .unvaccinated_per_area()
                    .iter()
                    .map(|(region, rate)| format!("{region}: {rate:.4}"))
                    .collect();
                self.print_block(&lines)
            }
        }
    }

    fn list_actions(&mut self) -> Result<ControlFlow<()>, CliError> {
        let lines: Vec<String> = Action::ALL
            .into_iter()
            .filter(|action| action.is_available(&self.coverage))
            .map(|action| action.number().to_string())
            .collect();
        self.print_block(&lines)
    }

    fn vaccinations_per_capita(&mut self) -> Result<ControlFlow<()>, CliError> {
        let Some(kind) = self.prompt(KIND_PROMPT, KIND_COMPLAINT, |line| match line {
            "partial" => Some(VaccinationKind::Partial),
            "full" => Some(VaccinationKind::Full),
            _ => None,
        })?
        else {
            return Ok(ControlFlow::Break(()));
        };
        let Some(date) = self.prompt(DATE_PROMPT, DATE_COMPLAINT, |line| {
            CalendarDate::parse(line).ok()
        })?
        else {
            return Ok(ControlFlow::Break(()));
        };
        let lines: Vec<String> = self
            .engine
            .vaccination_rate_per_capita(&date, kind)
            .iter()
            .filter(|(_, rate)| **rate != 0.0)
            .map(|(region, rate)| format!("{region} {rate:.4}"))
            .collect();
        self.print_block(&lines)
    }

    fn per_region(
        &mut self,
        metric: fn(&mut MetricsEngine, RegionId) -> i64,
    ) -> Result<ControlFlow<()>, CliError> {
        let Some(region) = self.prompt_region()? else {
            return Ok(ControlFlow::Break(()));
        };
        let value = metric(&mut self.engine, region);
        self.print_block(&[value.to_string()])
    }

    fn print_block(&mut self, lines: &[String]) -> Result<ControlFlow<()>, CliError> {
        writeln!(self.output, "\nBEGIN OUTPUT")?;
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        writeln!(self.output, "END OUTPUT")?;
        Ok(ControlFlow::Continue(()))
    }
}
