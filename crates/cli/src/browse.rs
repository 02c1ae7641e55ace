//! Interactive browsing over a line-oriented input.
//!
//! Plain lines are search input: they echo at once and are applied only
//! after the debounce interval passes without further input. Lines that
//! start with `:` are commands. Input that arrives while a fetch is
//! running drops that fetch before anything is applied.

use std::future::Future;
use std::io::Write;
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tokio::time::Instant;

use pokedex_core::debounce::Debouncer;
use pokedex_core::filter::{FilterUpdate, SortKey};
use pokedex_core::location::MemoryHistory;
use pokedex_core::types::{entry_id, Entry, EntryId};
use pokedex_core::view::{Action, ErrorState};
use pokedex_pokeapi::catalog::{Catalog, Completion};
use pokedex_pokeapi::error::GatewayError;

use crate::error::CliError;
use crate::render;

const COMMANDS: &str = "\
Type to search by name or number. Commands:
  :type NAME | :type       filter by type / clear the type filter
  :page N | :next | :prev
  :fav                     toggle favorites-only
  :star ID                 toggle a favorite
  :show ID|NAME | - | +    detail view, or the entry before/after the last one shown
  :types                   list type names
  :clear [search|type]     clear all filters, or just one
  :home                    back to the unfiltered list
  :retry                   reload what failed
  :back | :forward         history navigation
  :help | :quit";

fn help() -> String {
    let keys: Vec<String> = SortKey::ALL
        .iter()
        .map(|key| format!("{} = {}", key.as_str(), key.label()))
        .collect();
    format!("{COMMANDS}\n  :sort KEY                {}", keys.join(", "))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Search(String),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Sort(SortKey),
    Page(u32),
    Next,
    Prev,
    Favorites,
    Star(EntryId),
    Show(Target),
    Types,
    /// An action offered by an error or empty state.
    Act(Action),
    Back,
    Forward,
    Help,
    Quit,
}

/// Which entry `:show` opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Key(String),
    Previous,
    Next,
}

/// Fetches that run while input is still being read.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Task {
    Reload,
    Retry,
    Detail(String),
    Types,
}

/// What the loop does after a command.
enum Flow {
    Run(Task),
    Stay,
    Quit,
}

enum Raced<T> {
    Done(T),
    Interrupted(String),
}

impl<T> Raced<T> {
    fn map<U>(self, f: impl FnOnce(T) -> U) -> Raced<U> {
        match self {
            Self::Done(value) => Raced::Done(f(value)),
            Self::Interrupted(line) => Raced::Interrupted(line),
        }
    }
}

/// Result of a finished fetch.
enum Done {
    Load(Completion),
    Detail(Result<Entry, GatewayError>),
    Types(Result<Vec<String>, GatewayError>),
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    let Some(rest) = line.trim().strip_prefix(':') else {
        return Ok(Input::Search(line.trim().to_string()));
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.collect::<Vec<_>>().join(" ");

    let command = match (name, arg.as_str()) {
        ("type", name) => Command::Type(name.to_string()),
        ("sort", key) => Command::Sort(key.parse().map_err(|e| format!("{e}"))?),
        ("page", n) => {
            Command::Page(n.parse().map_err(|_| format!("Not a page number: {n:?}"))?)
        }
        ("next", "") => Command::Next,
        ("prev", "") => Command::Prev,
        ("fav", "") => Command::Favorites,
        ("star", id) => {
            let raw: i64 = id.parse().map_err(|_| format!("Not an id: {id:?}"))?;
            Command::Star(entry_id(raw).map_err(|e| e.to_string())?)
        }
        ("show", "-") => Command::Show(Target::Previous),
        ("show", "+") => Command::Show(Target::Next),
        ("show", key) if !key.is_empty() => Command::Show(Target::Key(key.to_string())),
        ("types", "") => Command::Types,
        ("clear", "") => Command::Act(Action::ClearFilters),
        ("clear", "search") => Command::Act(Action::ClearSearch),
        ("clear", "type") => Command::Act(Action::ClearType),
        ("home", "") => Command::Act(Action::GoHome),
        ("retry", "") => Command::Act(Action::Retry),
        ("back", "") => Command::Back,
        ("forward", "") => Command::Forward,
        ("help", "") => Command::Help,
        ("quit" | "q", "") => Command::Quit,
        _ => return Err(format!("Unknown command :{rest}. Try :help")),
    };
    Ok(Input::Command(command))
}

/// Drive `work` to completion unless a line arrives first.
///
/// At end of input the work is finished rather than dropped.
async fn race<T, R>(
    work: impl Future<Output = T>,
    lines: &mut Lines<R>,
) -> Result<Raced<T>, CliError>
where
    R: AsyncBufRead + Unpin,
{
    tokio::pin!(work);
    tokio::select! {
        biased;
        output = &mut work => Ok(Raced::Done(output)),
        line = lines.next_line() => match line? {
            Some(line) => Ok(Raced::Interrupted(line)),
            None => Ok(Raced::Done(work.await)),
        },
    }
}

struct Browser<'a, W> {
    catalog: &'a mut Catalog<MemoryHistory>,
    out: &'a mut W,
    search: Debouncer,
    /// The entry of the last detail view.
    shown: Option<Entry>,
}

/// Run until `:quit` or end of input.
pub async fn run<R, W>(
    catalog: &mut Catalog<MemoryHistory>,
    input: R,
    out: &mut W,
    debounce: Duration,
) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let search = Debouncer::new(catalog.filters().query, debounce);
    let mut browser = Browser {
        catalog,
        out,
        search,
        shown: None,
    };
    let mut queued: Option<String> = None;
    let mut reload = true;
    let mut task: Option<Task> = None;

    writeln!(browser.out, "{}\n", help())?;
    loop {
        if queued.is_none() && reload {
            reload = false;
            if let Some(line) = browser.perform(Task::Reload, &mut lines).await? {
                queued = Some(line);
                reload = true;
            }
        }
        if queued.is_none() {
            if let Some(pending) = task.take() {
                let loads = pending == Task::Retry;
                if let Some(line) = browser.perform(pending, &mut lines).await? {
                    queued = Some(line);
                    reload |= loads;
                }
            }
        }

        let line = match queued.take() {
            Some(line) => line,
            None => {
                let deadline = browser.search.deadline();
                let wake = deadline.map(Instant::from_std).unwrap_or_else(Instant::now);
                tokio::select! {
                    line = lines.next_line() => match line? {
                        Some(line) => line,
                        None => return Ok(()),
                    },
                    _ = tokio::time::sleep_until(wake), if deadline.is_some() => {
                        if let Some(query) = browser.search.poll(std::time::Instant::now()) {
                            browser.catalog.update_filters(&FilterUpdate::query(query));
                            reload = true;
                        }
                        continue;
                    }
                }
            }
        };

        match parse_line(&line) {
            Ok(Input::Search(text)) => {
                let echo = browser.search.input(text, std::time::Instant::now());
                writeln!(browser.out, "search: {echo}")?;
            }
            Ok(Input::Command(command)) => match browser.apply(command)? {
                Flow::Run(Task::Reload) => reload = true,
                Flow::Run(next) => task = Some(next),
                Flow::Stay => {}
                Flow::Quit => return Ok(()),
            },
            Err(message) => writeln!(browser.out, "{message}")?,
        }
    }
}

impl<W: Write> Browser<'_, W> {
    fn print_view(&mut self) -> Result<(), CliError> {
        if let Some(view) = self.catalog.view() {
            let text = render::view(view, self.catalog.favorites(), self.catalog.page_size());
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }

    /// Adopt a query changed by a command, echoing the cleared input.
    fn sync_search(&mut self, query: String) -> Result<(), CliError> {
        let before = self.search.transient().to_string();
        self.search.sync_external(query);
        if before != self.search.transient() {
            writeln!(self.out, "search: {}", self.search.transient())?;
        }
        Ok(())
    }

    /// Run a fetch. Returns the line that interrupted it, if any; an
    /// interrupted fetch is cancelled and leaves the view untouched.
    async fn perform<R>(
        &mut self,
        task: Task,
        lines: &mut Lines<R>,
    ) -> Result<Option<String>, CliError>
    where
        R: AsyncBufRead + Unpin,
    {
        let raced = match &task {
            Task::Reload => race(self.catalog.refresh(), lines).await?.map(Done::Load),
            Task::Retry => race(self.catalog.retry(), lines).await?.map(Done::Load),
            Task::Detail(key) => {
                race(self.catalog.detail(key), lines).await?.map(Done::Detail)
            }
            Task::Types => race(self.catalog.type_names(), lines).await?.map(Done::Types),
        };

        let done = match raced {
            Raced::Done(done) => done,
            Raced::Interrupted(line) => {
                tracing::debug!(task = ?task, "Input arrived during fetch, dropping it");
                self.catalog.cancel_pending();
                return Ok(Some(line));
            }
        };

        match done {
            Done::Load(Completion::Applied) => self.print_view()?,
            Done::Load(completion) => tracing::debug!(?completion, "Load not applied"),
            Done::Detail(Ok(entry)) => {
                let favorite = self.catalog.favorites().contains(entry.id);
                writeln!(self.out, "{}", render::detail(&entry, favorite))?;
                self.shown = Some(entry);
            }
            Done::Detail(Err(e)) => {
                tracing::warn!(task = ?task, error = %e, "Detail lookup failed");
                writeln!(self.out, "{}", render::error(&ErrorState::detail_failed()))?;
            }
            Done::Types(Ok(names)) => writeln!(self.out, "{}", names.join(" "))?,
            Done::Types(Err(e)) => {
                tracing::warn!(error = %e, "Type list unavailable");
                writeln!(self.out, "{}", render::error(&ErrorState::list_failed()))?;
            }
        }
        Ok(None)
    }

    fn apply(&mut self, command: Command) -> Result<Flow, CliError> {
        let current = self.catalog.filters();
        match command {
            Command::Type(name) => {
                self.catalog.update_filters(&FilterUpdate::type_name(name));
            }
            Command::Sort(key) => {
                self.catalog.update_filters(&FilterUpdate::sort(key));
                writeln!(self.out, "Sorted by {}", key.label())?;
            }
            Command::Page(n) => {
                self.catalog.update_filters(&FilterUpdate::page(n));
            }
            Command::Next => {
                let pages = self
                    .catalog
                    .view()
                    .and_then(|v| v.page())
                    .map(|p| render::page_count(p, self.catalog.page_size()))
                    .unwrap_or(1);
                if current.page >= pages {
                    writeln!(self.out, "Already on the last page")?;
                    return Ok(Flow::Stay);
                }
                self.catalog.update_filters(&FilterUpdate::page(current.page + 1));
            }
            Command::Prev => {
                if current.page <= 1 {
                    writeln!(self.out, "Already on the first page")?;
                    return Ok(Flow::Stay);
                }
                self.catalog.update_filters(&FilterUpdate::page(current.page - 1));
            }
            Command::Favorites => {
                let update = FilterUpdate::favorites_only(!current.favorites_only);
                self.catalog.update_filters(&update);
            }
            Command::Star(id) => {
                let now = self.catalog.toggle_favorite(id);
                writeln!(self.out, "{} {id}", if now { "♥ added" } else { "♡ removed" })?;
                if !current.favorites_only {
                    return Ok(Flow::Stay);
                }
            }
            Command::Show(target) => {
                let key = match (target, &self.shown) {
                    (Target::Key(key), _) => key,
                    (Target::Previous, Some(entry)) => match entry.previous_id() {
                        Some(id) => id.to_string(),
                        None => {
                            writeln!(self.out, "Already at the first entry")?;
                            return Ok(Flow::Stay);
                        }
                    },
                    (Target::Next, Some(entry)) => entry.next_id().to_string(),
                    (Target::Previous | Target::Next, None) => {
                        writeln!(self.out, "Nothing shown yet. Try :show ID")?;
                        return Ok(Flow::Stay);
                    }
                };
                return Ok(Flow::Run(Task::Detail(key)));
            }
            Command::Types => return Ok(Flow::Run(Task::Types)),
            Command::Act(action) => match action.filter_update() {
                Some(update) => {
                    let state = self.catalog.update_filters(&update);
                    self.sync_search(state.query)?;
                }
                None => return Ok(Flow::Run(Task::Retry)),
            },
            Command::Back | Command::Forward => {
                let mut moved = false;
                let state = self.catalog.navigate(|history| {
                    moved = if command == Command::Back {
                        history.back()
                    } else {
                        history.forward()
                    };
                });
                if !moved {
                    writeln!(self.out, "No more history in that direction")?;
                }
                self.sync_search(state.query)?;
            }
            Command::Help => {
                writeln!(self.out, "{}", help())?;
                return Ok(Flow::Stay);
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Run(Task::Reload))
    }
}
