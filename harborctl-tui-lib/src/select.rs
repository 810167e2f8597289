use std::collections::BTreeSet;
use std::io::{Write, stdout};

use crossterm::{
    cursor::{self, MoveToColumn, MoveUp},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    style::Stylize,
    terminal::{self, Clear, ClearType},
};

use crate::ansi::lpad_ansi;

/// One selectable row. Entries sharing a `group` value must be adjacent;
/// the widget prints a heading at each boundary but never reorders.
#[derive(Clone, Debug)]
pub struct SelectItem {
    pub group: String,
    pub name: String,
    pub detail: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    Confirmed,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SelectEvent {
    Up,
    Down,
    Toggle,
    Confirm,
    Cancel,
    Resize { height: u16 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Confirm,
    Cancel,
}

/// A row of the scrollable body: either a group heading or the item at
/// the given index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BodyRow {
    Group(usize),
    Item(usize),
}

const DEFAULT_BODY_ROWS: usize = 10;

struct SelectState {
    cursor: usize,
    selected: BTreeSet<usize>,
    offset: usize,
    body_rows: usize,
}

pub struct MultiSelect {
    title: String,
    items: Vec<SelectItem>,
    rows: Vec<BodyRow>,
    name_width: usize,
    state: SelectState,
}

impl MultiSelect {
    pub fn new(title: impl Into<String>, items: Vec<SelectItem>) -> Self {
        let rows = body_rows(&items);
        let name_width = items
            .iter()
            .map(|item| item.name.chars().count())
            .max()
            .unwrap_or(0);

        Self {
            title: title.into(),
            items,
            rows,
            name_width,
            state: SelectState {
                cursor: 0,
                selected: BTreeSet::new(),
                offset: 0,
                body_rows: DEFAULT_BODY_ROWS,
            },
        }
    }

    fn apply(&mut self, event: SelectEvent) -> Step {
        match event {
            SelectEvent::Up => {
                if self.state.cursor > 0 {
                    self.state.cursor -= 1;
                }
            }
            SelectEvent::Down => {
                if self.state.cursor + 1 < self.items.len() {
                    self.state.cursor += 1;
                }
            }
            SelectEvent::Toggle => {
                if !self.items.is_empty() {
                    let cursor = self.state.cursor;
                    if !self.state.selected.remove(&cursor) {
                        self.state.selected.insert(cursor);
                    }
                }
            }
            SelectEvent::Confirm => return Step::Confirm,
            SelectEvent::Cancel => return Step::Cancel,
            SelectEvent::Resize { height } => {
                // Header and footer plus one spare row so the frame
                // repaints in place without scrolling the terminal.
                self.state.body_rows =
                    (height.saturating_sub(3) as usize).max(1);
            }
        }

        self.scroll_to_cursor();
        Step::Continue
    }

    fn scroll_to_cursor(&mut self) {
        let max_offset = self
            .rows
            .len()
            .saturating_sub(self.state.body_rows);
        if self.state.offset > max_offset {
            self.state.offset = max_offset;
        }

        let Some(row) = self
            .rows
            .iter()
            .position(|row| *row == BodyRow::Item(self.state.cursor))
        else {
            return;
        };

        if row < self.state.offset {
            self.state.offset = row;
        } else if row >= self.state.offset + self.state.body_rows {
            self.state.offset = row + 1 - self.state.body_rows;
        }
    }

    fn scroll_percent(&self) -> usize {
        let total = self.rows.len();
        if total <= self.state.body_rows {
            return 100;
        }

        let bottom = (self.state.offset + self.state.body_rows).min(total);
        (bottom * 100 + total / 2) / total
    }

    /// Project the current state into display lines: header, visible
    /// body window, footer.
    fn render(&self) -> Vec<String> {
        let mut lines = vec![self.title.as_str().bold().to_string()];

        let end = (self.state.offset + self.state.body_rows).min(self.rows.len());
        for row in &self.rows[self.state.offset..end] {
            match row {
                BodyRow::Group(index) => {
                    let group = &self.items[*index].group;
                    lines.push(format!("[{}]", group).cyan().to_string());
                }
                BodyRow::Item(index) => {
                    let item = &self.items[*index];

                    let marker = if *index == self.state.cursor {
                        "❯"
                    } else {
                        " "
                    };
                    let check = if self.state.selected.contains(index) {
                        "[x]".green().to_string()
                    } else {
                        "[ ]".to_string()
                    };

                    lines.push(format!(
                        "{} {} {}  {}",
                        marker,
                        check,
                        lpad_ansi(&item.name, self.name_width),
                        item.detail.as_str().dark_grey(),
                    ));
                }
            }
        }

        lines.push(
            format!(
                "↑/↓ move · space toggle · y confirm · q cancel  {:>3}%",
                self.scroll_percent()
            )
            .dark_grey()
            .to_string(),
        );

        lines
    }

    fn draw(
        &self,
        out: &mut impl Write,
        prev_lines: u16,
    ) -> anyhow::Result<u16> {
        if prev_lines > 0 {
            execute!(out, MoveUp(prev_lines))?;
        }
        execute!(out, MoveToColumn(0), Clear(ClearType::FromCursorDown))?;

        let lines = self.render();
        for line in &lines {
            write!(out, "{}\r\n", line)?;
        }
        out.flush()?;

        Ok(lines.len() as u16)
    }

    fn event_loop(&mut self, out: &mut impl Write) -> anyhow::Result<SelectOutcome> {
        let (_, height) = terminal::size()?;
        self.apply(SelectEvent::Resize { height });

        let mut drawn = self.draw(out, 0)?;

        loop {
            let select_event = match event::read()? {
                Event::Key(key) => match map_key(key) {
                    Some(ev) => ev,
                    None => continue,
                },
                Event::Resize(_, height) => SelectEvent::Resize { height },
                _ => continue,
            };

            let step = self.apply(select_event);
            drawn = self.draw(out, drawn)?;

            match step {
                Step::Continue => {}
                Step::Confirm => return Ok(SelectOutcome::Confirmed),
                Step::Cancel => return Ok(SelectOutcome::Cancelled),
            }
        }
    }

    /// Run the interactive loop. Blocks until the user confirms or
    /// cancels. The selected indices are appended to `picked`, in index
    /// order, only on confirmation; `picked` is left untouched on
    /// cancellation. IO failures of the terminal driver are returned as
    /// errors, distinct from cancellation.
    pub fn run(
        &mut self,
        picked: &mut Vec<usize>,
    ) -> anyhow::Result<SelectOutcome> {
        let mut stdout = stdout();

        terminal::enable_raw_mode()?;
        execute!(stdout, cursor::Hide)?;

        let result = self.event_loop(&mut stdout);

        terminal::disable_raw_mode()?;
        execute!(stdout, cursor::Show)?;

        let outcome = result?;
        if outcome == SelectOutcome::Confirmed {
            self.write_result(picked);
        }

        Ok(outcome)
    }

    fn write_result(&self, picked: &mut Vec<usize>) {
        picked.extend(self.state.selected.iter().copied());
    }
}

fn body_rows(items: &[SelectItem]) -> Vec<BodyRow> {
    let mut rows = Vec::with_capacity(items.len());
    let mut last_group: Option<&str> = None;

    for (index, item) in items.iter().enumerate() {
        if last_group != Some(item.group.as_str()) {
            rows.push(BodyRow::Group(index));
            last_group = Some(item.group.as_str());
        }
        rows.push(BodyRow::Item(index));
    }

    rows
}

fn map_key(key: KeyEvent) -> Option<SelectEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
    {
        return Some(SelectEvent::Cancel);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(SelectEvent::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(SelectEvent::Down),
        KeyCode::Char(' ') | KeyCode::Enter => Some(SelectEvent::Toggle),
        KeyCode::Char('y') => Some(SelectEvent::Confirm),
        KeyCode::Char('q') | KeyCode::Esc => Some(SelectEvent::Cancel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    fn items(specs: &[(&str, &str)]) -> Vec<SelectItem> {
        specs
            .iter()
            .map(|(group, name)| SelectItem {
                group: group.to_string(),
                name: name.to_string(),
                detail: String::new(),
            })
            .collect()
    }

    fn plain(lines: &[String]) -> Vec<String> {
        lines
            .iter()
            .map(|line| strip_ansi_codes(line).to_string())
            .collect()
    }

    #[test]
    fn cursor_clamps_without_wraparound() {
        let mut select = MultiSelect::new(
            "t",
            items(&[("g", "a"), ("g", "b"), ("g", "c")]),
        );

        select.apply(SelectEvent::Up);
        assert_eq!(select.state.cursor, 0);

        for _ in 0..10 {
            select.apply(SelectEvent::Down);
        }
        assert_eq!(select.state.cursor, 2);

        for _ in 0..10 {
            select.apply(SelectEvent::Up);
        }
        assert_eq!(select.state.cursor, 0);
    }

    #[test]
    fn toggle_twice_restores_prior_state() {
        let mut select =
            MultiSelect::new("t", items(&[("g", "a"), ("g", "b")]));

        select.apply(SelectEvent::Down);
        select.apply(SelectEvent::Toggle);
        assert!(select.state.selected.contains(&1));

        select.apply(SelectEvent::Toggle);
        assert!(select.state.selected.is_empty());
    }

    #[test]
    fn confirmed_selection_is_index_ordered() {
        let mut select = MultiSelect::new(
            "t",
            items(&[("g", "a"), ("g", "b"), ("g", "c"), ("g", "d")]),
        );

        // Select index 3 first, then index 1.
        for _ in 0..3 {
            select.apply(SelectEvent::Down);
        }
        select.apply(SelectEvent::Toggle);
        select.apply(SelectEvent::Up);
        select.apply(SelectEvent::Up);
        select.apply(SelectEvent::Toggle);

        let picked: Vec<usize> =
            select.state.selected.iter().copied().collect();
        assert_eq!(picked, vec![1, 3]);
    }

    #[test]
    fn cancel_terminates_without_writing_the_sink() {
        let mut select =
            MultiSelect::new("t", items(&[("g", "a"), ("g", "b")]));

        select.apply(SelectEvent::Toggle);
        let step = select.apply(SelectEvent::Cancel);
        assert_eq!(step, Step::Cancel);

        // The driver only writes the sink on Confirm, so a cancelled
        // session leaves it exactly as the caller initialized it.
        let mut picked = Vec::new();
        if step == Step::Confirm {
            select.write_result(&mut picked);
        }
        assert!(picked.is_empty());

        select.write_result(&mut picked);
        assert_eq!(picked, vec![0]);
    }

    #[test]
    fn resize_touches_neither_cursor_nor_selection() {
        let mut select = MultiSelect::new(
            "t",
            items(&[("g", "a"), ("g", "b"), ("g", "c")]),
        );

        select.apply(SelectEvent::Down);
        select.apply(SelectEvent::Toggle);

        select.apply(SelectEvent::Resize { height: 5 });
        assert_eq!(select.state.cursor, 1);
        assert_eq!(
            select.state.selected.iter().copied().collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn empty_list_is_inert() {
        let mut select = MultiSelect::new("t", vec![]);

        select.apply(SelectEvent::Down);
        select.apply(SelectEvent::Toggle);
        assert_eq!(select.state.cursor, 0);
        assert!(select.state.selected.is_empty());

        let lines = select.render();
        assert_eq!(lines.len(), 2);
        assert!(plain(&lines)[1].contains("100%"));
    }

    #[test]
    fn group_headings_appear_once_per_run() {
        let select = MultiSelect::new(
            "perms",
            items(&[
                ("G1", "a"),
                ("G1", "b"),
                ("G2", "c"),
                ("G2", "d"),
                ("G2", "e"),
            ]),
        );

        assert_eq!(
            select.rows,
            vec![
                BodyRow::Group(0),
                BodyRow::Item(0),
                BodyRow::Item(1),
                BodyRow::Group(2),
                BodyRow::Item(2),
                BodyRow::Item(3),
                BodyRow::Item(4),
            ]
        );

        let lines = plain(&select.render());
        assert_eq!(lines[1], "[G1]");
        assert_eq!(lines[4], "[G2]");
    }

    #[test]
    fn grouped_toggle_of_last_item_confirms_it_alone() {
        let mut select = MultiSelect::new(
            "perms",
            items(&[
                ("G1", "a"),
                ("G1", "b"),
                ("G2", "c"),
                ("G2", "d"),
                ("G2", "e"),
            ]),
        );

        for _ in 0..4 {
            select.apply(SelectEvent::Down);
        }
        select.apply(SelectEvent::Toggle);
        let step = select.apply(SelectEvent::Confirm);

        assert_eq!(step, Step::Confirm);
        assert_eq!(
            select.state.selected.iter().copied().collect::<Vec<_>>(),
            vec![4]
        );
    }

    #[test]
    fn viewport_follows_cursor() {
        let specs: Vec<(String, String)> = (0..20)
            .map(|i| ("g".to_string(), format!("item{i}")))
            .collect();
        let specs: Vec<(&str, &str)> = specs
            .iter()
            .map(|(g, n)| (g.as_str(), n.as_str()))
            .collect();

        let mut select = MultiSelect::new("t", items(&specs));
        select.apply(SelectEvent::Resize { height: 8 });
        assert_eq!(select.state.body_rows, 5);

        for _ in 0..19 {
            select.apply(SelectEvent::Down);
        }

        // 21 body rows (1 heading + 20 items); the cursor row is the last.
        assert_eq!(select.state.offset, 21 - 5);
        assert_eq!(select.scroll_percent(), 100);

        for _ in 0..19 {
            select.apply(SelectEvent::Up);
        }
        assert_eq!(select.state.offset, 1);
        assert!(select.scroll_percent() < 100);
    }

    #[test]
    fn cursor_marker_tracks_focus() {
        let mut select =
            MultiSelect::new("t", items(&[("g", "a"), ("g", "b")]));
        select.apply(SelectEvent::Down);

        let lines = plain(&select.render());
        assert!(lines[2].starts_with("  [ ] a"));
        assert!(lines[3].starts_with("❯ [ ] b"));
    }

    #[test]
    fn key_bindings_cover_all_actions() {
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);

        assert_eq!(map_key(press(KeyCode::Up)), Some(SelectEvent::Up));
        assert_eq!(map_key(press(KeyCode::Down)), Some(SelectEvent::Down));
        assert_eq!(
            map_key(press(KeyCode::Char(' '))),
            Some(SelectEvent::Toggle)
        );
        assert_eq!(
            map_key(press(KeyCode::Char('y'))),
            Some(SelectEvent::Confirm)
        );
        assert_eq!(map_key(press(KeyCode::Esc)), Some(SelectEvent::Cancel));
        assert_eq!(
            map_key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            )),
            Some(SelectEvent::Cancel)
        );
        assert_eq!(map_key(press(KeyCode::Char('z'))), None);
    }
}
